use std::time::Duration;

use serde_json::Value;
use tokio::task::JoinHandle;

use crate::common::{DmError, OutgoingMessage, Resource, TargetId};

/// HTTP side of direct messages: one JSON POST per message.
#[derive(Debug, Clone)]
pub struct DmTransport {
    http: reqwest::Client,
    base_url: String,
    resource: Resource,
}

impl DmTransport {
    pub fn new(base_url: &str, resource: Resource, timeout: Duration) -> Result<Self, DmError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            resource,
        })
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn endpoint(&self, target_id: TargetId) -> String {
        format!("{}/{}/{}/dm/add", self.base_url, self.resource, target_id)
    }

    /// Send the message and return the parsed response body.
    pub async fn post_dm(&self, message: &OutgoingMessage) -> Result<Value, DmError> {
        let url = self.endpoint(message.target_id);
        log::debug!("POST {url}");

        let response = self.http.post(&url).json(&message.body()).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Fire the request in the background. `on_success` only ever sees a
    /// parsed 2xx body; failures are logged and returned through the handle,
    /// which callers are free to drop.
    pub fn add_dm<F>(&self, message: OutgoingMessage, on_success: F) -> JoinHandle<Result<Value, DmError>>
    where
        F: FnOnce(Value) + Send + 'static,
    {
        let transport = self.clone();
        tokio::spawn(async move {
            match transport.post_dm(&message).await {
                Ok(response) => {
                    log::debug!("Direct message to {} accepted: {response}", message.target_id);
                    on_success(response.clone());
                    Ok(response)
                }
                Err(err) => {
                    log::warn!("Direct message to {} failed: {err}", message.target_id);
                    Err(err)
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use serde_json::json;
    use tokio::sync::oneshot;

    use super::*;
    use crate::network::test_support::{closed_base_url, stub_server};

    fn transport(base_url: &str, resource: Resource) -> DmTransport {
        DmTransport::new(base_url, resource, Duration::from_secs(5)).unwrap()
    }

    fn hello(target_id: TargetId) -> OutgoingMessage {
        OutgoingMessage {
            text: "hello".to_string(),
            target_id,
        }
    }

    #[test]
    fn endpoint_uses_resource_and_target() {
        let conversations = transport("http://localhost:5000/", Resource::Conversations);
        assert_eq!(
            conversations.endpoint(TargetId::Id(42)),
            "http://localhost:5000/conversations/42/dm/add"
        );

        let threads = transport("https://warbler.example.com", Resource::Threads);
        assert_eq!(
            threads.endpoint(TargetId::NaN),
            "https://warbler.example.com/threads/NaN/dm/add"
        );
    }

    #[tokio::test]
    async fn posts_json_text_body() {
        let (base_url, mut requests) = stub_server("200 OK", r#"[["hello", 1]]"#).await;
        let transport = transport(&base_url, Resource::Conversations);

        let response = transport.post_dm(&hello(TargetId::Id(42))).await.unwrap();
        assert_eq!(response, json!([["hello", 1]]));

        let request = requests.recv().await.unwrap();
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/conversations/42/dm/add");
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.body, r#"{"text":"hello"}"#);
        assert!(requests.try_recv().is_err(), "exactly one request expected");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let (base_url, _requests) = stub_server("500 Internal Server Error", r#"{"error":"boom"}"#).await;
        let transport = transport(&base_url, Resource::Threads);

        match transport.post_dm(&hello(TargetId::Id(1))).await {
            Err(DmError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert!(body.contains("boom"));
            }
            other => panic!("Expected status error, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_body_is_a_decode_error() {
        let (base_url, _requests) = stub_server("200 OK", "<html>ok</html>").await;
        let transport = transport(&base_url, Resource::Conversations);

        let result = transport.post_dm(&hello(TargetId::Id(1))).await;
        assert!(matches!(result, Err(DmError::Decode(_))));
    }

    #[tokio::test]
    async fn callback_receives_parsed_body() {
        let (base_url, _requests) = stub_server("200 OK", r#"{"ok":true,"count":3}"#).await;
        let transport = transport(&base_url, Resource::Conversations);
        let (tx, rx) = oneshot::channel();

        let handle = transport.add_dm(hello(TargetId::Id(9)), move |response| {
            let _ = tx.send(response);
        });

        assert_eq!(rx.await.unwrap(), json!({"ok": true, "count": 3}));
        assert!(handle.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn callback_is_skipped_on_failure() {
        let base_url = closed_base_url().await;
        let transport = transport(&base_url, Resource::Conversations);
        let called = Arc::new(AtomicBool::new(false));
        let flag = called.clone();

        let handle = transport.add_dm(hello(TargetId::Id(9)), move |_| {
            flag.store(true, Ordering::SeqCst);
        });

        let result = handle.await.unwrap();
        assert!(matches!(result, Err(DmError::Http(_))));
        assert!(!called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn nan_target_is_sent_literally() {
        let (base_url, mut requests) = stub_server("200 OK", "null").await;
        let transport = transport(&base_url, Resource::Conversations);

        transport.post_dm(&hello(TargetId::NaN)).await.unwrap();
        let request = requests.recv().await.unwrap();
        assert_eq!(request.path, "/conversations/NaN/dm/add");
    }
}
