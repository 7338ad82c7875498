use serde_json::Value;
use uuid::Uuid;

/// Events the network task sends back up to the UI.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    DmDelivered { local_id: Uuid, response: Value },
    DmFailed { local_id: Uuid, error: String },
}
