use thiserror::Error;

#[derive(Debug, Error)]
pub enum DmError {
    #[error("Failed to send HTTP request: {0}")]
    Http(String),

    #[error("Server rejected direct message with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode server response: {0}")]
    Decode(String),

    #[error("Network task is not running")]
    ChannelClosed,

    #[error("Too many messages waiting to be sent")]
    QueueFull,

    #[error("Request task failed: {0}")]
    Task(String),
}

impl From<reqwest::Error> for DmError {
    fn from(error: reqwest::Error) -> Self {
        DmError::Http(error.to_string())
    }
}

impl From<serde_json::Error> for DmError {
    fn from(error: serde_json::Error) -> Self {
        DmError::Decode(error.to_string())
    }
}

impl From<tokio::task::JoinError> for DmError {
    fn from(error: tokio::task::JoinError) -> Self {
        DmError::Task(error.to_string())
    }
}
