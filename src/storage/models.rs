use std::fmt;
use std::str::FromStr;

/// Delivery state of an outbox row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboxStatus {
    Pending,
    Delivered,
    Failed,
}

impl OutboxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutboxStatus::Pending => "pending",
            OutboxStatus::Delivered => "delivered",
            OutboxStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for OutboxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for OutboxStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(OutboxStatus::Pending),
            "delivered" => Ok(OutboxStatus::Delivered),
            "failed" => Ok(OutboxStatus::Failed),
            other => Err(format!("unknown outbox status `{other}`")),
        }
    }
}

/// One submitted direct message as recorded locally.
#[derive(Debug, Clone)]
pub struct OutboxEntry {
    pub local_id: String,
    /// Target as it appeared in the request path (`42`, `NaN`).
    pub target: String,
    pub resource: String,
    pub text: String,
    pub status: OutboxStatus,
    pub error: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}
