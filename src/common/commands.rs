use uuid::Uuid;

use super::types::OutgoingMessage;

/// Commands the UI sends down to the network task.
#[derive(Debug, Clone)]
pub enum ClientCommand {
    /// Post a direct message. `local_id` ties the outcome back to the
    /// optimistic row already shown in the list.
    SubmitDm {
        local_id: Uuid,
        message: OutgoingMessage,
    },
}
