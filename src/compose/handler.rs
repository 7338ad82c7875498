use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use uuid::Uuid;

use crate::common::{ClientCommand, DmError, OutgoingMessage, TargetId};

use super::message_list::MessageList;

/// Shortest message that gets sent, counted in UTF-16 units on the raw input.
pub const MIN_MESSAGE_UNITS: usize = 2;

/// State behind the direct-message form.
#[derive(Debug, Clone, Default)]
pub struct DmForm {
    pub input_text: String,
    /// URL of the conversation page; its last path segment is the target id.
    pub page_url: String,
}

impl DmForm {
    pub fn new(page_url: impl Into<String>) -> Self {
        Self {
            input_text: String::new(),
            page_url: page_url.into(),
        }
    }

    pub fn target_id(&self) -> TargetId {
        TargetId::from_page_url(&self.page_url)
    }
}

/// Handles a submit of the direct-message form.
///
/// The row is appended before anything goes over the wire and the handler
/// never waits for the request: the network task reports back later through
/// a [`crate::common::ClientEvent`]. Nothing guards against double submits.
#[derive(Clone)]
pub struct SubmissionHandler {
    command_sender: mpsc::Sender<ClientCommand>,
}

impl SubmissionHandler {
    pub fn new(command_sender: mpsc::Sender<ClientCommand>) -> Self {
        Self { command_sender }
    }

    /// Returns the id of the appended row, or `None` if the input was too short.
    pub fn on_submit(&self, form: &mut DmForm, list: &mut MessageList) -> Option<Uuid> {
        let text = form.input_text.clone();
        // Raw length in UTF-16 units, whitespace included; one emoji is two units.
        let units = text.encode_utf16().count();
        if units < MIN_MESSAGE_UNITS {
            log::trace!("Ignoring submit of {units} UTF-16 unit(s)");
            return None;
        }

        let target_id = form.target_id();
        form.input_text.clear();

        let local_id = list.push_pending(text.clone());
        log::debug!("Queued DM {local_id} for target {target_id}");

        let command = ClientCommand::SubmitDm {
            local_id,
            message: OutgoingMessage { text, target_id },
        };
        if let Err(err) = self.command_sender.try_send(command) {
            log::warn!("Failed to send command to network: {err}");
            let reason = match err {
                TrySendError::Closed(_) => DmError::ChannelClosed.to_string(),
                TrySendError::Full(_) => DmError::QueueFull.to_string(),
            };
            list.mark_failed(local_id, reason);
        }

        Some(local_id)
    }
}
