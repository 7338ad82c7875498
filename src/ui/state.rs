use chrono::{DateTime, Utc};

use crate::common::ClientEvent;
use crate::compose::{DmForm, MessageList};

const MAX_EVENTS: usize = 100;

/// Entry in the side panel's event log.
#[derive(Debug, Clone)]
pub struct EventEntry {
    pub timestamp: DateTime<Utc>,
    pub kind: &'static str,
    pub message: String,
}

/// Local state of the UI.
pub struct AppState {
    pub form: DmForm,
    /// Page URL being edited; only takes effect on "Open".
    pub page_input: String,
    pub list: MessageList,
    pub events: Vec<EventEntry>,
}

impl AppState {
    pub fn new(page_url: &str, rollback_failed: bool) -> Self {
        Self {
            form: DmForm::new(page_url),
            page_input: page_url.to_string(),
            list: MessageList::new(rollback_failed),
            events: Vec::new(),
        }
    }

    pub fn apply_event(&mut self, event: ClientEvent) {
        let known = self.list.apply(&event);
        match event {
            ClientEvent::DmDelivered { local_id, response } => self.push_event(
                "DM_DELIVERED",
                format!("{} delivered: {}", short_id(&local_id), response),
            ),
            ClientEvent::DmFailed { local_id, error } => self.push_event(
                "DM_FAILED",
                format!("{} failed: {}", short_id(&local_id), error),
            ),
        }
        if !known {
            log::debug!("Outcome arrived for a row no longer shown");
        }
    }

    pub fn note_submitted(&mut self, local_id: &uuid::Uuid) {
        let target = self.form.target_id();
        self.push_event(
            "DM_SUBMITTED",
            format!("{} -> target {}", short_id(local_id), target),
        );
    }

    /// Switch to the page typed into the URL field. Returns the new URL if it changed.
    pub fn open_page(&mut self) -> Option<String> {
        let page_url = self.page_input.trim().to_string();
        if page_url.is_empty() || page_url == self.form.page_url {
            return None;
        }

        self.form.page_url = page_url.clone();
        self.list.clear();
        self.push_event("PAGE_OPENED", format!("Opened {page_url}"));
        Some(page_url)
    }

    pub fn push_event(&mut self, kind: &'static str, message: String) {
        self.events.push(EventEntry {
            timestamp: Utc::now(),
            kind,
            message,
        });

        if self.events.len() > MAX_EVENTS {
            self.events.remove(0);
        }
    }
}

fn short_id(local_id: &uuid::Uuid) -> String {
    local_id.simple().to_string()[..8].to_string()
}
