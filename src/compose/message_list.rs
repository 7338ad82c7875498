use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::common::ClientEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    Pending,
    Delivered,
    Failed(String),
}

/// A row in the conversation view. The text is kept exactly as typed.
#[derive(Debug, Clone)]
pub struct DmRow {
    pub local_id: Uuid,
    pub text: String,
    pub status: DeliveryStatus,
    pub created_at: DateTime<Utc>,
}

/// Rows rendered for the open conversation, in submission order.
#[derive(Debug, Default)]
pub struct MessageList {
    rows: Vec<DmRow>,
    rollback_failed: bool,
}

impl MessageList {
    pub fn new(rollback_failed: bool) -> Self {
        Self {
            rows: Vec::new(),
            rollback_failed,
        }
    }

    /// Append an optimistic row and return its id.
    pub fn push_pending(&mut self, text: String) -> Uuid {
        let local_id = Uuid::new_v4();
        self.rows.push(DmRow {
            local_id,
            text,
            status: DeliveryStatus::Pending,
            created_at: Utc::now(),
        });
        local_id
    }

    pub fn mark_failed(&mut self, local_id: Uuid, reason: String) {
        if self.rollback_failed {
            self.rows.retain(|row| row.local_id != local_id);
        } else if let Some(row) = self.find_mut(local_id) {
            row.status = DeliveryStatus::Failed(reason);
        }
    }

    pub fn mark_delivered(&mut self, local_id: Uuid) {
        if let Some(row) = self.find_mut(local_id) {
            row.status = DeliveryStatus::Delivered;
        }
    }

    /// Reflect a network outcome. Returns `false` when the row is unknown,
    /// e.g. it was cleared before the answer arrived.
    pub fn apply(&mut self, event: &ClientEvent) -> bool {
        match event {
            ClientEvent::DmDelivered { local_id, .. } => {
                let known = self.contains(*local_id);
                self.mark_delivered(*local_id);
                known
            }
            ClientEvent::DmFailed { local_id, error } => {
                let known = self.contains(*local_id);
                self.mark_failed(*local_id, error.clone());
                known
            }
        }
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn rows(&self) -> &[DmRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.status == DeliveryStatus::Pending)
            .count()
    }

    fn contains(&self, local_id: Uuid) -> bool {
        self.rows.iter().any(|row| row.local_id == local_id)
    }

    fn find_mut(&mut self, local_id: Uuid) -> Option<&mut DmRow> {
        self.rows.iter_mut().find(|row| row.local_id == local_id)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn delivered_event_updates_row() {
        let mut list = MessageList::new(false);
        let local_id = list.push_pending("hello".to_string());

        assert!(list.apply(&ClientEvent::DmDelivered {
            local_id,
            response: json!([]),
        }));
        assert_eq!(list.rows()[0].status, DeliveryStatus::Delivered);
        assert_eq!(list.pending_count(), 0);
    }

    #[test]
    fn failed_row_stays_visible_by_default() {
        let mut list = MessageList::new(false);
        let local_id = list.push_pending("hello".to_string());

        list.apply(&ClientEvent::DmFailed {
            local_id,
            error: "timed out".to_string(),
        });
        assert_eq!(list.len(), 1);
        assert_eq!(
            list.rows()[0].status,
            DeliveryStatus::Failed("timed out".to_string())
        );
    }

    #[test]
    fn rollback_removes_failed_row() {
        let mut list = MessageList::new(true);
        let kept = list.push_pending("kept".to_string());
        let dropped = list.push_pending("dropped".to_string());

        list.apply(&ClientEvent::DmFailed {
            local_id: dropped,
            error: "500".to_string(),
        });
        assert_eq!(list.len(), 1);
        assert_eq!(list.rows()[0].local_id, kept);
    }

    #[test]
    fn unknown_row_is_reported() {
        let mut list = MessageList::new(false);
        list.push_pending("hello".to_string());
        list.clear();

        assert!(!list.apply(&ClientEvent::DmDelivered {
            local_id: Uuid::new_v4(),
            response: json!(null),
        }));
        assert!(list.is_empty());
    }
}
