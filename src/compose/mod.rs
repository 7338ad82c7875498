pub mod handler;
pub mod message_list;

pub use handler::{DmForm, SubmissionHandler};
pub use message_list::{DeliveryStatus, DmRow, MessageList};
