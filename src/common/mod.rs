pub mod commands;
pub mod error;
pub mod events;
pub mod types;

pub use commands::ClientCommand;
pub use error::DmError;
pub use events::ClientEvent;
pub use types::{OutgoingMessage, Resource, TargetId};
