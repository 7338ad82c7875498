pub mod models;
pub mod outbox;

pub use models::OutboxStatus;
pub use outbox::OutboxDatabase;

use std::fs;
use std::path::Path;

/// Ensure the directory holding `path` exists.
pub fn ensure_parent_dir(path: &str) -> std::io::Result<()> {
    match Path::new(path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// Open the outbox at `path`, or run without one if that fails.
pub fn open_outbox(path: Option<&str>) -> Option<OutboxDatabase> {
    let path = path?;
    if let Err(err) = ensure_parent_dir(path) {
        log::warn!("Unable to create directory for outbox {path}: {err}");
    }

    match OutboxDatabase::with_path(path) {
        Ok(outbox) => {
            match outbox.count_by_status(OutboxStatus::Pending) {
                Ok(0) => {}
                Ok(pending) => log::info!("{pending} message(s) in {path} were never confirmed"),
                Err(err) => log::warn!("Failed to read outbox {path}: {err}"),
            }
            Some(outbox)
        }
        Err(err) => {
            log::warn!("Outbox {path} unavailable, continuing without it: {err}");
            None
        }
    }
}
