use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::Resource;

pub const DEFAULT_CONFIG_PATH: &str = "config/dm.json";
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_OUTBOX_PATH: &str = "data/outbox.db";

pub const ENV_BASE_URL: &str = "DM_BASE_URL";
pub const ENV_RESOURCE: &str = "DM_RESOURCE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub resource: Resource,
    /// Page the client starts on, e.g. `http://localhost:5000/conversations/42`.
    #[serde(default)]
    pub page_url: Option<String>,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// Drop the optimistic row when the server call fails instead of marking it.
    #[serde(default)]
    pub rollback_failed: bool,
    /// `null` disables the local outbox.
    #[serde(default = "default_outbox_path")]
    pub outbox_path: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_outbox_path() -> Option<String> {
    Some(DEFAULT_OUTBOX_PATH.to_string())
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            resource: Resource::default(),
            page_url: None,
            request_timeout_secs: default_timeout(),
            rollback_failed: false,
            outbox_path: default_outbox_path(),
        }
    }
}

impl AppConfig {
    /// Apply `DM_BASE_URL` / `DM_RESOURCE` style overrides from `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|value| !value.trim().is_empty()) {
            self.base_url = base_url.trim().to_string();
        }

        if let Some(raw) = lookup(ENV_RESOURCE) {
            match raw.parse::<Resource>() {
                Ok(resource) => self.resource = resource,
                Err(err) => log::warn!("Ignoring {ENV_RESOURCE}: {err}"),
            }
        }
    }

    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }
}

pub fn load_config(path: &str) -> AppConfig {
    let path = Path::new(path);
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Failed to parse config file {}: {err}", path.display());
                AppConfig::default()
            }
        },
        Err(err) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}

pub fn save_config(path: &str, config: &AppConfig) -> std::io::Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)
}

/// Remember the last page the user had open so the next start lands there.
pub fn persist_page_url(path: &str, page_url: &str) {
    let mut config = match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Not rewriting config {path}: it does not parse ({err})");
                return;
            }
        },
        Err(_) => AppConfig::default(),
    };
    if config.page_url.as_deref() == Some(page_url) {
        return;
    }
    config.page_url = Some(page_url.to_string());

    if let Err(err) = save_config(path, &config) {
        log::error!("Failed to write config {}: {err}", path);
    } else {
        log::info!("Persisted page {} to {}", page_url, path);
    }
}
