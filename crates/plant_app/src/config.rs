use std::fs;
use std::path::Path;
use std::time::Duration;

use plant_client::{ClientSettings, PollPolicy};
use plant_core::DEFAULT_MAX_POLLS;
use plant_logging::{plant_info, plant_warn};
use serde::{Deserialize, Serialize};

pub(crate) const CONFIG_FILENAME: &str = ".plant_client.ron";
pub(crate) const API_BASE_ENV: &str = "PLANT_API_BASE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub api_base: String,
    pub request_timeout_ms: Option<u64>,
    pub poll_interval_ms: u64,
    pub max_polls: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8000/api".to_string(),
            request_timeout_ms: None,
            poll_interval_ms: 2000,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }
}

impl AppConfig {
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            request_timeout: self.request_timeout_ms.map(Duration::from_millis),
            ..ClientSettings::new(self.api_base.clone())
        }
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(self.poll_interval_ms),
            max_polls: self.max_polls,
        }
    }
}

/// Loads `.plant_client.ron` from `dir`, falling back to defaults.
pub(crate) fn load_config(dir: &Path, api_base_override: Option<String>) -> AppConfig {
    let mut config = read_config_file(dir);
    if let Some(api_base) = api_base_override.filter(|value| !value.trim().is_empty()) {
        config.api_base = api_base;
    }
    config
}

fn read_config_file(dir: &Path) -> AppConfig {
    let path = dir.join(CONFIG_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return AppConfig::default();
        }
        Err(err) => {
            plant_warn!("Failed to read config from {:?}: {}", path, err);
            return AppConfig::default();
        }
    };

    match ron::from_str(&content) {
        Ok(config) => {
            plant_info!("Loaded config from {:?}", path);
            config
        }
        Err(err) => {
            plant_warn!("Failed to parse config from {:?}: {}", path, err);
            AppConfig::default()
        }
    }
}
