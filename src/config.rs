use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "config/chat.json";

fn default_api_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_live_url() -> String {
    "ws://localhost:5000/live".to_string()
}

fn default_poll_interval_secs() -> u64 {
    2
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_live_url")]
    pub live_url: String,
    /// Full-history refresh cadence, in seconds.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            live_url: default_live_url(),
            poll_interval_secs: default_poll_interval_secs(),
        }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.api_base_url, "http://localhost:5000/api");
        assert_eq!(config.poll_interval_secs, 2);
    }

    #[test]
    fn explicit_fields_override_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{
                "api_base_url": "https://backend.example/api",
                "live_url": "wss://backend.example/live",
                "poll_interval_secs": 5
            }"#,
        )
        .unwrap();
        assert_eq!(config.api_base_url, "https://backend.example/api");
        assert_eq!(config.live_url, "wss://backend.example/live");
        assert_eq!(config.poll_interval_secs, 5);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = load_config("config/does-not-exist.json");
        assert_eq!(config.poll_interval_secs, 2);
    }
}
