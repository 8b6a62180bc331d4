use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "config/chat.json";

fn default_channel_id() -> String {
    "broadcast-chat-general".to_string()
}

fn default_assistant_model() -> String {
    "gemini-2.5-flash".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_channel_id")]
    pub channel_id: String,
    /// Tên hiển thị dùng lần trước, để không phải nhập lại.
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default = "default_assistant_model")]
    pub assistant_model: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            channel_id: default_channel_id(),
            display_name: None,
            assistant_model: default_assistant_model(),
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

pub fn save_config(path: &str, config: &AppConfig) -> std::io::Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)
}

pub fn persist_display_name(path: &str, name: &str) {
    let mut config = load_config(path);
    config.display_name = Some(name.to_string());

    if let Err(err) = save_config(path, &config) {
        log::error!("Failed to write config {}: {err}", path);
    }
}
