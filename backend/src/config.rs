use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "config/neuroscan.yaml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub demo_mode: bool,
    /// Simulated processing time for demo predictions.
    pub demo_delay_ms: u64,
    pub frontend_dir: String,
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChatConfig {
    pub api_key: String,
    pub model: String,
    pub api_url: String,
    pub timeout_secs: u64,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            demo_mode: false,
            demo_delay_ms: 500,
            frontend_dir: "frontend/dist".to_string(),
            chat: ChatConfig::default(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "nvidia/nemotron-nano-9b-v2:free".to_string(),
            api_url: "https://openrouter.ai/api/v1/chat/completions".to_string(),
            timeout_secs: 30,
            max_tokens: 500,
            temperature: 0.7,
        }
    }
}

impl AppConfig {
    /// YAML file (if present) first, then environment variables on top.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("NEUROSCAN_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut config = if Path::new(&path).exists() {
            log::info!("Loading configuration from {}", path);
            Self::from_yaml_str(&std::fs::read_to_string(&path)?)?
        } else {
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                value: port.clone(),
            })?;
        }
        if let Some(demo) = lookup("DEMO_MODE") {
            self.demo_mode = demo.eq_ignore_ascii_case("true");
        }
        if let Some(dir) = lookup("FRONTEND_DIR") {
            self.frontend_dir = dir;
        }
        if let Some(key) = lookup("OPENROUTER_API_KEY") {
            self.chat.api_key = key;
        }
        if let Some(model) = lookup("OPENROUTER_MODEL") {
            self.chat.model = model;
        }
        if let Some(url) = lookup("OPENROUTER_API_URL") {
            self.chat.api_url = url;
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn chatbot_configured(&self) -> bool {
        !self.chat.api_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:5001");
        assert!(!config.demo_mode);
        assert!(!config.chatbot_configured());
        assert_eq!(config.chat.max_tokens, 500);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_env(env(&[("PORT", "8080"), ("DEMO_MODE", "TRUE"), ("OPENROUTER_API_KEY", "sk-test")]))
            .unwrap();
        assert_eq!(config.port, 8080);
        assert!(config.demo_mode);
        assert!(config.chatbot_configured());
    }

    #[test]
    fn test_demo_mode_only_true_enables() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[("DEMO_MODE", "yes")])).unwrap();
        assert!(!config.demo_mode);
    }

    #[test]
    fn test_bad_port_is_rejected() {
        let mut config = AppConfig::default();
        let err = config.apply_env(env(&[("PORT", "fifty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "PORT"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml_str("port: 9000\nchat:\n  model: local-model\n").unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.chat.model, "local-model");
        assert_eq!(config.chat.timeout_secs, 30);
        assert_eq!(config.host, "0.0.0.0");
    }
}
