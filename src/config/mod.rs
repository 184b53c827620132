use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::provider::ProviderKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Which hosted chat-completion service to call
    pub provider: ProviderKind,

    pub model: String,

    /// Override the provider's default API base URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    /// Override the environment variable the API key is read from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    /// Number of ideas asked for in each prompt
    pub ideas_per_request: u8,

    pub request_timeout_secs: u64,

    /// Show request failures in a blocking popup instead of the status line
    pub alert_on_error: bool,

    /// Show desktop notifications (copy confirmations)
    pub notifications: bool,

    /// Accent colour override, `#RRGGBB` or `#RGB`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::OpenRouter,
            model: "gpt-3.5-turbo".to_string(),
            api_base: None,
            api_key_env: None,
            ideas_per_request: 3,
            request_timeout_secs: 30,
            alert_on_error: false,
            notifications: true,
            accent: None,
        }
    }
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("DATENIGHT_CONFIG") {
            return Ok(PathBuf::from(path));
        }

        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("datenight");

        if let Err(e) = std::fs::create_dir_all(&config_dir) {
            tracing::warn!("Could not create config directory: {}", e);
        }

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = match Self::config_path() {
            Ok(p) => p,
            Err(_) => return Ok(AppConfig::default()),
        };

        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return Ok(config),
                    Err(e) => tracing::warn!("Failed to parse config: {}", e),
                },
                Err(e) => tracing::warn!("Failed to read config: {}", e),
            }
            // Keep the user's broken file around for them to fix
            return Ok(AppConfig::default());
        }

        let config = AppConfig::default();
        if let Err(e) = config.save() {
            tracing::warn!("Could not write default config: {}", e);
        }
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        let mut clean_config = self.clone();

        // Empty overrides mean "use the provider default"
        for field in [
            &mut clean_config.api_base,
            &mut clean_config.api_key_env,
            &mut clean_config.accent,
        ] {
            if field.as_ref().map(|s| s.trim().is_empty()).unwrap_or(false) {
                *field = None;
            }
        }
        clean_config.ideas_per_request = clean_config.ideas_per_request.max(1);

        let content = toml::to_string_pretty(&clean_config)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn api_base(&self) -> String {
        self.api_base
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(self.provider.default_api_base())
            .trim_end_matches('/')
            .to_string()
    }

    pub fn api_key_env(&self) -> &str {
        self.api_key_env
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(self.provider.default_api_key_env())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization() {
        let config = AppConfig {
            provider: ProviderKind::OpenAi,
            model: "gpt-4o-mini".to_string(),
            api_base: Some("http://localhost:8080/v1".to_string()),
            api_key_env: None,
            ideas_per_request: 5,
            request_timeout_secs: 10,
            alert_on_error: true,
            notifications: false,
            accent: Some("#ec4899".to_string()),
        };

        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&serialized).unwrap();

        assert_eq!(deserialized.provider, ProviderKind::OpenAi);
        assert_eq!(deserialized.model, config.model);
        assert_eq!(deserialized.api_base, config.api_base);
        assert_eq!(deserialized.ideas_per_request, 5);
        assert!(deserialized.alert_on_error);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig = toml::from_str("provider = \"openai\"\n").unwrap();
        assert_eq!(config.provider, ProviderKind::OpenAi);
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert_eq!(config.ideas_per_request, 3);
        assert!(config.notifications);
        assert_eq!(config.api_base(), "https://api.openai.com/v1");
        assert_eq!(config.api_key_env(), "OPENAI_API_KEY");
    }

    #[test]
    fn test_overrides_win_over_provider_defaults() {
        let config = AppConfig {
            api_base: Some("https://proxy.example/v1/".to_string()),
            api_key_env: Some("MY_KEY".to_string()),
            ..AppConfig::default()
        };
        assert_eq!(config.api_base(), "https://proxy.example/v1");
        assert_eq!(config.api_key_env(), "MY_KEY");

        let blank = AppConfig {
            api_base: Some("  ".to_string()),
            ..AppConfig::default()
        };
        assert_eq!(blank.api_base(), "https://openrouter.ai/api/v1");
    }
}
