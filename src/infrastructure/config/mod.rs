//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::errors::ConfigError;

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    pub adapters: AdaptersConfig,
    pub network: NetworkConfig,
    pub dog_api: DogApiConfig,
    pub audit: AuditConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdaptersConfig {
    pub telegram: Option<TelegramConfig>,
    pub console: Option<ConsoleConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TelegramConfig {
    pub enabled: bool,
    pub token: Option<String>,
    /// File holding the bot token as a single line, read once at startup.
    pub token_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConsoleConfig {
    pub enabled: bool,
}

/// Process-wide outbound HTTP settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct NetworkConfig {
    pub proxy: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DogApiConfig {
    pub base_url: String,
}

/// Upstream failure log sink
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AuditConfig {
    pub enabled: bool,
    pub path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "fetchbot".to_string(),
                prefix: "/".to_string(),
            },
            adapters: AdaptersConfig {
                telegram: Some(TelegramConfig {
                    enabled: false,
                    token: None,
                    token_file: Some(PathBuf::from("telegram.token")),
                }),
                console: Some(ConsoleConfig { enabled: true }),
            },
            network: NetworkConfig { proxy: None },
            dog_api: DogApiConfig {
                base_url: "https://dog.ceo".to_string(),
            },
            audit: AuditConfig {
                enabled: true,
                path: PathBuf::from("logs/upstream.log"),
            },
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn load_env() -> Self {
        let mut config = Config::default();

        if let Ok(token) = std::env::var("BOT_TOKEN") {
            if let Some(ref mut tg) = config.adapters.telegram {
                tg.token = Some(token);
                tg.enabled = true;
            }
        }

        if let Ok(prefix) = std::env::var("BOT_PREFIX") {
            config.bot.prefix = prefix;
        }

        if let Ok(proxy) = std::env::var("HTTP_PROXY") {
            config.network.proxy = Some(proxy);
        }

        config
    }

    /// Resolve the Telegram token: explicit override first, then the
    /// inline config value, then the token file.
    pub fn telegram_token(&self, override_token: Option<String>) -> Option<String> {
        if let Some(token) = override_token {
            return Some(token);
        }

        let tg = self.adapters.telegram.as_ref()?;
        if let Some(ref token) = tg.token {
            return Some(token.clone());
        }

        let path = tg.token_file.as_ref()?;
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let token = content.trim().to_string();
                if token.is_empty() {
                    None
                } else {
                    Some(token)
                }
            }
            Err(e) => {
                tracing::debug!("token file {} not readable: {}", path.display(), e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_yaml_config() {
        let yaml = r#"
bot:
  name: fetchbot
  prefix: "/"
adapters:
  telegram:
    enabled: true
    token: "123:abc"
    token-file: null
  console:
    enabled: false
network:
  proxy: "http://127.0.0.1:3128"
dog-api:
  base-url: "https://dog.ceo"
audit:
  enabled: true
  path: "logs/upstream.log"
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.bot.name, "fetchbot");
        assert_eq!(config.network.proxy.as_deref(), Some("http://127.0.0.1:3128"));
        assert_eq!(config.dog_api.base_url, "https://dog.ceo");
        assert_eq!(config.telegram_token(None).as_deref(), Some("123:abc"));
    }

    #[test]
    fn default_round_trips_through_yaml() {
        let rendered = serde_yaml::to_string(&Config::default()).unwrap();
        let parsed: Config = serde_yaml::from_str(&rendered).unwrap();
        assert_eq!(parsed.bot.name, "fetchbot");
        assert_eq!(parsed.dog_api.base_url, "https://dog.ceo");
        assert!(parsed.audit.enabled);
    }

    #[test]
    fn token_override_wins() {
        let config = Config::default();
        assert_eq!(
            config.telegram_token(Some("override".to_string())).as_deref(),
            Some("override")
        );
    }

    #[test]
    fn token_read_from_file_is_trimmed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "42:token-from-file").unwrap();

        let mut config = Config::default();
        if let Some(ref mut tg) = config.adapters.telegram {
            tg.token_file = Some(file.path().to_path_buf());
        }
        assert_eq!(
            config.telegram_token(None).as_deref(),
            Some("42:token-from-file")
        );
    }
}
