//! Configuration loading from hass-mcp.toml.
//!
//! Every field has a default, so the file is optional. Environment variables
//! take precedence over file values.

use hass::{DEFAULT_MEDIA_DOMAIN, HassClient, HassTools};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Config file looked up in the working directory when none is given.
pub const CONFIG_FILE: &str = "hass-mcp.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Home Assistant connection.
    pub home_assistant: HomeAssistantConfig,

    /// Media playback settings.
    pub media: MediaConfig,

    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Home Assistant connection settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HomeAssistantConfig {
    /// Base URL, e.g. `http://homeassistant.local:8123`.
    pub base_url: String,

    /// Long-lived access token.
    pub token: Option<String>,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Verify TLS certificates. Disable for self-signed installs.
    pub verify_tls: bool,
}

/// Media playback settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Integration whose `play_media` service is called.
    pub service_domain: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Default for HomeAssistantConfig {
    fn default() -> Self {
        Self {
            base_url: "http://homeassistant.local:8123".to_string(),
            token: None,
            timeout_secs: hass::DEFAULT_TIMEOUT.as_secs(),
            verify_tls: true,
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            service_domain: DEFAULT_MEDIA_DOMAIN.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "hass_mcp=info,hass=info,mcp=info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration, then apply environment overrides.
    ///
    /// An explicit `path` must exist. Without one, `hass-mcp.toml` is used
    /// if present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::parse(&std::fs::read_to_string(path)?)?,
            None => Self::from_default_file()?,
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn from_default_file() -> Result<Self, ConfigError> {
        match std::fs::read_to_string(CONFIG_FILE) {
            Ok(content) => Self::parse(&content),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    /// Apply overrides from `lookup`, normally the process environment.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("HASS_BASE_URL") {
            self.home_assistant.base_url = val;
        }
        if let Some(val) = lookup("HASS_TOKEN") {
            self.home_assistant.token = Some(val);
        }
        if let Some(secs) = lookup("HASS_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.home_assistant.timeout_secs = secs;
        }
        if let Some(verify) = lookup("HASS_VERIFY_TLS").and_then(|v| parse_bool(&v)) {
            self.home_assistant.verify_tls = verify;
        }
        if let Some(val) = lookup("HASS_MCP_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = lookup("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    /// Check that the connection settings are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.home_assistant.base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::MissingBaseUrl);
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(url.to_string()));
        }
        match self.home_assistant.token.as_deref() {
            Some(token) if !token.trim().is_empty() => {}
            _ => return Err(ConfigError::MissingToken),
        }
        if self.home_assistant.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Build the HTTP client from the connection settings.
    pub fn client(&self) -> Result<HassClient, ConfigError> {
        let ha = &self.home_assistant;
        let token = ha.token.clone().ok_or(ConfigError::MissingToken)?;
        HassClient::builder(ha.base_url.trim(), token)
            .timeout(Duration::from_secs(ha.timeout_secs))
            .verify_tls(ha.verify_tls)
            .build()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Build the tool set.
    pub fn tools(&self) -> Result<HassTools, ConfigError> {
        Ok(HassTools::new(self.client()?).with_media_domain(&self.media.service_domain))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("home assistant URL not configured: set home_assistant.base_url or HASS_BASE_URL")]
    MissingBaseUrl,

    #[error("invalid home assistant URL '{0}': expected http:// or https://")]
    InvalidBaseUrl(String),

    #[error("access token not configured: set home_assistant.token or HASS_TOKEN")]
    MissingToken,

    #[error("invalid config: {0}")]
    Invalid(String),
}
