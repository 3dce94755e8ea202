//! Process configuration: optional TOML file (`CONFIG_PATH`) with environment
//! overrides. Built once at boot and handed to each component.

use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_PORT: u16 = 8080;
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 2_000;
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Toolset {
    Business,
    Weather,
    All,
}

impl Toolset {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "business" => Some(Toolset::Business),
            "weather" => Some(Toolset::Weather),
            "all" => Some(Toolset::All),
            _ => None,
        }
    }

    pub fn has_business(&self) -> bool {
        matches!(self, Toolset::Business | Toolset::All)
    }

    pub fn has_weather(&self) -> bool {
        matches!(self, Toolset::Weather | Toolset::All)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogSink {
    #[default]
    Stderr,
    Stdout,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub sink: LogSink,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: "info".into(), sink: LogSink::Stderr }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub name: String,
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { name: "database-agent".into(), version: "1.0.0".into() }
    }
}

/// Outbound collaborator settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default)]
pub struct ToolConfig {
    pub base_url: Option<String>,
    pub connect_timeout_ms: Option<u64>,
    pub timeout_ms: Option<u64>,
}

impl ToolConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self { base_url: Some(base_url.into()), ..Default::default() }
    }

    /// Base URL if set and non-blank.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn connect_timeout_ms(&self) -> u64 {
        self.connect_timeout_ms.unwrap_or(DEFAULT_CONNECT_TIMEOUT_MS)
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub connect_timeout_ms: Option<u64>,
    pub timeout_ms: Option<u64>,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".into(),
            api_key: None,
            model: "gpt-4o".into(),
            max_tokens: 2000,
            connect_timeout_ms: None,
            timeout_ms: Some(60_000),
        }
    }
}

impl NarrativeConfig {
    pub fn http(&self) -> ToolConfig {
        ToolConfig {
            base_url: Some(self.base_url.clone()),
            connect_timeout_ms: self.connect_timeout_ms,
            timeout_ms: self.timeout_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub mode: String, // "server" or "stdio"
    pub port: u16,
    pub legacy_api: bool,
    pub toolset: Toolset,
    pub server: ServerConfig,
    pub log: LogConfig,
    pub data_provider: ToolConfig,
    pub narrative: NarrativeConfig,
    pub weather: ToolConfig,
    #[serde(skip)]
    pub toolset_raw: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mode: "server".into(),
            port: DEFAULT_PORT,
            legacy_api: false,
            toolset: Toolset::All,
            server: ServerConfig::default(),
            log: LogConfig::default(),
            data_provider: ToolConfig::default(),
            narrative: NarrativeConfig::default(),
            weather: ToolConfig::default(),
            toolset_raw: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("{0}")]
    Invalid(String),
}

impl AppConfig {
    /// Environment only; no file.
    pub fn from_env() -> Self {
        let mut cfg = AppConfig::default();
        cfg.apply_env();
        cfg
    }

    /// `CONFIG_PATH` TOML (if set) with environment overrides on top.
    pub fn from_env_and_toml() -> Result<Self, ConfigError> {
        let mut cfg = match std::env::var("CONFIG_PATH") {
            Ok(path) if !path.trim().is_empty() => Self::from_toml_file(path.trim())?,
            _ => AppConfig::default(),
        };
        cfg.apply_env();
        Ok(cfg)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    fn apply_env(&mut self) {
        if let Ok(mode) = std::env::var("MODE") {
            self.mode = mode;
        }
        if let Some(port) = std::env::var("PORT").ok().and_then(|s| s.parse::<u16>().ok()) {
            self.port = port;
        }
        if let Ok(v) = std::env::var("LEGACY_API") {
            self.legacy_api = !v.is_empty();
        }
        if let Ok(v) = std::env::var("TOOLSET") {
            match Toolset::parse(&v) {
                Some(t) => self.toolset = t,
                None => self.toolset_raw = Some(v),
            }
        }
        if let Some(level) = env_non_empty("LOG_LEVEL").or_else(|| env_non_empty("RUST_LOG")) {
            self.log.level = level;
        }
        if let Some(sink) = env_non_empty("LOG_SINK") {
            self.log.sink = match sink.to_ascii_lowercase().as_str() {
                "stdout" => LogSink::Stdout,
                _ => LogSink::Stderr,
            };
        }
        if let Some(url) = env_non_empty("DATA_PROVIDER_BASE_URL") {
            self.data_provider.base_url = Some(url);
        }
        if let Some(url) = env_non_empty("WEATHER_AGENT_BASE_URL") {
            self.weather.base_url = Some(url);
        }
        if let Some(url) = env_non_empty("OPENAI_BASE_URL") {
            self.narrative.base_url = url;
        }
        if let Some(key) = env_non_empty("OPENAI_KEY").or_else(|| env_non_empty("OPENAI_API_KEY")) {
            self.narrative.api_key = Some(key);
        }
        if let Some(model) = env_non_empty("OPENAI_MODEL") {
            self.narrative.model = model;
        }
        // stdout carries protocol frames in stdio mode
        if self.is_stdio() {
            self.log.sink = LogSink::Stderr;
        }
    }

    pub fn is_stdio(&self) -> bool {
        self.mode == "stdio"
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.mode.as_str(), "server" | "stdio") {
            return Err(ConfigError::Invalid(format!(
                "Invalid MODE: {}. Must be 'server' or 'stdio'",
                self.mode
            )));
        }
        if self.mode == "server" && self.port == 0 {
            return Err(ConfigError::Invalid("PORT cannot be 0".into()));
        }
        if let Some(raw) = &self.toolset_raw {
            return Err(ConfigError::Invalid(format!(
                "Invalid TOOLSET: {raw}. Must be 'business', 'weather' or 'all'"
            )));
        }
        Ok(())
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
