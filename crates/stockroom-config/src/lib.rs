//! Configuration for the stockroom admin console.
//!
//! A TOML file under the platform config directory, overridable through
//! `STOCKROOM_`-prefixed environment variables, translated to the
//! `stockroom_core::ConsoleConfig` the console is built from.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockroom_api::{TlsMode, TransportConfig};
use stockroom_core::ConsoleConfig;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config struct ──────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Backend root URL (e.g., "https://api.example.com").
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Accept invalid TLS certificates (development backends).
    #[serde(default)]
    pub insecure: bool,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Items per page on every list screen.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Override for the persisted session file location.
    pub session_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            timeout: default_timeout(),
            insecure: false,
            ca_cert: None,
            page_size: default_page_size(),
            session_path: None,
        }
    }
}

fn default_backend_url() -> String {
    "http://localhost:3030".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_page_size() -> u32 {
    10
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "stockroom", "stockroom").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("stockroom");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the config from file + environment.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file path (the env layer still applies).
pub fn load_config_from(path: &std::path::Path) -> Result<AppConfig, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(AppConfig::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("STOCKROOM_"));

    let config: AppConfig = figment.extract()?;
    Ok(config)
}

/// Load config, returning defaults if the file doesn't exist or is bad.
pub fn load_config_or_default() -> AppConfig {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &AppConfig) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

/// Serialize config to TOML at an explicit path.
pub fn save_config_to(cfg: &AppConfig, path: &std::path::Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `ConsoleConfig` from the loaded application config.
pub fn to_console_config(cfg: &AppConfig) -> Result<ConsoleConfig, ConfigError> {
    let backend_url: url::Url = cfg
        .backend_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "backend_url".into(),
            reason: format!("invalid URL: {}", cfg.backend_url),
        })?;

    let tls = if cfg.insecure {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = cfg.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    Ok(ConsoleConfig {
        backend_url,
        transport: TransportConfig {
            tls,
            timeout: Duration::from_secs(cfg.timeout),
        },
        page_size: cfg.page_size,
        session_path: cfg.session_path.clone(),
    })
}
