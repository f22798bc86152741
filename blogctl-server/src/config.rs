//! Server configuration - file, environment and defaults
//!
//! Precedence, lowest first:
//! 1. Built-in defaults
//! 2. TOML file (`--config PATH`, else `~/.blogctl/config.toml` when present)
//! 3. Environment: `DATABASE_URL`, `BLOGCTL_BIND`, `BLOGCTL_PUBLIC_URL`
//!
//! Command-line flags are applied on top by the CLI.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::db::pool::DEFAULT_MAX_CONNECTIONS;

/// Default SQLite database file
pub const DEFAULT_DATABASE_URL: &str = "sqlite://blog.db";

/// Configuration loading error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid value for {key}: '{value}'")]
    InvalidEnv { key: &'static str, value: String },
}

/// How requests are authenticated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// No authentication
    #[default]
    Open,
    /// GET requests need a bearer token, which becomes the request principal
    PrincipalForReads,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub mode: AuthMode,
    /// Accepted bearer tokens; empty accepts any token
    pub tokens: Vec<String>,
}

/// Blog server configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    /// Address to bind to (default: 127.0.0.1:8080)
    pub bind_addr: SocketAddr,

    pub database_url: String,

    pub max_connections: u32,

    /// Allow any CORS origin (default: localhost only)
    pub cors_permissive: bool,

    /// Prefix for link hrefs, e.g. `https://blog.example.com`; empty keeps
    /// links host-relative
    pub public_url: String,

    pub auth: AuthConfig,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            database_url: DEFAULT_DATABASE_URL.to_owned(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            cors_permissive: false,
            public_url: String::new(),
            auth: AuthConfig::default(),
        }
    }
}

impl BlogConfig {
    /// Load file and environment layers.
    ///
    /// An explicit `path` must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.with_env(|key| std::env::var(key).ok())
    }

    /// `~/.blogctl/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".blogctl").join("config.toml"))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Apply environment overrides read through `lookup`.
    pub fn with_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.is_empty()) {
            self.database_url = url;
        }

        if let Some(bind) = lookup("BLOGCTL_BIND").filter(|v| !v.is_empty()) {
            self.bind_addr = bind.parse().map_err(|_| ConfigError::InvalidEnv {
                key: "BLOGCTL_BIND",
                value: bind,
            })?;
        }

        if let Some(public_url) = lookup("BLOGCTL_PUBLIC_URL") {
            self.public_url = public_url;
        }

        Ok(self)
    }
}
