//! Process configuration read from the environment.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::services::scoring::{ScoringConfig, ScoringError};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";

/// Deployment mode. Only development mode exposes fault details to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("development") => Self::Development,
            _ => Self::Production,
        }
    }
}

/// HTTP server settings.
///
/// Environment variables:
/// - `HOST` (default `0.0.0.0`)
/// - `PORT` (default `3000`)
/// - `FRONTEND_URL`: the only origin allowed by CORS (default `http://localhost:5173`)
/// - `APP_ENV`: `development` enables fault details in 500 responses
/// - `SCORING_CONFIG`: optional path to a TOML file with a `[scoring]` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub environment: Environment,
    pub scoring_config_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            environment: Environment::default(),
            scoring_config_path: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| format!("Invalid PORT '{}': {}", raw, e))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: non_empty("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            frontend_url: non_empty("FRONTEND_URL")
                .unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_string()),
            environment: Environment::parse(lookup("APP_ENV").as_deref()),
            scoring_config_path: non_empty("SCORING_CONFIG").map(PathBuf::from),
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| format!("Invalid bind address {}:{}: {}", self.host, self.port, e))
    }

    /// Scoring rules from `SCORING_CONFIG`, or the built-in defaults when unset.
    pub fn load_scoring_config(&self) -> Result<ScoringConfig, ScoringError> {
        match &self.scoring_config_path {
            Some(path) => ScoringConfig::from_file(path),
            None => Ok(ScoringConfig::default()),
        }
    }
}
