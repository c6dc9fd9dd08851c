//! Server configuration module

use serde::{Deserialize, Serialize};

use super::{parse_or, ConfigError};

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Worker threads (0 = number of CPU cores)
    #[serde(default)]
    pub workers: usize,

    /// Allowed CORS origins; empty means any origin is accepted
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 5000,
            workers: 0, // Use all CPU cores
            allowed_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Read `HOST`, `PORT`, `SERVER_WORKERS` and `CORS_ALLOWED_ORIGINS`
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(lookup, "PORT", defaults.port)?,
            workers: parse_or(lookup, "SERVER_WORKERS", defaults.workers)?,
            allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(|origin| origin.trim().to_string())
                        .filter(|origin| !origin.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        })
    }

    /// Get the bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.workers, 0);
        assert!(config.allowed_origins.is_empty());
    }

    #[test]
    fn test_bind_address() {
        assert_eq!(ServerConfig::new("localhost", 443).bind_address(), "localhost:443");
    }

    #[test]
    fn test_from_lookup_parses_origins_and_port() {
        let lookup = |key: &str| match key {
            "PORT" => Some("8081".to_string()),
            "CORS_ALLOWED_ORIGINS" => Some("https://a.example, ,https://b.example".to_string()),
            _ => None,
        };
        let config = ServerConfig::from_lookup(&lookup).unwrap();
        assert_eq!(config.port, 8081);
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let lookup = |key: &str| (key == "PORT").then(|| "eighty".to_string());
        assert!(ServerConfig::from_lookup(&lookup).is_err());
    }
}
