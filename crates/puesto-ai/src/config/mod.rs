//! Environment-driven settings. A `.env` file is read first when present;
//! real environment variables win over it.

use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::workflows::positions::evaluation::{
    EmptyPositionPolicy, EvaluationConfig, DEFAULT_BACKING_MIN_SCORE, DEFAULT_TOLERANCE,
};

/// Deployment stage the service runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" | "produccion" => Self::Production,
            "test" | "ci" | "pruebas" => Self::Test,
            _ => Self::Development,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub evaluation: EvaluationConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |name: &str, default: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let port_raw = text("APP_PORT", "3000");
        let port = port_raw
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort { value: port_raw })?;

        let empty_position_policy = match lookup("APP_EMPTY_POSITION_POLICY") {
            Some(raw) => EmptyPositionPolicy::parse(&raw)
                .ok_or(ConfigError::InvalidEmptyPolicy { value: raw })?,
            None => EmptyPositionPolicy::default(),
        };

        let evaluation = EvaluationConfig {
            tolerance: fraction(&lookup, "APP_EVAL_TOLERANCE", DEFAULT_TOLERANCE)?,
            backing_min_score: fraction(&lookup, "APP_BACKING_MIN_SCORE", DEFAULT_BACKING_MIN_SCORE)?,
            empty_position_policy,
            ..EvaluationConfig::default()
        };

        Ok(Self {
            environment: AppEnvironment::parse(&text("APP_ENV", "development")),
            server: ServerConfig {
                host: text("APP_HOST", "127.0.0.1"),
                port,
            },
            telemetry: TelemetryConfig {
                log_level: text("APP_LOG_LEVEL", "info"),
            },
            evaluation,
        })
    }
}

fn fraction<F>(lookup: &F, name: &'static str, default: f64) -> Result<f64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(default);
    };

    match raw.trim().parse::<f64>() {
        Ok(value) if (0.0..=1.0).contains(&value) => Ok(value),
        _ => Err(ConfigError::InvalidFraction { name, value: raw }),
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::from([127, 0, 0, 1])
        } else {
            self.host
                .parse()
                .map_err(|source| ConfigError::InvalidHost {
                    value: self.host.clone(),
                    source,
                })?
        };

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Default `EnvFilter` directive; `RUST_LOG` overrides it.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort {
        value: String,
    },
    InvalidHost {
        value: String,
        source: std::net::AddrParseError,
    },
    InvalidFraction {
        name: &'static str,
        value: String,
    },
    InvalidEmptyPolicy {
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort { value } => {
                write!(f, "APP_PORT must be a port number, got '{value}'")
            }
            ConfigError::InvalidHost { value, .. } => {
                write!(f, "APP_HOST must be an IP address or localhost, got '{value}'")
            }
            ConfigError::InvalidFraction { name, value } => {
                write!(f, "{name} must be a number between 0 and 1, got '{value}'")
            }
            ConfigError::InvalidEmptyPolicy { value } => write!(
                f,
                "APP_EMPTY_POSITION_POLICY must be 'pass' or 'fail', got '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).expect("defaults");

        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.evaluation, EvaluationConfig::default());
    }

    #[test]
    fn localhost_resolves_to_loopback() {
        let config = config_from(&[("APP_HOST", "localhost"), ("APP_PORT", "8080")])
            .expect("config");
        let addr = config.server.socket_addr().expect("resolves");

        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 8080));
    }

    #[test]
    fn unparseable_host_is_reported() {
        let config = config_from(&[("APP_HOST", "intranet.gob")]).expect("config");
        let error = config.server.socket_addr().expect_err("bad host");

        assert!(error.to_string().contains("intranet.gob"));
    }

    #[test]
    fn evaluation_overrides_are_read() {
        let config = config_from(&[
            ("APP_ENV", "produccion"),
            ("APP_EVAL_TOLERANCE", "0.005"),
            ("APP_EMPTY_POSITION_POLICY", "FAIL"),
        ])
        .expect("config");

        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(config.evaluation.tolerance, 0.005);
        assert_eq!(
            config.evaluation.empty_position_policy,
            EmptyPositionPolicy::Fail
        );
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            config_from(&[("APP_BACKING_MIN_SCORE", "1.5")]),
            Err(ConfigError::InvalidFraction {
                name: "APP_BACKING_MIN_SCORE",
                ..
            })
        ));
        assert!(matches!(
            config_from(&[("APP_PORT", "70000")]),
            Err(ConfigError::InvalidPort { .. })
        ));
        assert!(matches!(
            config_from(&[("APP_EMPTY_POSITION_POLICY", "maybe")]),
            Err(ConfigError::InvalidEmptyPolicy { .. })
        ));
    }
}
