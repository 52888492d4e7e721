use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_MAX_IN_FLIGHT: usize = 32;

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn parse_var<T: FromStr>(var: &'static str, raw: Option<String>) -> Result<Option<T>, ConfigError> {
    match raw {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// Applied to every outbound request: page, pricing and cookie harvest.
    pub request_timeout: Duration,
    /// Upper bound on routines executing at once.
    pub max_in_flight: usize,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            log_format: LogFormat::Text,
        }
    }
}

impl Config {
    /// Reads `SCRAPER_*` variables, falling back to defaults for unset ones.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_var)
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let bind_addr = parse_var("SCRAPER_BIND_ADDR", lookup("SCRAPER_BIND_ADDR"))?
            .unwrap_or(defaults.bind_addr);
        let request_timeout = parse_var::<u64>(
            "SCRAPER_REQUEST_TIMEOUT_SECS",
            lookup("SCRAPER_REQUEST_TIMEOUT_SECS"),
        )?
        .map(Duration::from_secs)
        .unwrap_or(defaults.request_timeout);

        let max_in_flight = match lookup("SCRAPER_MAX_IN_FLIGHT") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n >= 1 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "SCRAPER_MAX_IN_FLIGHT",
                        value: raw,
                    })
                }
            },
            None => defaults.max_in_flight,
        };

        let log_format = match lookup("SCRAPER_LOG_FORMAT") {
            Some(raw) => raw.parse::<LogFormat>().map_err(|_| ConfigError::Invalid {
                var: "SCRAPER_LOG_FORMAT",
                value: raw,
            })?,
            None => defaults.log_format,
        };

        Ok(Self {
            bind_addr,
            request_timeout,
            max_in_flight,
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
    }

    #[test]
    fn reads_every_variable() {
        let config = Config::from_lookup(lookup(&[
            ("SCRAPER_BIND_ADDR", "0.0.0.0:9090"),
            ("SCRAPER_REQUEST_TIMEOUT_SECS", "3"),
            ("SCRAPER_MAX_IN_FLIGHT", "4"),
            ("SCRAPER_LOG_FORMAT", "JSON"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr.port(), 9090);
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert_eq!(config.max_in_flight, 4);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn rejects_zero_in_flight() {
        let err = Config::from_lookup(lookup(&[("SCRAPER_MAX_IN_FLIGHT", "0")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                var: "SCRAPER_MAX_IN_FLIGHT",
                value: "0".to_string()
            }
        );
    }

    #[test]
    fn rejects_garbage_timeout() {
        let err =
            Config::from_lookup(lookup(&[("SCRAPER_REQUEST_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("SCRAPER_REQUEST_TIMEOUT_SECS"));
    }
}
