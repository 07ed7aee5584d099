//! Configuration management for reconflow.
//!
//! Configuration can be set via environment variables:
//! - `RECONFLOW_VERBOSITY` - Optional. Pipeline log verbosity 0..3. Defaults to `1`.
//! - `RECONFLOW_DEBUG` - Optional. Extra diagnostic log fields. Defaults to `false`.
//! - `RECONFLOW_PROBE_TIMEOUT_MS` - Optional. Per-probe TCP timeout. Defaults to `500`.
//! - `RECONFLOW_SWEEP_BUDGET_MS` - Optional. Wall-clock budget of a quick scan. Defaults to `5000`.
//! - `RECONFLOW_SCAN_WORKERS` - Optional. Concurrent probes per sweep. Defaults to `64`.
//! - `RECONFLOW_HTTP_TIMEOUT_SECS` - Optional. HTTP request timeout. Defaults to `10`.
//! - `RECONFLOW_USER_AGENT` - Optional. User-Agent for HTTP requests.
//!
//! The same fields can be loaded from a JSON file with [`Config::from_file`].

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::task::MAX_VERBOSITY;
use crate::util::{env_var_bool, parse_bool};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Scanner tuning shared by the port and vulnerability scanners.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Timeout for a single TCP probe (DNS lookup included)
    pub probe_timeout: Duration,

    /// Maximum wall-clock time of a multi-port sweep
    pub sweep_budget: Duration,

    /// Maximum number of probes in flight at once
    pub workers: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_millis(500),
            sweep_budget: Duration::from_millis(5000),
            workers: 64,
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Whole-request timeout
    pub timeout: Duration,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: default_user_agent(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pipeline log verbosity (0 = silent, 3 = trace); larger values clamp to 3
    pub verbosity: u8,

    /// Adds diagnostic fields to pipeline logs
    pub debug: bool,

    /// Port and vulnerability scanner settings
    pub scan: ScanConfig,

    /// HTTP client settings
    pub http: HttpConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbosity: 1,
            debug: false,
            scan: ScanConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

/// On-disk representation; every field is optional and falls back to the default.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    verbosity: Option<u8>,
    debug: Option<bool>,
    probe_timeout_ms: Option<u64>,
    sweep_budget_ms: Option<u64>,
    scan_workers: Option<usize>,
    http_timeout_secs: Option<u64>,
    user_agent: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a variable is set but cannot be
    /// parsed, or if a timeout or worker count is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let verbosity = env_parse::<u8>("RECONFLOW_VERBOSITY")?
            .unwrap_or(defaults.verbosity)
            .min(MAX_VERBOSITY);
        let debug = env_var_bool("RECONFLOW_DEBUG", defaults.debug);

        let probe_timeout = env_parse::<u64>("RECONFLOW_PROBE_TIMEOUT_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.scan.probe_timeout);
        let sweep_budget = env_parse::<u64>("RECONFLOW_SWEEP_BUDGET_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.scan.sweep_budget);
        let workers = env_parse("RECONFLOW_SCAN_WORKERS")?.unwrap_or(defaults.scan.workers);

        let http_timeout = env_parse::<u64>("RECONFLOW_HTTP_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.http.timeout);
        let user_agent =
            std::env::var("RECONFLOW_USER_AGENT").unwrap_or(defaults.http.user_agent);

        let config = Self {
            verbosity,
            debug,
            scan: ScanConfig {
                probe_timeout,
                sweep_budget,
                workers,
            },
            http: HttpConfig {
                timeout: http_timeout,
                user_agent,
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let file: FileConfig = serde_json::from_str(&contents)?;
        let defaults = Self::default();

        let config = Self {
            verbosity: file.verbosity.unwrap_or(defaults.verbosity).min(MAX_VERBOSITY),
            debug: file.debug.unwrap_or(defaults.debug),
            scan: ScanConfig {
                probe_timeout: file
                    .probe_timeout_ms
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.scan.probe_timeout),
                sweep_budget: file
                    .sweep_budget_ms
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.scan.sweep_budget),
                workers: file.scan_workers.unwrap_or(defaults.scan.workers),
            },
            http: HttpConfig {
                timeout: file
                    .http_timeout_secs
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.http.timeout),
                user_agent: file.user_agent.unwrap_or(defaults.http.user_agent),
            },
        };
        config.validate()?;
        tracing::debug!(path = %path.as_ref().display(), "Loaded configuration file");
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.scan.workers == 0 {
            return Err(ConfigError::InvalidValue(
                "scan_workers".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        if self.scan.probe_timeout.is_zero() || self.scan.sweep_budget.is_zero() {
            return Err(ConfigError::InvalidValue(
                "scan timeouts".to_string(),
                "must be non-zero".to_string(),
            ));
        }
        if self.http.timeout.is_zero() {
            return Err(ConfigError::InvalidValue(
                "http_timeout".to_string(),
                "must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_user_agent() -> String {
    format!("reconflow/{}", env!("CARGO_PKG_VERSION"))
}

/// Parse an optional environment variable, erroring only when it is set and malformed.
fn env_parse<T>(name: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue(name.to_string(), format!("{}", e))),
        Err(_) => Ok(None),
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    /// Parse `key=value` lines (one per line, `#` comments allowed).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut config = Self::default();
        for line in s.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, value) = line.split_once('=').ok_or_else(|| {
                ConfigError::InvalidValue(line.to_string(), "expected key=value".to_string())
            })?;
            let (key, value) = (key.trim(), value.trim());
            let invalid = |e: &dyn std::fmt::Display| {
                ConfigError::InvalidValue(key.to_string(), format!("{}", e))
            };
            match key {
                "verbosity" => {
                    config.verbosity = value
                        .parse::<u8>()
                        .map_err(|e| invalid(&e))?
                        .min(MAX_VERBOSITY)
                }
                "debug" => config.debug = parse_bool(value),
                "probe_timeout_ms" => {
                    config.scan.probe_timeout =
                        Duration::from_millis(value.parse().map_err(|e| invalid(&e))?)
                }
                "sweep_budget_ms" => {
                    config.scan.sweep_budget =
                        Duration::from_millis(value.parse().map_err(|e| invalid(&e))?)
                }
                "scan_workers" => config.scan.workers = value.parse().map_err(|e| invalid(&e))?,
                "http_timeout_secs" => {
                    config.http.timeout =
                        Duration::from_secs(value.parse().map_err(|e| invalid(&e))?)
                }
                "user_agent" => config.http.user_agent = value.to_string(),
                other => {
                    return Err(ConfigError::InvalidValue(
                        other.to_string(),
                        "unknown key".to_string(),
                    ))
                }
            }
        }
        config.validate()?;
        Ok(config)
    }
}
