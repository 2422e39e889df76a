//! Server configuration module.
//!
//! Handles loading configuration from environment variables with sensible defaults.

use anyhow::{Context, Result};
use shared::config::{ReadingConfig, StoreConfig};
use std::net::SocketAddr;
use validator::Validate;

/// Server configuration.
///
/// Configuration values can be set via environment variables:
/// - `CLARICE_HOST`: The host address to bind to (default: "0.0.0.0")
/// - `CLARICE_PORT`: The port to listen on (default: 8080)
/// - `CLARICE_RRD_PATH`: The RRD file to read (default: "/home/pi/clarice/clarice.rrd")
/// - `CLARICE_RRDTOOL_BIN`: The `rrdtool` binary (default: "rrdtool")
/// - `CLARICE_STORE_TIMEOUT_MS`: Timeout per store call (default: 5000)
/// - `CLARICE_SAMPLE_OFFSET_SECS`: Seconds before the last update to read (default: 3)
#[derive(Debug, Clone)]
pub struct Config {
    /// The host address to bind to.
    pub host: String,
    /// The port to listen on.
    pub port: u16,
    /// Store client settings.
    pub store: StoreConfig,
    /// Latest-value read settings.
    pub reading: ReadingConfig,
}

impl Config {
    /// Creates a new configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `CLARICE_PORT`, `CLARICE_STORE_TIMEOUT_MS`, or `CLARICE_SAMPLE_OFFSET_SECS`
    ///   is set but cannot be parsed as a number
    /// - A value is outside its allowed range
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let host = std::env::var("CLARICE_HOST").unwrap_or(defaults.host);
        let port = parse_env("CLARICE_PORT")?.unwrap_or(defaults.port);
        format!("{host}:{port}")
            .parse::<SocketAddr>()
            .with_context(|| format!("Invalid CLARICE_HOST: {host}"))?;

        let store = StoreConfig {
            rrd_path: std::env::var("CLARICE_RRD_PATH").unwrap_or(defaults.store.rrd_path),
            rrdtool_bin: std::env::var("CLARICE_RRDTOOL_BIN")
                .unwrap_or(defaults.store.rrdtool_bin),
            timeout_ms: parse_env("CLARICE_STORE_TIMEOUT_MS")?
                .unwrap_or(defaults.store.timeout_ms),
        };
        store.validate().context("Invalid store configuration")?;

        let reading = ReadingConfig {
            sample_offset_secs: parse_env("CLARICE_SAMPLE_OFFSET_SECS")?
                .unwrap_or(defaults.reading.sample_offset_secs),
        };
        reading
            .validate()
            .context("Invalid reading configuration")?;

        Ok(Self {
            host,
            port,
            store,
            reading,
        })
    }

    /// Returns the socket address for binding.
    ///
    /// # Panics
    ///
    /// Panics if the host and port combination cannot be parsed as a valid socket address.
    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid socket address from config")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            store: StoreConfig::default(),
            reading: ReadingConfig::default(),
        }
    }
}

/// Reads and parses an optional environment variable.
fn parse_env<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    std::env::var(key)
        .ok()
        .map(|raw| raw.trim().parse::<T>())
        .transpose()
        .with_context(|| format!("Invalid value for {key}"))
}
