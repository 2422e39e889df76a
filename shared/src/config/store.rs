//! Store connection configuration.
//!
//! Where the RRD file lives, which `rrdtool` binary reads it, and how long a
//! single read may take.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Default RRD file location on the pit Raspberry Pi.
pub const DEFAULT_RRD_PATH: &str = "/home/pi/clarice/clarice.rrd";

/// Default `rrdtool` binary, resolved through `PATH`.
pub const DEFAULT_RRDTOOL_BIN: &str = "rrdtool";

/// Default per-call timeout in milliseconds.
pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 5000;

/// Configuration for the rrdtool-backed store.
///
/// # Examples
///
/// ```
/// use shared::config::StoreConfig;
/// use validator::Validate;
///
/// let config = StoreConfig::default();
/// assert!(config.validate().is_ok());
/// assert_eq!(config.timeout().as_secs(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct StoreConfig {
    /// Path of the RRD file.
    #[validate(length(min = 1, message = "RRD path cannot be empty"))]
    pub rrd_path: String,

    /// Path or name of the `rrdtool` binary.
    #[validate(length(min = 1, message = "rrdtool binary cannot be empty"))]
    pub rrdtool_bin: String,

    /// Maximum duration of a single store call, in milliseconds.
    #[validate(range(min = 1, max = 60_000, message = "Timeout must be between 1 and 60000 ms"))]
    pub timeout_ms: u64,
}

impl StoreConfig {
    /// Returns the per-call timeout as a `Duration`.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            rrd_path: DEFAULT_RRD_PATH.to_string(),
            rrdtool_bin: DEFAULT_RRDTOOL_BIN.to_string(),
            timeout_ms: DEFAULT_STORE_TIMEOUT_MS,
        }
    }
}
