//! Reading and status board configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Default lag, in seconds, between the store's last update and the instant read.
pub const DEFAULT_SAMPLE_OFFSET_SECS: u64 = 3;

/// Configuration for latest-value reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ReadingConfig {
    /// How far before the store's last update to read, in seconds.
    ///
    /// The store appears to lag behind its own last-update marker by a few
    /// seconds; 3 is an observed workaround, not a measured write latency.
    #[validate(range(max = 3600, message = "Sample offset cannot exceed 3600 seconds"))]
    pub sample_offset_secs: u64,
}

impl Default for ReadingConfig {
    fn default() -> Self {
        Self {
            sample_offset_secs: DEFAULT_SAMPLE_OFFSET_SECS,
        }
    }
}

/// Defaults for status board graphs.
///
/// # Examples
///
/// ```
/// use shared::config::GraphConfig;
///
/// let config = GraphConfig::default();
/// assert_eq!(config.title, "Clarice");
/// assert_eq!(config.series, vec!["sensor1", "sensor2"]);
/// assert_eq!(config.window_secs, 15 * 60);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct GraphConfig {
    /// Graph title.
    #[validate(length(min = 1, message = "Graph title cannot be empty"))]
    pub title: String,

    /// Series plotted when a request names none.
    #[validate(length(min = 1, message = "At least one series is required"))]
    pub series: Vec<String>,

    /// Length of the plotted window, in seconds.
    #[validate(range(min = 1, max = 86_400, message = "Window must be between 1 and 86400 seconds"))]
    pub window_secs: u64,

    /// Seconds between plotted points.
    #[validate(range(min = 1, max = 3600, message = "Step must be between 1 and 3600 seconds"))]
    pub step_secs: u64,

    /// How often dashboards should poll, in seconds.
    #[validate(range(min = 1, message = "Refresh interval must be positive"))]
    pub refresh_secs: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            title: "Clarice".to_string(),
            series: vec!["sensor1".to_string(), "sensor2".to_string()],
            window_secs: 15 * 60,
            step_secs: 3,
            refresh_secs: 15,
        }
    }
}
