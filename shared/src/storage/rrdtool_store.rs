//! rrdtool-backed sensor store.
//!
//! Reads an RRD file by running the `rrdtool` binary with an explicit
//! argument vector. No shell is involved, and series names are checked
//! against RRD data-source naming rules before they reach the command line.

use super::sensor_store::{ExportRequest, SensorStore, StoreError};
use crate::config::StoreConfig;
use crate::models::Timestamp;
use crate::xport::{parse_xport, Export};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Marker rrdtool prints when a DEF names a data source the file lacks.
const MISSING_DS_MARKER: &str = "No DS called '";

/// `rrdtool`-backed sensor store implementation.
#[derive(Debug, Clone)]
pub struct RrdtoolStore {
    binary: PathBuf,
    rrd_path: PathBuf,
    timeout: Duration,
}

impl RrdtoolStore {
    /// Creates a store reading `rrd_path` with the `rrdtool` found on `PATH`
    /// and a five second timeout.
    #[must_use]
    pub fn new(rrd_path: impl Into<PathBuf>) -> Self {
        Self {
            binary: PathBuf::from("rrdtool"),
            rrd_path: rrd_path.into(),
            timeout: Duration::from_secs(5),
        }
    }

    /// Creates a store from configuration.
    #[must_use]
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(&config.rrd_path)
            .with_binary(&config.rrdtool_bin)
            .with_timeout(config.timeout())
    }

    /// Sets the path of the `rrdtool` binary.
    #[must_use]
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Sets how long a single `rrdtool` invocation may take.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the RRD file path.
    #[must_use]
    pub fn rrd_path(&self) -> &Path {
        &self.rrd_path
    }

    /// Builds the `rrdtool xport` arguments for a request.
    fn export_args(&self, request: &ExportRequest) -> Result<Vec<String>, StoreError> {
        let mut args = vec![
            "xport".to_string(),
            "--start".to_string(),
            request.start.to_string(),
            "--end".to_string(),
            request.end.to_string(),
        ];
        if let Some(step) = request.step {
            args.push("--step".to_string());
            args.push(step.to_string());
        }

        let rrd = escape_colons(&self.rrd_path.to_string_lossy());
        for (index, spec) in request.series.iter().enumerate() {
            if !spec.name.is_valid_data_source() {
                return Err(StoreError::SeriesNotFound(spec.name.to_string()));
            }
            args.push(format!("DEF:s{index}={rrd}:{}:{}", spec.name, spec.function));
            args.push(format!("XPORT:s{index}:{}", spec.name));
        }

        Ok(args)
    }

    /// Runs `rrdtool` and returns its stdout.
    async fn run(&self, args: &[String]) -> Result<String, StoreError> {
        tracing::debug!(binary = %self.binary.display(), ?args, "Running rrdtool");

        let mut command = Command::new(&self.binary);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                tracing::warn!(binary = %self.binary.display(), error = %e, "Failed to start rrdtool");
                return Err(StoreError::Unavailable(format!(
                    "failed to run {}: {e}",
                    self.binary.display()
                )));
            }
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "rrdtool timed out");
                return Err(StoreError::Timeout(self.timeout));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::warn!(status = %output.status, %stderr, "rrdtool failed");
            return Err(classify_failure(&stderr));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| StoreError::Malformed(format!("rrdtool output is not UTF-8: {e}")))
    }
}

#[async_trait]
impl SensorStore for RrdtoolStore {
    async fn last_update(&self) -> Result<Timestamp, StoreError> {
        let args = ["last".to_string(), self.rrd_path.to_string_lossy().into_owned()];
        let stdout = self.run(&args).await?;
        stdout
            .parse::<Timestamp>()
            .map_err(|e| StoreError::Malformed(e.to_string()))
    }

    async fn export(&self, request: &ExportRequest) -> Result<Export, StoreError> {
        let args = self.export_args(request)?;
        let stdout = self.run(&args).await?;
        Ok(parse_xport(&stdout)?)
    }
}

/// Maps rrdtool's error text to a store error.
fn classify_failure(stderr: &str) -> StoreError {
    if let Some(rest) = stderr
        .find(MISSING_DS_MARKER)
        .map(|at| &stderr[at + MISSING_DS_MARKER.len()..])
    {
        let name = rest.split('\'').next().unwrap_or_default();
        return StoreError::SeriesNotFound(name.to_string());
    }

    if stderr.is_empty() {
        StoreError::Unavailable("rrdtool exited with an error".to_string())
    } else {
        StoreError::Unavailable(stderr.to_string())
    }
}

/// Escapes `:` in a path for use inside a DEF.
fn escape_colons(path: &str) -> String {
    path.replace(':', "\\:")
}
