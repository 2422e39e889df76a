//! Clarice CLI
//!
//! Command-line interface for reading sensor values straight from the RRD store.
//!
//! # Usage
//!
//! ```bash
//! clarice --help
//! clarice latest sensor2
//! clarice graph --series sensor1,sensor2 --window 900
//! clarice statusboard --output /home/pi/output/data.json --interval 3
//! ```

#![deny(unsafe_code)]

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use shared::config::{
    StoreConfig, DEFAULT_RRDTOOL_BIN, DEFAULT_RRD_PATH, DEFAULT_SAMPLE_OFFSET_SECS,
    DEFAULT_STORE_TIMEOUT_MS,
};
use shared::models::{GraphDocument, ReadingDocument, SensorName};
use shared::query::{graph_document, latest_reading, series_window, WindowQuery};
use shared::storage::{ConsolidationFunction, RrdtoolStore, SensorStore};
use shared::validator::Validate;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Clarice CLI - Sensor readings from the command line
#[derive(Parser)]
#[command(name = "clarice")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    store: StoreArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Where and how to reach the RRD file.
#[derive(Args, Debug)]
struct StoreArgs {
    /// RRD file to read
    #[arg(long, env = "CLARICE_RRD_PATH", default_value = DEFAULT_RRD_PATH)]
    rrd_path: String,

    /// rrdtool binary
    #[arg(long, env = "CLARICE_RRDTOOL_BIN", default_value = DEFAULT_RRDTOOL_BIN)]
    rrdtool_bin: String,

    /// Timeout per rrdtool call, in milliseconds
    #[arg(long, env = "CLARICE_STORE_TIMEOUT_MS", default_value_t = DEFAULT_STORE_TIMEOUT_MS)]
    timeout_ms: u64,
}

impl StoreArgs {
    fn store(&self) -> Result<RrdtoolStore> {
        let config = StoreConfig {
            rrd_path: self.rrd_path.clone(),
            rrdtool_bin: self.rrdtool_bin.clone(),
            timeout_ms: self.timeout_ms,
        };
        config.validate().context("Invalid store configuration")?;
        Ok(RrdtoolStore::from_config(&config))
    }
}

/// Window and layout of a status board graph.
#[derive(Args, Debug)]
struct GraphArgs {
    /// Series to plot, comma separated
    #[arg(long, value_delimiter = ',', default_value = "sensor1,sensor2")]
    series: Vec<String>,

    /// Window length in seconds
    #[arg(long, default_value_t = 900, value_parser = clap::value_parser!(u64).range(1..=86_400))]
    window: u64,

    /// Seconds between points
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u64).range(1..=3600))]
    step: u64,

    /// Consolidation function (average, min, max, last)
    #[arg(long, default_value = "average")]
    cf: ConsolidationFunction,

    /// Graph title
    #[arg(long, default_value = "Clarice")]
    title: String,

    /// Refresh hint for the dashboard, in seconds
    #[arg(long, default_value_t = 15)]
    refresh: u64,
}

impl GraphArgs {
    fn query(&self) -> WindowQuery {
        WindowQuery::new(
            self.series.iter().map(SensorName::new).collect(),
            self.window,
        )
        .with_step(self.step)
        .with_function(self.cf)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the latest value of a sensor
    Latest {
        /// Sensor name
        #[arg(default_value = SensorName::DEFAULT)]
        name: String,

        /// Seconds before the last update to read
        #[arg(long, env = "CLARICE_SAMPLE_OFFSET_SECS", default_value_t = DEFAULT_SAMPLE_OFFSET_SECS)]
        offset: u64,
    },
    /// Print a status board graph of recent values
    Graph(GraphArgs),
    /// Keep a status board graph file up to date
    Statusboard {
        #[command(flatten)]
        graph: GraphArgs,

        /// File to write
        #[arg(short, long, default_value = "data.json")]
        output: PathBuf,

        /// Seconds between exports
        #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u64).range(1..))]
        interval: u64,

        /// Export once and exit
        #[arg(long)]
        once: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays pure JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Latest { name, offset }) => {
            let store = cli.store.store()?;
            let document = read_latest(&store, &name, offset).await?;
            println!("{}", serde_json::to_string(&document)?);
        }
        Some(Commands::Graph(graph)) => {
            let store = cli.store.store()?;
            let document = render_graph(&store, &graph).await?;
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
        Some(Commands::Statusboard {
            graph,
            output,
            interval,
            once,
        }) => {
            let store = cli.store.store()?;
            run_statusboard(&store, &graph, &output, Duration::from_secs(interval), once).await?;
        }
        None => {
            println!("Clarice CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

async fn read_latest(store: &dyn SensorStore, name: &str, offset: u64) -> Result<ReadingDocument> {
    let name = SensorName::from_param(Some(name));
    let reading = latest_reading(store, &name, offset)
        .await
        .with_context(|| format!("Failed to read latest value of '{name}'"))?;
    Ok(reading.into())
}

async fn render_graph(store: &dyn SensorStore, graph: &GraphArgs) -> Result<GraphDocument> {
    let windows = series_window(store, &graph.query())
        .await
        .context("Failed to export series window")?;
    Ok(graph_document(&graph.title, graph.refresh, &windows))
}

/// Writes the document next to `output` and renames it into place, so readers
/// never see a partial file.
async fn write_document(output: &Path, document: &GraphDocument) -> Result<()> {
    let json = serde_json::to_vec(document)?;

    let mut staging = output.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = PathBuf::from(staging);

    tokio::fs::write(&staging, &json)
        .await
        .with_context(|| format!("Failed to write {}", staging.display()))?;
    tokio::fs::rename(&staging, output)
        .await
        .with_context(|| format!("Failed to replace {}", output.display()))?;
    Ok(())
}

async fn export_once(store: &dyn SensorStore, graph: &GraphArgs, output: &Path) -> Result<()> {
    let document = render_graph(store, graph).await?;
    write_document(output, &document).await?;
    tracing::debug!(output = %output.display(), "Status board updated");
    Ok(())
}

async fn run_statusboard(
    store: &dyn SensorStore,
    graph: &GraphArgs,
    output: &Path,
    interval: Duration,
    once: bool,
) -> Result<()> {
    if once {
        return export_once(store, graph, output).await;
    }

    tracing::info!(output = %output.display(), ?interval, "Status board export starting");
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = export_once(store, graph, output).await {
                    tracing::warn!(error = %format!("{e:#}"), "Status board export failed");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received Ctrl+C, stopping status board export");
                return Ok(());
            }
        }
    }
}
