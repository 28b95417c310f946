//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "binary"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Binary entrypoint for the weather replay daemon."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use tokio::signal;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use wxr_common::config::AppConfig;
use wxr_common::logging::{init_tracing, LogFormat};
use wxr_common::TimeOfDay;
use wxr_core::{load_path, PlaybackEngine, PlaybackSession};

const DEFAULT_CONFIG_CANDIDATES: [&str; 2] = ["configs/wxrd.toml", "configs/example.toml"];

#[derive(Debug, Parser)]
#[command(
    author,
    disable_version_flag = true,
    about = "Replay recorded temperature and power series as a live feed",
    long_about = None
)]
struct Cli {
    #[arg(long, value_name = "FILE", help = "Path to configuration file")]
    config: Option<PathBuf>,

    #[arg(long, value_name = "FILE", help = "Weather document to replay (yaml, json or csv)")]
    data: Option<PathBuf>,

    #[arg(long, value_name = "MS", help = "Tick interval in milliseconds")]
    tick_ms: Option<u64>,

    #[arg(long, value_name = "HH:MM:SS", help = "Align playback start to this time instead of now")]
    start_at: Option<TimeOfDay>,

    #[arg(long, value_enum, help = "Console log format")]
    log_format: Option<CliLogFormat>,

    #[arg(
        short = 'V',
        long = "version",
        action = ArgAction::SetTrue,
        help = "Print version information and exit"
    )]
    version: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogFormat {
    Json,
    Pretty,
}

impl From<CliLogFormat> for LogFormat {
    fn from(value: CliLogFormat) -> Self {
        match value {
            CliLogFormat::Json => LogFormat::StructuredJson,
            CliLogFormat::Pretty => LogFormat::Pretty,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.version {
        println!("wxrd {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut config = load_config(&cli)?;
    apply_overrides(&mut config, &cli)?;
    init_tracing("wxrd", &config.logging)?;

    let dataset = load_path(&config.source.path)
        .with_context(|| format!("failed to load weather source {}", config.source.path.display()))?;
    let engine = PlaybackEngine::from_config(dataset, &config.playback)?;
    let session = PlaybackSession::new(engine, config.playback.channel_capacity)?;
    let mut records = session.subscribe();
    let handle = session.start();

    let interrupted = loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                info!("interrupt received; cancelling playback");
                break true;
            }
            received = records.recv() => match received {
                Ok(record) => {
                    let line = serde_json::to_string(&record)?;
                    writeln!(io::stdout(), "{}", line).context("failed to write record")?;
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "output fell behind playback; records dropped");
                }
                Err(RecvError::Closed) => break false,
            }
        }
    };

    let summary = if interrupted {
        handle.cancel().await?
    } else {
        handle.join().await?
    };
    info!(
        outcome = ?summary.outcome,
        emitted = summary.emitted,
        average_temperature = ?summary.average_temperature,
        cumulative_energy = summary.cumulative_energy,
        "playback complete"
    );
    Ok(())
}

/// An explicit `--config` must exist; otherwise fall back to defaults when no
/// candidate file is present.
fn load_config(cli: &Cli) -> Result<AppConfig> {
    if let Some(path) = &cli.config {
        return AppConfig::load(&[path]);
    }
    let has_candidate = DEFAULT_CONFIG_CANDIDATES
        .iter()
        .any(|candidate| PathBuf::from(candidate).exists());
    if has_candidate || std::env::var_os(AppConfig::ENV_CONFIG_PATH).is_some() {
        AppConfig::load(&DEFAULT_CONFIG_CANDIDATES)
    } else {
        Ok(AppConfig::default())
    }
}

fn apply_overrides(config: &mut AppConfig, cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.data {
        config.source.path = path.clone();
    }
    if let Some(tick_ms) = cli.tick_ms {
        if tick_ms == 0 {
            return Err(anyhow!("tick-ms must be greater than zero"));
        }
        config.playback.tick_interval = Duration::from_millis(tick_ms);
    }
    if let Some(start_at) = cli.start_at {
        config.playback.start_at = Some(start_at);
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format.into();
    }
    config.validate()
}
