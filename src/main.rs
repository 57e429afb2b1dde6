//! oems - Odd-Even Merge Sort Network
//!
//! Reads eight values, sorts them on the message-passing network, and
//! prints the input echo followed by the sorted values.
//!
//! Usage: `oems [--config <file>] [input-file]`

use anyhow::{bail, Context};
use oems_rs::config::{AppConfig, LoggingConfig};
use oems_rs::{read_values_from_path, write_report, NetworkRuntime, Topology};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    input: Option<PathBuf>,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        let mut parsed = Args::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-c" | "--config" => {
                    let path = args.next().context("--config needs a path")?;
                    parsed.config = Some(PathBuf::from(path));
                }
                "-h" | "--help" => {
                    println!("Usage: oems [--config <file>] [input-file]");
                    std::process::exit(0);
                }
                flag if flag.starts_with('-') => bail!("unknown option {}", flag),
                path => {
                    if parsed.input.is_some() {
                        bail!("more than one input file given");
                    }
                    parsed.input = Some(PathBuf::from(path));
                }
            }
        }
        Ok(parsed)
    }
}

/// Logs go to stderr (and optionally a file); stdout carries only the result.
fn init_logging(logging: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .with_context(|| format!("invalid log level {:?}", logging.level))?;

    let (file_layer, guard) = match &logging.file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let name = path
                .file_name()
                .with_context(|| format!("log file {:?} has no file name", path))?;
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(guard)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse(std::env::args().skip(1))?;

    let (config, config_path) = match &args.config {
        Some(path) => (AppConfig::load(path)?, Some(path.clone())),
        None => AppConfig::discover()?,
    };
    let config = match args.input {
        Some(path) => config.with_input_path(path),
        None => config,
    };

    let _log_guard = init_logging(&config.logging)?;
    match &config_path {
        Some(path) => tracing::info!("Loaded config from {:?}", path),
        None => tracing::info!("No config file found, using defaults"),
    }

    let runtime = NetworkRuntime::new(Topology::odd_even_merge_8(), config.workers)
        .context("Failed to start sorting network")?;

    let values = read_values_from_path(&config.input.path, config.input.format)?;

    let report = runtime.run(&values).context("Sorting run aborted")?;

    write_report(std::io::stdout().lock(), &report, config.output.format)?;
    Ok(())
}
