//! Command-line surface for canary-stage.
//!
//! All provisioning logic lives in `canary-stage-core`; this module parses
//! arguments, loads the manifest and wires the real clients into the batch
//! runner.
use crate::load_manifest::load_manifest;
use anyhow::Result;
use canary_stage_core::factory::CanaryFactoryClient;
use canary_stage_core::run_batch;
use canary_stage_core::uploader::S3Uploader;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Create canary tokens in bulk and stage them into S3 buckets.
#[derive(Parser, Debug)]
#[clap(
    name = "canary-stage",
    version,
    about = "Create canary tokens from a CSV/TSV manifest and upload them to S3"
)]
pub struct Cli {
    /// A separated value file with all of the information. This can be a CSV or TSV.
    #[clap(long)]
    pub filename: PathBuf,

    /// Log verbosity.
    #[clap(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Async entrypoint shared by `main` and the integration tests.
pub async fn run(cli: Cli) -> Result<()> {
    let rows = load_manifest(&cli.filename)?;

    let factory = CanaryFactoryClient::from_env();
    let uploader = S3Uploader::new();

    tracing::info!(manifest = ?cli.filename, rows = rows.len(), "Starting token staging");
    let report = run_batch(rows, &factory, &uploader).await;
    tracing::info!(?report, "Token staging finished");
    Ok(())
}
