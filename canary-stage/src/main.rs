use anyhow::Result;
use canary_stage::cli::{run, Cli};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::from(cli.log_level))
        .init();
    tracing::debug!(?cli, "CLI arguments parsed, invoking run");

    let result = run(cli).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "canary-stage exited with error");
    }
    result
}
