use anyhow::Context;
use bar_features::cli::Cli;
use bar_features::pipeline;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = cli.pipeline_config().context("invalid date range")?;
    let provider = cli
        .provider
        .build()
        .with_context(|| format!("failed to set up the {:?} provider", cli.provider))?;

    let summary = pipeline::run(&config, provider.as_ref()).await?;

    eprintln!("OK -> {}", summary.output.display());
    eprintln!(
        "Rows: {} | From {} to {}",
        summary.rows, summary.first_date, summary.last_date
    );
    Ok(())
}

/// Logs go to stderr. `RUST_LOG` takes precedence over `--debug`.
fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}
