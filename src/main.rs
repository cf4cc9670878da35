use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use xunity_installer::{cli, config::Config};

fn init_logging(level: &str, verbose: bool) {
    let default_level = if verbose { "debug" } else { level };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    init_logging(&config.general.log_level, cli.verbose);

    // No arguments, `--gui` or `gui` open the window
    cli.execute(config).await
}
