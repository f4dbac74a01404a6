use anyhow::Context;
use clap::Parser;
use price_pulse::cli::{print_config, Cli, Commands};
use price_pulse::config::Config;
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = if Path::new(&cli.config).exists() {
        Config::load(&cli.config)
            .with_context(|| format!("Invalid configuration in {}", cli.config))?
    } else {
        eprintln!("Warning: {} not found, using bundled default configuration", cli.config);
        Config::bundled()?
    };

    // Initialize telemetry
    let _telemetry = price_pulse::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Watch(args) => {
            tracing::info!("Starting price watch");
            args.execute(config).await?;
        }
        Commands::Once(args) => {
            args.execute(config).await?;
        }
        Commands::Config => {
            print_config(&config);
        }
    }

    Ok(())
}
