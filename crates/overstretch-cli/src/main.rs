use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use overstretch_core::HostConfig;

mod commands;

#[derive(Parser)]
#[command(name = "overstretch")]
#[command(author, version, about = "Simulate and inspect the overstretch edge-effect engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Host configuration file (defaults to ~/.config/overstretch/config.toml)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Settings file with the tunables (overrides the host configuration)
    #[arg(short = 's', long, global = true)]
    settings: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive one edge effect through a gesture and print every frame
    Simulate(commands::simulate::SimulateArgs),
    /// Print the resolved tunables as JSON
    Config,
    /// Write the stock tunables to the settings file
    Defaults {
        /// Print to stdout instead of writing the file
        #[arg(long)]
        print: bool,
    },
    /// Parse a per-package override list
    Overrides {
        /// Override list; read from the settings file when omitted
        raw: Option<String>,
        /// Show only the record that applies to this package
        #[arg(short = 'p', long)]
        package: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = match &cli.config {
        Some(path) => HostConfig::load_from(path)?,
        None => HostConfig::load()?,
    };
    if let Some(path) = cli.settings {
        config.settings.path = path;
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Simulate(args) => commands::simulate::run(&config, args).await,
        Commands::Config => commands::config::run(&config),
        Commands::Defaults { print } => commands::defaults::run(&config, print),
        Commands::Overrides { raw, package } => {
            commands::overrides::run(&config, raw.as_deref(), package.as_deref())
        }
    }
}
