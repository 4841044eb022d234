//! Livestock records CLI - entry point
//!
//! Opens the record store described by the configuration and dispatches to
//! a subcommand.

mod cli;
mod commands;
mod config;
mod storage;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands};
use config::Config;

fn main() {
    // .env must be loaded before clap reads env-backed arguments
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Verbose mode sets debug level
    init_tracing(cli.verbose);

    let config = Config::from_env(cli.db.clone());
    tracing::debug!(?config, "Configuration loaded");

    let result = commands::open_store(&config).and_then(|db| match cli.command {
        Commands::Status(args) => commands::status::execute(args, &db),
        Commands::Alerts(args) => commands::alerts::execute(args, &db, &config),
        Commands::Dashboard(args) => commands::dashboard::execute(args, &db, &config),
        Commands::Recommend(args) => commands::recommend::execute(args, &db),
        Commands::Login(args) => commands::login::execute(args, &db, &config),
        Commands::Logout => commands::login::logout(&config),
        Commands::Treat(args) => commands::treat::execute(args, &db, &config),
    });

    if let Err(e) = result {
        tracing::error!("Command failed: {:#}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing subscriber
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "debug".to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();
}
