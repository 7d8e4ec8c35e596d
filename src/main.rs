// ABOUTME: Main entry point for washbook
//
// Binary: washbook
// Usage: washbook <COMMAND>
// - services: list service packages for a vehicle type
// - slots: show available time slots for a date
// - book: walk through the booking wizard interactively

#![allow(missing_docs)]

use anyhow::Result;
use clap::Parser;
use washbook::cli::{self, Cli, Commands};
use washbook::config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();

    let args = Cli::parse();

    let mut config = AppConfig::load()?;
    if let Some(base_url) = args.base_url {
        config.api.base_url = base_url;
        config.validate()?;
    }

    match args.command {
        Commands::Services(services_args) => cli::services::execute(services_args, &config).await,
        Commands::Slots(slots_args) => cli::slots::execute(slots_args, &config).await,
        Commands::Book(book_args) => cli::book::execute(book_args, &config).await,
    }
}

/// Log to stderr so prompts and output on stdout stay clean;
/// level comes from WASHBOOK_LOG (default: warnings plus our info)
fn setup_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("WASHBOOK_LOG")
        .unwrap_or_else(|_| EnvFilter::new("warn,washbook=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
