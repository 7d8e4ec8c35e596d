// ABOUTME: CLI argument parsing and command routing for washbook
//
// Provides command-line interface for:
// - Listing service packages per vehicle type (services)
// - Probing slot availability for a date (slots)
// - Walking through the booking wizard interactively (book)

pub mod book;
pub mod services;
pub mod slots;
pub mod util;

use crate::models::VehicleCategory;
use crate::wizard::FlowChoice;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Booking client for the CarWash backend
#[derive(Parser)]
#[command(name = "washbook")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend base URL (overrides config and WASHBOOK_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// List service packages for a vehicle type
    Services(ServicesArgs),

    /// Show available time slots for a date
    Slots(SlotsArgs),

    /// Walk through the booking wizard interactively
    Book(BookArgs),
}

/// Arguments for the services command
#[derive(clap::Args)]
pub struct ServicesArgs {
    /// Vehicle type to filter by (mobil/motor)
    #[arg(long)]
    pub vehicle_type: VehicleCategory,
}

/// Arguments for the slots command
#[derive(clap::Args)]
pub struct SlotsArgs {
    /// Date to check, e.g. 2025-06-15
    #[arg(long)]
    pub date: NaiveDate,
}

/// Arguments for the book command
#[derive(clap::Args)]
pub struct BookArgs {
    /// Flow preset to run (standard/vehicle-category/express);
    /// defaults to the configured flow
    #[arg(long)]
    pub flow: Option<FlowChoice>,
}
