// ABOUTME: CLI slots command - show bookable time slots for a date

use super::util::period_label;
use super::SlotsArgs;
use crate::api::BookingApiClient;
use crate::config::AppConfig;
use anyhow::Result;
use std::time::Duration;

pub async fn execute(args: SlotsArgs, config: &AppConfig) -> Result<()> {
    let client = BookingApiClient::new(
        &config.api.base_url,
        Duration::from_secs(config.api.timeout_secs),
    )?;

    let slots = client.available_slots(args.date).await?;

    if slots.is_empty() {
        println!("No slots available on {}.", args.date);
        return Ok(());
    }

    println!("Available slots on {}:", args.date);
    for time in &slots {
        println!("  {} ({})", time.format("%H:%M"), period_label(*time));
    }

    Ok(())
}
