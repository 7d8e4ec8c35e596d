// ABOUTME: CLI services command - list the catalog for a vehicle type

use super::util::format_rupiah;
use super::ServicesArgs;
use crate::api::BookingApiClient;
use crate::config::AppConfig;
use anyhow::Result;
use std::time::Duration;

pub async fn execute(args: ServicesArgs, config: &AppConfig) -> Result<()> {
    let client = BookingApiClient::new(
        &config.api.base_url,
        Duration::from_secs(config.api.timeout_secs),
    )?;

    let services = client.services_by_vehicle_type(args.vehicle_type).await?;

    if services.is_empty() {
        println!("No services available for {}.", args.vehicle_type);
        return Ok(());
    }

    println!("Services for {}:", args.vehicle_type);
    for service in &services {
        println!(
            "  [{}] {} - {} ({} min)",
            service.id,
            service.name,
            format_rupiah(service.price),
            service.duration_minutes
        );
    }

    Ok(())
}
