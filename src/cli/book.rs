// ABOUTME: CLI book command - interactive booking wizard over stdin
//
// Renders each step from the wizard's draft (the draft is canonical; this
// is only a projection of it) and feeds user input back through the
// session, which talks to the backend.

use super::util::{format_rupiah, period_label};
use super::BookArgs;
use crate::api::BookingApiClient;
use crate::config::AppConfig;
use crate::models::{PaymentMethod, VehicleCategory, VehicleDetails};
use crate::session::{BookingBackend, BookingSession, SessionError};
use crate::wizard::StepKind;
use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveTime};
use std::io::{self, Write};
use std::time::Duration;

pub async fn execute(args: BookArgs, config: &AppConfig) -> Result<()> {
    let flow = args.flow.unwrap_or(config.wizard.flow);
    let client = BookingApiClient::new(
        &config.api.base_url,
        Duration::from_secs(config.api.timeout_secs),
    )?;
    let mut session = BookingSession::new(client, flow.to_plan());
    let today = Local::now().date_naive();

    run_wizard(&mut session, today).await
}

/// Whether the wizard loop keeps going after a step handler ran
enum StepOutcome {
    Done,
    Continue,
}

async fn run_wizard<B: BookingBackend>(
    session: &mut BookingSession<B>,
    today: NaiveDate,
) -> Result<()> {
    loop {
        if let Some(id) = session.wizard().booking_id() {
            println!("\nBooking confirmed! Your booking id is {id}.");
            return Ok(());
        }

        let wizard = session.wizard();
        println!(
            "\nStep {}/{}: {}",
            wizard.step_number(),
            wizard.total_steps(),
            wizard.current_step().title()
        );
        if let Some(error) = wizard.last_error() {
            println!("  ! {error}");
        }

        let outcome = match wizard.current_step() {
            StepKind::VehicleCategory => step_vehicle_category(session).await,
            StepKind::Service => step_service(session).await,
            StepKind::Schedule => step_schedule(session, today).await,
            StepKind::VehicleDetails => step_vehicle_details(session).await,
            StepKind::Payment => step_payment(session).await,
            StepKind::Review => step_review(session).await,
        };

        match outcome {
            Ok(StepOutcome::Done) => return Ok(()),
            Ok(StepOutcome::Continue) => {}
            Err(e) => match e.downcast::<SessionError>() {
                // Recoverable: stay on the step and let the user retry
                Ok(session_error) => println!("  ! {session_error}"),
                Err(other) => return Err(other),
            },
        }
    }
}

async fn step_vehicle_category<B: BookingBackend>(
    session: &mut BookingSession<B>,
) -> Result<StepOutcome> {
    let input = prompt("Vehicle type (mobil/motor)")?;
    match input.parse::<VehicleCategory>() {
        Ok(category) => {
            session.choose_vehicle_category(category)?;
            session.advance().await?;
        }
        Err(e) => println!("  ! {e}"),
    }
    Ok(StepOutcome::Continue)
}

async fn step_service<B: BookingBackend>(session: &mut BookingSession<B>) -> Result<StepOutcome> {
    if session.wizard().catalog().is_none() {
        // Flows without a category step still need a filter for the
        // catalog endpoint; ask without recording it in the draft.
        let category = match session.wizard().draft().vehicle_category {
            Some(category) => category,
            None => loop {
                let input = prompt("Show services for (mobil/motor)")?;
                match input.parse::<VehicleCategory>() {
                    Ok(category) => break category,
                    Err(e) => println!("  ! {e}"),
                }
            },
        };
        session.load_services(category).await?;
    }

    let services = session
        .wizard()
        .catalog()
        .map(|board| board.services.clone())
        .unwrap_or_default();
    if services.is_empty() {
        return handle_empty_catalog(session).await;
    }

    for (i, service) in services.iter().enumerate() {
        println!(
            "  {}. {} - {} ({} min)",
            i + 1,
            service.name,
            format_rupiah(service.price),
            service.duration_minutes
        );
    }

    let input = prompt("Service number")?;
    match input.parse::<usize>().ok().and_then(|n| services.get(n.checked_sub(1)?)) {
        Some(service) => {
            session.choose_service(service.clone())?;
            session.advance().await?;
        }
        None => println!("  ! pick a number from the list"),
    }
    Ok(StepOutcome::Continue)
}

/// What the user chose after an empty catalog was shown.
#[derive(Debug, PartialEq, Eq)]
enum EmptyCatalogChoice {
    Retry(VehicleCategory),
    Back,
    Quit,
    Invalid,
}

fn empty_catalog_choice(input: &str) -> EmptyCatalogChoice {
    match input.trim().to_ascii_lowercase().as_str() {
        "back" | "b" => EmptyCatalogChoice::Back,
        "quit" | "q" => EmptyCatalogChoice::Quit,
        other => match other.parse::<VehicleCategory>() {
            Ok(category) => EmptyCatalogChoice::Retry(category),
            Err(_) => EmptyCatalogChoice::Invalid,
        },
    }
}

/// An empty catalog is a valid backend answer, not an error; the user has
/// to pick a way out before the loop may run the service step again.
async fn handle_empty_catalog<B: BookingBackend>(
    session: &mut BookingSession<B>,
) -> Result<StepOutcome> {
    println!("  No services available for that vehicle type.");

    let input = prompt("Try another type, go back, or quit (mobil/motor/back/quit)")?;
    match empty_catalog_choice(&input) {
        EmptyCatalogChoice::Retry(category) => {
            if session.wizard().plan().contains(StepKind::VehicleCategory) {
                session.choose_vehicle_category(category)?;
            }
            session.load_services(category).await?;
        }
        EmptyCatalogChoice::Back => {
            session.go_back()?;
        }
        EmptyCatalogChoice::Quit => {
            println!("Booking abandoned; nothing was submitted.");
            return Ok(StepOutcome::Done);
        }
        EmptyCatalogChoice::Invalid => println!("  ! pick mobil, motor, back, or quit"),
    }
    Ok(StepOutcome::Continue)
}

async fn step_schedule<B: BookingBackend>(
    session: &mut BookingSession<B>,
    today: NaiveDate,
) -> Result<StepOutcome> {
    let input = prompt("Date (YYYY-MM-DD)")?;
    let date = match input.parse::<NaiveDate>() {
        Ok(date) => date,
        Err(_) => {
            println!("  ! enter a date like 2025-06-15");
            return Ok(StepOutcome::Continue);
        }
    };
    session.choose_date(date, today).await?;

    let times: Vec<NaiveTime> = session
        .wizard()
        .slots()
        .map(|board| board.times.clone())
        .unwrap_or_default();
    if times.is_empty() {
        println!("  No slots available on {date}; pick another date.");
        return Ok(StepOutcome::Continue);
    }

    for time in &times {
        println!("  {} ({})", time.format("%H:%M"), period_label(*time));
    }

    let input = prompt("Time (HH:MM)")?;
    match NaiveTime::parse_from_str(&input, "%H:%M") {
        Ok(time) => {
            session.choose_time(time)?;
            session.advance().await?;
        }
        Err(_) => println!("  ! enter a time like 10:00"),
    }
    Ok(StepOutcome::Continue)
}

async fn step_vehicle_details<B: BookingBackend>(
    session: &mut BookingSession<B>,
) -> Result<StepOutcome> {
    let default_type = session
        .wizard()
        .draft()
        .vehicle_category
        .map(|c| c.as_wire_str().to_string());

    let vehicle_type = match default_type {
        Some(category) => {
            let input = prompt(&format!("Vehicle type [{category}]"))?;
            if input.is_empty() { category } else { input }
        }
        None => prompt("Vehicle type")?,
    };

    let vehicle = VehicleDetails {
        vehicle_type,
        brand: prompt("Brand")?,
        model: prompt("Model")?,
        license_plate: prompt("License plate")?,
        color: prompt("Color")?,
    };
    session.set_vehicle_details(vehicle)?;

    let notes = prompt("Special notes (optional)")?;
    session.set_notes(notes)?;

    session.advance().await?;
    Ok(StepOutcome::Continue)
}

async fn step_payment<B: BookingBackend>(session: &mut BookingSession<B>) -> Result<StepOutcome> {
    for (i, method) in PaymentMethod::all().iter().enumerate() {
        println!("  {}. {}", i + 1, method);
    }

    let input = prompt("Payment method")?;
    let chosen = input
        .parse::<usize>()
        .ok()
        .and_then(|n| PaymentMethod::all().get(n.checked_sub(1)?).copied())
        .or_else(|| input.parse::<PaymentMethod>().ok());

    match chosen {
        Some(method) => {
            session.choose_payment_method(method)?;
            session.advance().await?;
        }
        None => println!("  ! pick a number or a method name"),
    }
    Ok(StepOutcome::Continue)
}

async fn step_review<B: BookingBackend>(session: &mut BookingSession<B>) -> Result<StepOutcome> {
    render_summary(session);

    let input = prompt("Confirm booking? (yes/back/quit)")?;
    match input.to_ascii_lowercase().as_str() {
        "yes" | "y" => match session.submit().await {
            Ok(id) => {
                println!("\nBooking confirmed! Your booking id is {id}.");
                Ok(StepOutcome::Done)
            }
            Err(e) => {
                println!("  ! {e}");
                Ok(StepOutcome::Continue)
            }
        },
        "back" | "b" => {
            session.go_back()?;
            Ok(StepOutcome::Continue)
        }
        "quit" | "q" => {
            println!("Booking abandoned; nothing was submitted.");
            Ok(StepOutcome::Done)
        }
        _ => Ok(StepOutcome::Continue),
    }
}

fn render_summary<B: BookingBackend>(session: &BookingSession<B>) {
    let draft = session.wizard().draft();

    if let Some(service) = &draft.service {
        println!("  Service:  {} ({} min)", service.name, service.duration_minutes);
    }
    if let (Some(date), Some(time)) = (draft.date, draft.time) {
        println!("  When:     {date} at {}", time.format("%H:%M"));
    }
    println!(
        "  Vehicle:  {} {} ({})",
        draft.vehicle.brand, draft.vehicle.model, draft.vehicle.license_plate
    );
    let payment = draft.payment_method.unwrap_or(PaymentMethod::Cash);
    println!("  Payment:  {payment}");
    println!("  Total:    {}", format_rupiah(draft.total_amount()));
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        anyhow::bail!("input closed before the booking was finished");
    }
    Ok(line.trim().to_string())
}
