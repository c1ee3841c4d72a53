//! DriveEase walkthrough
//!
//! Drives one session through the booking wizard and prints what each screen
//! would show.

use anyhow::Context;
use driveease_core::environment::SystemClock;
use driveease_rental::types::AddOnId;
use driveease_rental::{
    load_catalog, session_store, BookingAction, BookingState, BookingStore, Config, Dashboard,
    PickupOption, Role, Step,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Log filter used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "driveease=debug,driveease_rental=debug,driveease_runtime=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!(?config, "Configuration loaded");

    let catalog = Arc::new(load_catalog(&config).context("failed to load vehicle catalog")?);
    let store = session_store(&config, Arc::clone(&catalog), Arc::new(SystemClock));

    println!("=== DriveEase booking walkthrough ===\n");
    println!("Featured vehicles:");
    for vehicle in catalog.featured() {
        println!("  {} {} ({}/day)", vehicle.id, vehicle.name, vehicle.price_per_day);
    }

    let _ = store.send(BookingAction::SignIn { role: Role::Renter }).await?;

    step(&store, ">>> Select s1", BookingAction::SelectVehicle {
        vehicle_id: "s1".into(),
    })
    .await?;
    step(&store, ">>> Self pickup", BookingAction::ChoosePickup {
        option: PickupOption::SelfPickup,
    })
    .await?;
    step(&store, ">>> Add-ons", BookingAction::Navigate { to: Step::AddOns }).await?;
    step(&store, ">>> GPS + child seat", BookingAction::SetAddOns {
        ids: BTreeSet::from([AddOnId::from("gps"), AddOnId::from("childseat")]),
    })
    .await?;
    step(&store, ">>> Route assistant", BookingAction::Navigate {
        to: Step::NearbyReview,
    })
    .await?;
    for service in catalog.nearby_services() {
        println!("  {} {} ({})", service.kind, service.name, service.distance);
    }
    step(&store, ">>> Payment", BookingAction::Navigate { to: Step::Payment }).await?;

    println!("\n>>> Confirm and pay ({:?} simulated latency)", config.payment_latency);
    let mut payment = store.send(BookingAction::ConfirmAndPay).await?;
    payment
        .wait_with_timeout(config.payment_latency + Duration::from_secs(5))
        .await
        .context("payment did not complete")?;
    if let Some(booking) = store.state(|s| s.confirmed.clone()).await {
        println!("Booking {} confirmed: {}", booking.id, booking.total_price);
    }

    let snapshot = store.state(BookingState::snapshot).await;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    let dashboard = store
        .state(|s| Dashboard::for_session(&s.session, &catalog, &s.ledger))
        .await;
    println!("\nDashboard:\n{}", serde_json::to_string_pretty(&dashboard)?);

    Ok(())
}

async fn step(store: &BookingStore, label: &str, action: BookingAction) -> anyhow::Result<()> {
    println!("\n{label}");
    let _ = store.send(action).await?;
    let snapshot = store.state(BookingState::snapshot).await;
    if let Some(error) = &snapshot.last_error {
        println!("  rejected: {error}");
    }
    match (&snapshot.vehicle_name, snapshot.running_total) {
        (Some(name), Some(total)) => println!("  [{}] {name}: {total}", snapshot.step),
        _ => println!("  [{}]", snapshot.step),
    }
    Ok(())
}
