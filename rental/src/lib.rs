//! # DriveEase Rental
//!
//! The car-rental booking wizard, written as a reducer.
//!
//! ```text
//! Selection → Preferences → AddOns → NearbyReview → Payment → Confirmation
//!     ▲                                                            │
//!     └──────────────────────── new booking ───────────────────────┘
//! ```
//!
//! A session picks a vehicle from the [`Catalog`], which starts a
//! [`DraftBooking`](draft::DraftBooking). Each step refines the draft and keeps
//! its running total current. `ConfirmAndPay` runs the simulated payment as an
//! effect; when it resolves the booking is prepended to the session's
//! [`BookingLedger`] and the flow shows the confirmation.
//!
//! Every session owns its own [`Store`]: draft, ledger and identity are never
//! shared between sessions.
//!
//! ## Example
//!
//! ```no_run
//! use driveease_rental::{session_store, BookingAction, Catalog, Config, Step};
//! use driveease_core::environment::SystemClock;
//! use std::sync::Arc;
//!
//! # async fn demo() {
//! let catalog = Arc::new(Catalog::demo());
//! let store = session_store(&Config::default(), catalog, Arc::new(SystemClock));
//! let _ = store.send(BookingAction::SelectVehicle { vehicle_id: "s1".into() }).await;
//! assert_eq!(store.state(|s| s.step).await, Step::Preferences);
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod draft;
pub mod error;
pub mod flow;
pub mod ledger;
pub mod payment;
pub mod reducer;
pub mod session;
pub mod types;

pub use catalog::{Catalog, CategoryFilter, Vehicle};
pub use config::Config;
pub use dashboard::Dashboard;
pub use draft::{DraftAccumulator, PickupOption};
pub use error::{CatalogError, FlowError};
pub use flow::{BookingAction, BookingState, FlowSnapshot, PaymentStatus, Step};
pub use ledger::BookingLedger;
pub use payment::{PaymentSimulator, SimulatedPayment};
pub use reducer::{BookingEnvironment, BookingFlowReducer};
pub use session::{Capability, Role, Session};
pub use types::{Booking, BookingId, BookingStatus, Money};

use driveease_core::environment::{Clock, MonotonicIds};
use driveease_runtime::Store;
use std::sync::Arc;

/// Store type driving one booking session
pub type BookingStore = Store<BookingState, BookingAction, BookingEnvironment, BookingFlowReducer>;

/// Creates the store for a new session
///
/// The ledger is seeded according to `config`, and booking references continue
/// after the highest reference already in it.
#[must_use]
pub fn session_store(
    config: &Config,
    catalog: Arc<Catalog>,
    clock: Arc<dyn Clock>,
) -> BookingStore {
    let ledger = if config.seed_bookings {
        BookingLedger::seeded()
    } else {
        BookingLedger::new()
    };

    let env = BookingEnvironment::new(
        catalog,
        clock,
        Arc::new(MonotonicIds::starting_at(ledger.next_sequence())),
        SimulatedPayment::shared(config.payment_latency),
    );

    Store::new(BookingState::with_ledger(ledger), BookingFlowReducer::new(), env)
}

/// Loads the configured catalog, or the built-in one when no path is set
///
/// # Errors
///
/// Propagates [`CatalogError`] from reading or validating the file.
pub fn load_catalog(config: &Config) -> Result<Catalog, CatalogError> {
    match &config.catalog_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading catalog");
            Catalog::load(path)
        },
        None => Ok(Catalog::demo()),
    }
}
