//! Simulated card authorization.
//!
//! The prototype has no payment provider: authorizing a draft waits a fixed
//! amount of time and always succeeds. The trait keeps the latency out of the
//! reducer so tests can swap in an instant implementation.

use crate::draft::DraftBooking;
use crate::types::{Booking, BookingId, BookingStatus};
use chrono::NaiveDate;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

/// Turns a draft into a paid booking
pub trait PaymentSimulator: Send + Sync {
    /// Authorizes payment for `draft`, resolving to the committed booking
    ///
    /// The booking carries `booking_id`, status `Upcoming`, `date` and the
    /// draft's final total.
    fn authorize(
        &self,
        draft: DraftBooking,
        booking_id: BookingId,
        date: NaiveDate,
    ) -> Pin<Box<dyn Future<Output = Booking> + Send>>;
}

/// Builds the booking a successful authorization commits
#[must_use]
pub fn committed_booking(draft: DraftBooking, booking_id: BookingId, date: NaiveDate) -> Booking {
    Booking {
        id: booking_id,
        vehicle_id: draft.vehicle_id,
        vehicle_name: draft.vehicle_name,
        status: BookingStatus::Upcoming,
        date,
        total_price: draft.total,
    }
}

/// Authorization that sleeps for a fixed latency, then succeeds
#[derive(Clone, Debug)]
pub struct SimulatedPayment {
    latency: Duration,
}

impl SimulatedPayment {
    /// Latency of the prototype's payment screen
    pub const DEFAULT_LATENCY: Duration = Duration::from_millis(2000);

    /// Shortest latency accepted
    pub const MIN_LATENCY: Duration = Duration::from_millis(1);

    /// Creates a simulator; zero latency is raised to [`Self::MIN_LATENCY`]
    #[must_use]
    pub fn new(latency: Duration) -> Self {
        Self {
            latency: latency.max(Self::MIN_LATENCY),
        }
    }

    /// Creates an Arc-wrapped instance for sharing
    #[must_use]
    pub fn shared(latency: Duration) -> Arc<dyn PaymentSimulator> {
        Arc::new(Self::new(latency))
    }

    /// Configured latency
    #[must_use]
    pub const fn latency(&self) -> Duration {
        self.latency
    }
}

impl Default for SimulatedPayment {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LATENCY)
    }
}

impl PaymentSimulator for SimulatedPayment {
    fn authorize(
        &self,
        draft: DraftBooking,
        booking_id: BookingId,
        date: NaiveDate,
    ) -> Pin<Box<dyn Future<Output = Booking> + Send>> {
        let latency = self.latency;
        Box::pin(async move {
            tokio::time::sleep(latency).await;

            tracing::info!(
                booking_id = %booking_id,
                amount = draft.total.as_rupees(),
                "Simulated payment authorized"
            );
            metrics::counter!("driveease.payments.authorized").increment(1);

            committed_booking(draft, booking_id, date)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::draft::DraftAccumulator;
    use crate::types::{Money, VehicleId};

    fn draft() -> DraftBooking {
        let mut acc = DraftAccumulator::new();
        acc.start(&Catalog::demo(), &VehicleId::from("s1")).unwrap().clone()
    }

    #[test]
    fn zero_latency_is_clamped() {
        assert_eq!(
            SimulatedPayment::new(Duration::ZERO).latency(),
            SimulatedPayment::MIN_LATENCY
        );
        assert_eq!(
            SimulatedPayment::default().latency(),
            Duration::from_millis(2000)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn authorization_waits_for_latency() {
        let payment = SimulatedPayment::new(Duration::from_secs(2));
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let started = tokio::time::Instant::now();

        let booking = payment
            .authorize(draft(), BookingId::from_sequence(1001), date)
            .await;

        assert!(started.elapsed() >= Duration::from_secs(2));
        assert_eq!(booking.id.as_str(), "BK-1001");
        assert_eq!(booking.status, BookingStatus::Upcoming);
        assert_eq!(booking.total_price, Money::rupees(2500));
        assert_eq!(booking.date, date);
        assert_eq!(booking.vehicle_name, "Tata Nexon EV");
    }
}
