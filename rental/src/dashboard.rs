//! Renter and owner dashboards derived from session, catalog and ledger.

use crate::catalog::{Availability, Catalog};
use crate::ledger::BookingLedger;
use crate::session::{Capability, Session};
use crate::types::{Booking, BookingId, Money, VehicleId};
use serde::Serialize;

/// Greeting used when a renter's name is unknown
pub const FALLBACK_NAME: &str = "Authorized User";

/// What a renter sees after signing in
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RenterDashboard {
    /// Name to greet
    pub greeting_name: String,
    /// Bookings made so far
    pub total_rides: usize,
    /// Reference of the ongoing rental
    pub active_booking: Option<BookingId>,
    /// Bookings, newest first
    pub history: Vec<Booking>,
}

/// One row of the owner's fleet table
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FleetRow {
    /// Vehicle key
    pub vehicle_id: VehicleId,
    /// Vehicle name
    pub name: String,
    /// Daily price
    pub price_per_day: Money,
    /// Current availability
    pub availability: Availability,
}

/// What a hub owner sees after signing in
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OwnerDashboard {
    /// Vehicles in the fleet
    pub fleet_size: usize,
    /// Vehicles currently rented out
    pub active_deployments: usize,
    /// Vehicles in the workshop
    pub in_maintenance: usize,
    /// Takings across the ledger
    pub revenue: Money,
    /// Per-vehicle status
    pub fleet: Vec<FleetRow>,
}

/// The dashboard matching a session's capabilities
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum Dashboard {
    /// Booking history view
    Renter(RenterDashboard),
    /// Fleet management view
    Owner(OwnerDashboard),
}

impl Dashboard {
    /// Builds the dashboard for a session, `None` for anonymous sessions
    #[must_use]
    pub fn for_session(
        session: &Session,
        catalog: &Catalog,
        ledger: &BookingLedger,
    ) -> Option<Self> {
        if session.can(Capability::ManageFleet) {
            Some(Self::Owner(OwnerDashboard::build(catalog, ledger)))
        } else if session.can(Capability::ViewBookingHistory) {
            let name = session.identity().map(|i| i.name.as_str());
            Some(Self::Renter(RenterDashboard::build(name, ledger)))
        } else {
            None
        }
    }
}

impl RenterDashboard {
    /// Builds the renter view
    #[must_use]
    pub fn build(name: Option<&str>, ledger: &BookingLedger) -> Self {
        let greeting_name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(FALLBACK_NAME)
            .to_string();

        Self {
            greeting_name,
            total_rides: ledger.len(),
            active_booking: ledger.active().map(|b| b.id.clone()),
            history: ledger.list().cloned().collect(),
        }
    }
}

impl OwnerDashboard {
    /// Builds the owner view
    #[must_use]
    pub fn build(catalog: &Catalog, ledger: &BookingLedger) -> Self {
        let fleet = catalog
            .vehicles()
            .iter()
            .map(|v| FleetRow {
                vehicle_id: v.id.clone(),
                name: v.name.clone(),
                price_per_day: v.price_per_day,
                availability: v.availability,
            })
            .collect();

        Self {
            fleet_size: catalog.vehicles().len(),
            active_deployments: catalog.with_availability(Availability::Rented).count(),
            in_maintenance: catalog.with_availability(Availability::Maintenance).count(),
            revenue: ledger.revenue(),
            fleet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Role;

    #[test]
    fn anonymous_session_has_no_dashboard() {
        let session = Session::anonymous();
        let dashboard =
            Dashboard::for_session(&session, &Catalog::demo(), &BookingLedger::seeded());
        assert!(dashboard.is_none());
    }

    #[test]
    fn renter_dashboard_summarizes_ledger() {
        let mut session = Session::anonymous();
        session.sign_in(Role::Renter);

        let dashboard =
            Dashboard::for_session(&session, &Catalog::demo(), &BookingLedger::seeded());
        let Some(Dashboard::Renter(renter)) = dashboard else {
            unreachable!("renter session yields renter dashboard");
        };
        assert_eq!(renter.greeting_name, "Test User");
        assert_eq!(renter.total_rides, 2);
        assert_eq!(renter.active_booking, Some(BookingId::from("BK-102")));
        assert_eq!(renter.history.len(), 2);
    }

    #[test]
    fn renter_greeting_falls_back() {
        let renter = RenterDashboard::build(Some("  "), &BookingLedger::new());
        assert_eq!(renter.greeting_name, FALLBACK_NAME);
        assert_eq!(renter.total_rides, 0);
        assert!(renter.active_booking.is_none());
    }

    #[test]
    fn owner_dashboard_counts_fleet_states() {
        let mut session = Session::anonymous();
        session.sign_in(Role::Owner);

        let dashboard =
            Dashboard::for_session(&session, &Catalog::demo(), &BookingLedger::seeded());
        let Some(Dashboard::Owner(owner)) = dashboard else {
            unreachable!("owner session yields owner dashboard");
        };
        assert_eq!(owner.fleet_size, 12);
        assert_eq!(owner.active_deployments, 3);
        assert_eq!(owner.in_maintenance, 2);
        assert_eq!(owner.revenue, Money::rupees(11_100));
        assert_eq!(owner.fleet[0].name, "Tata Nexon EV");
    }
}
