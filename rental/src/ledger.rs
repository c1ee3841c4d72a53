//! In-memory record of finalized bookings, newest first.

use crate::types::{Booking, BookingId, BookingStatus, Money, VehicleId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Ordered, append-at-head list of bookings
///
/// There is no update or delete: a booking stays exactly as it was when the
/// payment completed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingLedger {
    bookings: VecDeque<Booking>,
}

impl BookingLedger {
    /// First sequence number handed out when the ledger has no numbered bookings
    pub const FIRST_SEQUENCE: u64 = 1001;

    /// Creates an empty ledger
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bookings: VecDeque::new(),
        }
    }

    /// A ledger holding the two demonstration bookings
    #[must_use]
    pub fn seeded() -> Self {
        let mut ledger = Self::new();
        for booking in demo_bookings() {
            ledger.bookings.push_back(booking);
        }
        ledger
    }

    /// Inserts a booking at the head
    pub fn append(&mut self, booking: Booking) {
        tracing::debug!(booking_id = %booking.id, "Booking appended to ledger");
        self.bookings.push_front(booking);
    }

    /// Every booking, newest first
    pub fn list(&self) -> impl ExactSizeIterator<Item = &Booking> {
        self.bookings.iter()
    }

    /// Number of bookings
    #[must_use]
    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    /// `true` if there are no bookings
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }

    /// The most recently appended booking
    #[must_use]
    pub fn latest(&self) -> Option<&Booking> {
        self.bookings.front()
    }

    /// Looks up a booking by reference
    #[must_use]
    pub fn find(&self, id: &BookingId) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.id == *id)
    }

    /// The first ongoing booking
    #[must_use]
    pub fn active(&self) -> Option<&Booking> {
        self.bookings
            .iter()
            .find(|b| b.status == BookingStatus::Ongoing)
    }

    /// Sum of every booking's price
    #[must_use]
    pub fn revenue(&self) -> Money {
        self.bookings.iter().map(|b| b.total_price).sum()
    }

    /// One past the highest `BK-<n>` reference, for seeding an id generator
    #[must_use]
    pub fn next_sequence(&self) -> u64 {
        self.bookings
            .iter()
            .filter_map(|b| b.id.sequence())
            .max()
            .map_or(Self::FIRST_SEQUENCE, |highest| highest + 1)
    }
}

fn demo_bookings() -> [Booking; 2] {
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();
    [
        Booking {
            id: BookingId::from("BK-101"),
            vehicle_id: VehicleId::from("h1"),
            vehicle_name: "Maruti Suzuki Swift".to_string(),
            status: BookingStatus::Completed,
            date: date(2023, 12, 1),
            total_price: Money::rupees(3600),
        },
        Booking {
            id: BookingId::from("BK-102"),
            vehicle_id: VehicleId::from("s1"),
            vehicle_name: "Tata Nexon EV".to_string(),
            status: BookingStatus::Ongoing,
            date: date(2024, 5, 20),
            total_price: Money::rupees(7500),
        },
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn booking(seq: u64) -> Booking {
        Booking {
            id: BookingId::from_sequence(seq),
            vehicle_id: VehicleId::from("s1"),
            vehicle_name: "Tata Nexon EV".to_string(),
            status: BookingStatus::Upcoming,
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            total_price: Money::rupees(2750),
        }
    }

    #[test]
    fn append_inserts_at_head_and_keeps_prior_order() {
        let mut ledger = BookingLedger::seeded();
        let before: Vec<_> = ledger.list().cloned().collect();

        ledger.append(booking(1001));

        let after: Vec<_> = ledger.list().cloned().collect();
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(after[0].id.as_str(), "BK-1001");
        assert_eq!(&after[1..], &before[..]);
        assert_eq!(ledger.latest().unwrap().id, BookingId::from_sequence(1001));
    }

    #[test]
    fn seeded_ledger_matches_demo_data() {
        let ledger = BookingLedger::seeded();
        let ids: Vec<_> = ledger.list().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["BK-101", "BK-102"]);
        assert_eq!(ledger.active().unwrap().id.as_str(), "BK-102");
        assert_eq!(ledger.revenue(), Money::rupees(11_100));
    }

    #[test]
    fn next_sequence_follows_highest_reference() {
        assert_eq!(BookingLedger::new().next_sequence(), BookingLedger::FIRST_SEQUENCE);
        assert_eq!(BookingLedger::seeded().next_sequence(), 103);

        let mut ledger = BookingLedger::seeded();
        ledger.append(booking(2000));
        assert_eq!(ledger.next_sequence(), 2001);
    }

    #[test]
    fn find_by_reference() {
        let ledger = BookingLedger::seeded();
        assert_eq!(
            ledger.find(&BookingId::from("BK-101")).unwrap().vehicle_name,
            "Maruti Suzuki Swift"
        );
        assert!(ledger.find(&BookingId::from("BK-999")).is_none());
    }

    #[test]
    fn serializes_as_a_plain_array() {
        let json = serde_json::to_value(BookingLedger::seeded()).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["id"], "BK-101");
        assert_eq!(json[1]["status"], "Ongoing");
    }
}
