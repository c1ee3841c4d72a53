//! Value types shared by every part of the booking flow.
//!
//! Identifiers are plain string newtypes because the catalog uses short
//! human-readable keys (`s1`, `gps`) and booking references are rendered as
//! `BK-<n>`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

// ============================================================================
// Money
// ============================================================================

/// An amount in whole rupees
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    /// Zero rupees
    pub const ZERO: Self = Self(0);

    /// Creates an amount from whole rupees
    #[must_use]
    pub const fn rupees(amount: u64) -> Self {
        Self(amount)
    }

    /// Returns the amount in whole rupees
    #[must_use]
    pub const fn as_rupees(self) -> u64 {
        self.0
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "₹{}", self.0)
    }
}

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier from any string-like value
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Catalog key of a vehicle (e.g. `s1`)
    VehicleId
);

string_id!(
    /// Catalog key of an add-on (e.g. `gps`)
    AddOnId
);

string_id!(
    /// Catalog key of a nearby service
    ServiceId
);

string_id!(
    /// Reference of a finalized booking (e.g. `BK-1001`)
    BookingId
);

impl BookingId {
    const PREFIX: &'static str = "BK-";

    /// Builds the reference for a sequence number
    #[must_use]
    pub fn from_sequence(sequence: u64) -> Self {
        Self(format!("{}{sequence}", Self::PREFIX))
    }

    /// The numeric part of a `BK-<n>` reference, if it has one
    #[must_use]
    pub fn sequence(&self) -> Option<u64> {
        self.0.strip_prefix(Self::PREFIX)?.parse().ok()
    }
}

// ============================================================================
// Bookings
// ============================================================================

/// Lifecycle status shown for a booking
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingStatus {
    /// The rental is in progress
    Ongoing,
    /// The rental has ended
    Completed,
    /// Paid for, not started yet
    Upcoming,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Ongoing => "Ongoing",
            Self::Completed => "Completed",
            Self::Upcoming => "Upcoming",
        };
        f.write_str(label)
    }
}

/// A finalized booking as stored in the ledger
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Booking reference
    pub id: BookingId,
    /// Booked vehicle
    pub vehicle_id: VehicleId,
    /// Vehicle display name at booking time
    pub vehicle_name: String,
    /// Current status
    pub status: BookingStatus,
    /// Date the booking was committed
    pub date: NaiveDate,
    /// Amount paid
    pub total_price: Money,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_sums_and_displays_in_rupees() {
        let total: Money = [Money::rupees(2500), Money::rupees(100), Money::rupees(150)]
            .iter()
            .sum();
        assert_eq!(total, Money::rupees(2750));
        assert_eq!(total.to_string(), "₹2750");
        assert_eq!(Money::rupees(u64::MAX) + Money::rupees(1), Money::rupees(u64::MAX));
    }

    #[test]
    fn booking_id_sequence_round_trip() {
        let id = BookingId::from_sequence(1001);
        assert_eq!(id.as_str(), "BK-1001");
        assert_eq!(id.sequence(), Some(1001));
        assert_eq!(BookingId::new("legacy").sequence(), None);
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&VehicleId::from("s1")).unwrap_or_default();
        assert_eq!(json, "\"s1\"");
    }
}
