//! Wizard steps, the session state and the actions the flow accepts.

use crate::draft::{DraftAccumulator, PickupOption, PriceBreakdown};
use crate::error::FlowError;
use crate::ledger::BookingLedger;
use crate::session::{Identity, Role, Session};
use crate::types::{AddOnId, Booking, BookingId, Money, VehicleId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// ============================================================================
// Steps
// ============================================================================

/// A screen of the booking wizard
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    /// Choosing a vehicle
    #[default]
    Selection,
    /// Pickup option
    Preferences,
    /// Optional extras
    AddOns,
    /// Route assistant with nearby services
    NearbyReview,
    /// Price summary and payment
    Payment,
    /// Booking confirmed
    Confirmation,
}

impl Step {
    /// Every step in wizard order
    pub const ORDER: [Self; 6] = [
        Self::Selection,
        Self::Preferences,
        Self::AddOns,
        Self::NearbyReview,
        Self::Payment,
        Self::Confirmation,
    ];

    const fn index(self) -> usize {
        self as usize
    }

    /// The following step, if any
    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::ORDER.get(self.index() + 1).copied()
    }

    /// The preceding step, if any
    #[must_use]
    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).map(|i| Self::ORDER[i])
    }

    /// Steps that only make sense with a draft in progress
    #[must_use]
    pub const fn requires_draft(self) -> bool {
        matches!(
            self,
            Self::Preferences | Self::AddOns | Self::NearbyReview | Self::Payment
        )
    }

    /// Whether navigation may move from `self` to `to`
    ///
    /// Selection is reachable from anywhere. Otherwise only neighbouring steps
    /// are, Confirmation is never a navigation target and its only exit is
    /// Selection.
    #[must_use]
    pub fn can_transition_to(self, to: Self) -> bool {
        match (self, to) {
            (_, Self::Selection) => true,
            (Self::Confirmation, _) | (_, Self::Confirmation) => false,
            _ => self.next() == Some(to) || self.previous() == Some(to),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Selection => "Selection",
            Self::Preferences => "Preferences",
            Self::AddOns => "AddOns",
            Self::NearbyReview => "NearbyReview",
            Self::Payment => "Payment",
            Self::Confirmation => "Confirmation",
        };
        f.write_str(label)
    }
}

// ============================================================================
// State
// ============================================================================

/// Progress of the simulated card authorization
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Nothing in flight
    #[default]
    Idle,
    /// Waiting for the authorization to resolve
    Authorizing {
        /// Reference reserved for the booking being paid for
        booking_id: BookingId,
    },
}

impl PaymentStatus {
    /// `true` while an authorization is in flight
    #[must_use]
    pub const fn is_authorizing(&self) -> bool {
        matches!(self, Self::Authorizing { .. })
    }
}

/// Everything one user session owns
#[derive(Clone, Debug, Default)]
pub struct BookingState {
    /// Identity and capabilities
    pub session: Session,
    /// Current wizard step
    pub step: Step,
    /// Booking being assembled
    pub draft: DraftAccumulator,
    /// Finalized bookings
    pub ledger: BookingLedger,
    /// Authorization progress
    pub payment: PaymentStatus,
    /// Booking shown on the confirmation screen
    pub confirmed: Option<Booking>,
    /// Most recent rejected action
    pub last_error: Option<FlowError>,
}

impl BookingState {
    /// A fresh session over an existing ledger
    #[must_use]
    pub fn with_ledger(ledger: BookingLedger) -> Self {
        Self {
            ledger,
            ..Self::default()
        }
    }

    /// Serializable view of the session for display
    #[must_use]
    pub fn snapshot(&self) -> FlowSnapshot {
        let draft = self.draft.current();
        FlowSnapshot {
            step: self.step,
            identity: self.session.identity().cloned(),
            vehicle_name: draft.map(|d| d.vehicle_name.clone()),
            pickup: draft.map(|d| d.pickup),
            add_ons: draft
                .map(|d| d.add_ons.keys().cloned().collect())
                .unwrap_or_default(),
            running_total: draft.map(|d| d.total),
            breakdown: draft.map(crate::draft::DraftBooking::breakdown),
            authorizing: self.payment.is_authorizing(),
            confirmed: self.confirmed.clone(),
            ledger: self.ledger.list().cloned().collect(),
            last_error: self.last_error.clone(),
        }
    }
}

/// Display data for the current wizard screen
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FlowSnapshot {
    /// Current step
    pub step: Step,
    /// Signed-in user
    pub identity: Option<Identity>,
    /// Vehicle being booked
    pub vehicle_name: Option<String>,
    /// Chosen pickup option
    pub pickup: Option<PickupOption>,
    /// Selected add-ons
    pub add_ons: Vec<AddOnId>,
    /// Draft total
    pub running_total: Option<Money>,
    /// Itemized draft price
    pub breakdown: Option<PriceBreakdown>,
    /// Payment in flight
    pub authorizing: bool,
    /// Last confirmed booking
    pub confirmed: Option<Booking>,
    /// Bookings, newest first
    pub ledger: Vec<Booking>,
    /// Most recent rejection
    pub last_error: Option<FlowError>,
}

// ============================================================================
// Actions
// ============================================================================

/// Inputs of the booking flow
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingAction {
    /// Simulated sign-in
    SignIn {
        /// Role to sign in as
        role: Role,
    },
    /// Forget the identity
    SignOut,
    /// Begin a booking for a vehicle
    SelectVehicle {
        /// Catalog key of the vehicle
        vehicle_id: VehicleId,
    },
    /// Pick how the vehicle is handed over
    ChoosePickup {
        /// Pickup option
        option: PickupOption,
    },
    /// Replace the add-on selection
    SetAddOns {
        /// Selected add-on keys
        ids: BTreeSet<AddOnId>,
    },
    /// Flip one add-on
    ToggleAddOn {
        /// Add-on key
        id: AddOnId,
    },
    /// Move to another step
    Navigate {
        /// Target step
        to: Step,
    },
    /// Start the payment
    ConfirmAndPay,
    /// The payment resolved (fed back by the payment effect)
    PaymentAuthorized {
        /// The committed booking
        booking: Booking,
    },
}
