//! The draft booking accumulated across the wizard steps.

use crate::catalog::Catalog;
use crate::error::{FlowError, Result};
use crate::flow::Step;
use crate::types::{AddOnId, Money, VehicleId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// How the renter receives the vehicle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupOption {
    /// Delivered to the renter's address
    HomeDelivery,
    /// Handed over at an agreed meetup point
    MeetupPoint,
    /// Collected from the hub
    #[default]
    SelfPickup,
}

impl PickupOption {
    /// Flat fee charged for home delivery
    pub const DELIVERY_SURCHARGE: Money = Money::rupees(300);

    /// Amount this option adds to the booking
    #[must_use]
    pub const fn surcharge(self) -> Money {
        match self {
            Self::HomeDelivery => Self::DELIVERY_SURCHARGE,
            Self::MeetupPoint | Self::SelfPickup => Money::ZERO,
        }
    }
}

/// Itemized price of a draft
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    /// Vehicle daily price
    pub base: Money,
    /// Pickup option surcharge
    pub pickup_surcharge: Money,
    /// Sum of the selected add-ons
    pub add_ons: Money,
    /// Everything together
    pub total: Money,
}

/// A partially built booking
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftBooking {
    /// Selected vehicle
    pub vehicle_id: VehicleId,
    /// Vehicle display name
    pub vehicle_name: String,
    /// Vehicle daily price
    pub base_price: Money,
    /// Chosen pickup option
    pub pickup: PickupOption,
    /// Matched add-ons and their prices
    pub add_ons: BTreeMap<AddOnId, Money>,
    /// Running total, kept in step with every change
    pub total: Money,
}

impl DraftBooking {
    fn recompute_total(&mut self) {
        self.total = self.breakdown().total;
    }

    /// Itemized price
    #[must_use]
    pub fn breakdown(&self) -> PriceBreakdown {
        let add_ons: Money = self.add_ons.values().sum();
        let pickup_surcharge = self.pickup.surcharge();
        PriceBreakdown {
            base: self.base_price,
            pickup_surcharge,
            add_ons,
            total: self.base_price + pickup_surcharge + add_ons,
        }
    }

    /// Whether an add-on is currently selected
    #[must_use]
    pub fn has_add_on(&self, id: &AddOnId) -> bool {
        self.add_ons.contains_key(id)
    }
}

/// Holds at most one draft for a session
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DraftAccumulator {
    draft: Option<DraftBooking>,
}

impl DraftAccumulator {
    /// Creates an empty accumulator
    #[must_use]
    pub const fn new() -> Self {
        Self { draft: None }
    }

    /// Starts a fresh draft for a vehicle, replacing any unfinished one
    ///
    /// # Errors
    ///
    /// [`FlowError::NotFound`] if the vehicle is not in the catalog. The
    /// previous draft, if any, is kept.
    pub fn start(&mut self, catalog: &Catalog, vehicle_id: &VehicleId) -> Result<&DraftBooking> {
        let vehicle = catalog
            .vehicle(vehicle_id)
            .ok_or_else(|| FlowError::vehicle_not_found(vehicle_id))?;

        Ok(self.draft.insert(DraftBooking {
            vehicle_id: vehicle.id.clone(),
            vehicle_name: vehicle.name.clone(),
            base_price: vehicle.price_per_day,
            pickup: PickupOption::default(),
            add_ons: BTreeMap::new(),
            total: vehicle.price_per_day,
        }))
    }

    /// Replaces the add-on selection; ids missing from the catalog are skipped
    ///
    /// # Errors
    ///
    /// [`FlowError::InvalidState`] if no draft has been started.
    pub fn set_add_ons<'a>(
        &mut self,
        catalog: &Catalog,
        ids: impl IntoIterator<Item = &'a AddOnId>,
    ) -> Result<&DraftBooking> {
        let draft = self.require_mut()?;
        draft.add_ons = ids
            .into_iter()
            .filter_map(|id| catalog.add_on(id))
            .map(|add_on| (add_on.id.clone(), add_on.price))
            .collect();
        draft.recompute_total();
        Ok(draft)
    }

    /// Selects the add-on if absent, deselects it if present
    ///
    /// # Errors
    ///
    /// [`FlowError::InvalidState`] if no draft has been started.
    pub fn toggle_add_on(&mut self, catalog: &Catalog, id: &AddOnId) -> Result<&DraftBooking> {
        let draft = self.require_mut()?;
        let mut selection: BTreeSet<AddOnId> = draft.add_ons.keys().cloned().collect();
        if !selection.remove(id) {
            selection.insert(id.clone());
        }
        self.set_add_ons(catalog, &selection)
    }

    /// Records the pickup option
    ///
    /// # Errors
    ///
    /// [`FlowError::InvalidState`] if no draft has been started.
    pub fn set_pickup(&mut self, option: PickupOption) -> Result<&DraftBooking> {
        let draft = self.require_mut()?;
        draft.pickup = option;
        draft.recompute_total();
        Ok(draft)
    }

    /// Discards the draft
    pub fn clear(&mut self) {
        self.draft = None;
    }

    /// The current draft, if any
    #[must_use]
    pub const fn current(&self) -> Option<&DraftBooking> {
        self.draft.as_ref()
    }

    /// `true` when no draft is in progress
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.draft.is_none()
    }

    fn require_mut(&mut self) -> Result<&mut DraftBooking> {
        self.draft
            .as_mut()
            .ok_or_else(|| FlowError::invalid_state(Step::Selection, "no vehicle selected"))
    }
}
