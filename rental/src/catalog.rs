//! Read-only reference data: the fleet, the add-ons and nearby services.
//!
//! A catalog is built once at startup (either the built-in demonstration
//! fleet or a JSON document) and shared by reference afterwards. Nothing in
//! the booking flow mutates it.

use crate::error::{CatalogError, EntityKind};
use crate::types::{AddOnId, Money, ServiceId, VehicleId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// Availability of a vehicle in the fleet
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Availability {
    /// Ready to be rented
    Available,
    /// Currently out with a renter
    Rented,
    /// In the workshop
    Maintenance,
}

/// Gearbox type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transmission {
    /// Automatic gearbox
    Automatic,
    /// Manual gearbox
    Manual,
}

/// Fuel or energy source
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FuelType {
    /// Petrol engine
    Petrol,
    /// Diesel engine
    Diesel,
    /// Battery electric
    Electric,
}

/// A rentable vehicle
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Catalog key
    pub id: VehicleId,
    /// Display name
    pub name: String,
    /// Listing category ("SUV", "Sedan", "Hatchback")
    pub category: String,
    /// Daily rental price
    pub price_per_day: Money,
    /// Current availability
    pub availability: Availability,
    /// Number of seats
    pub seats: u8,
    /// Gearbox
    pub transmission: Transmission,
    /// Fuel type
    pub fuel: FuelType,
    /// Name of the hub that owns the vehicle
    pub owner: String,
    /// Average renter rating
    pub rating: f32,
}

/// An optional extra that can be added to a booking
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOn {
    /// Catalog key
    pub id: AddOnId,
    /// Display name
    pub name: String,
    /// Price added to the booking total
    pub price: Money,
    /// Icon reference for the UI
    pub icon: String,
}

/// Category of a nearby service
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceKind {
    /// Petrol pump
    Petrol,
    /// EV charging station
    #[serde(rename = "EV")]
    Ev,
    /// Car wash
    Wash,
    /// Café
    Cafe,
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Petrol => "Petrol",
            Self::Ev => "EV",
            Self::Wash => "Wash",
            Self::Cafe => "Cafe",
        };
        f.write_str(label)
    }
}

/// A service shown on the route-assistant step
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NearbyService {
    /// Catalog key
    pub id: ServiceId,
    /// Display name
    pub name: String,
    /// Service category
    #[serde(rename = "type")]
    pub kind: ServiceKind,
    /// Human-readable distance ("1.2 km")
    pub distance: String,
}

/// Fleet listing filter
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Every vehicle
    #[default]
    All,
    /// Only vehicles in this category
    Category(String),
}

impl CategoryFilter {
    fn matches(&self, vehicle: &Vehicle) -> bool {
        match self {
            Self::All => true,
            Self::Category(category) => vehicle.category == *category,
        }
    }
}

#[derive(Deserialize)]
struct CatalogDocument {
    vehicles: Vec<Vehicle>,
    #[serde(default)]
    add_ons: Vec<AddOn>,
    #[serde(default)]
    nearby_services: Vec<NearbyService>,
}

/// The complete reference data set
#[derive(Clone, Debug, PartialEq)]
pub struct Catalog {
    vehicles: Vec<Vehicle>,
    add_ons: Vec<AddOn>,
    nearby_services: Vec<NearbyService>,
}

impl Catalog {
    /// Number of vehicles shown in the featured section
    pub const FEATURED_COUNT: usize = 3;

    /// Builds a catalog, rejecting duplicate identifiers
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] if two entries of the same kind
    /// share an identifier.
    pub fn new(
        vehicles: Vec<Vehicle>,
        add_ons: Vec<AddOn>,
        nearby_services: Vec<NearbyService>,
    ) -> Result<Self, CatalogError> {
        ensure_unique(EntityKind::Vehicle, vehicles.iter().map(|v| v.id.as_str()))?;
        ensure_unique(EntityKind::AddOn, add_ons.iter().map(|a| a.id.as_str()))?;
        ensure_unique(
            EntityKind::NearbyService,
            nearby_services.iter().map(|s| s.id.as_str()),
        )?;

        Ok(Self {
            vehicles,
            add_ons,
            nearby_services,
        })
    }

    /// Parses a catalog from a JSON document
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] for malformed JSON and
    /// [`CatalogError::DuplicateId`] for repeated identifiers.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        Self::new(document.vehicles, document.add_ons, document.nearby_services)
    }

    /// Reads and parses a catalog JSON file
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the file cannot be read, otherwise the
    /// errors of [`Catalog::from_json`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Looks up a vehicle
    #[must_use]
    pub fn vehicle(&self, id: &VehicleId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == *id)
    }

    /// Looks up an add-on
    #[must_use]
    pub fn add_on(&self, id: &AddOnId) -> Option<&AddOn> {
        self.add_ons.iter().find(|a| a.id == *id)
    }

    /// The whole fleet in listing order
    #[must_use]
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Every add-on in display order
    #[must_use]
    pub fn add_ons(&self) -> &[AddOn] {
        &self.add_ons
    }

    /// Every nearby service in display order
    #[must_use]
    pub fn nearby_services(&self) -> &[NearbyService] {
        &self.nearby_services
    }

    /// Vehicles matching a listing filter
    pub fn filter(&self, filter: CategoryFilter) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.iter().filter(move |v| filter.matches(v))
    }

    /// Distinct categories in first-seen order
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for vehicle in &self.vehicles {
            if !seen.contains(&vehicle.category.as_str()) {
                seen.push(vehicle.category.as_str());
            }
        }
        seen
    }

    /// The first few vehicles, for the home page
    #[must_use]
    pub fn featured(&self) -> &[Vehicle] {
        &self.vehicles[..self.vehicles.len().min(Self::FEATURED_COUNT)]
    }

    /// Vehicles in a given availability state
    pub fn with_availability(&self, availability: Availability) -> impl Iterator<Item = &Vehicle> {
        self.vehicles
            .iter()
            .filter(move |v| v.availability == availability)
    }

    /// The built-in demonstration catalog
    #[must_use]
    pub fn demo() -> Self {
        Self {
            vehicles: demo_vehicles(),
            add_ons: demo_add_ons(),
            nearby_services: demo_nearby_services(),
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::demo()
    }
}

fn ensure_unique<'a>(
    kind: EntityKind,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn vehicle(
    id: &str,
    name: &str,
    category: &str,
    price: u64,
    availability: Availability,
    seats: u8,
    transmission: Transmission,
    fuel: FuelType,
    owner: &str,
    rating: f32,
) -> Vehicle {
    Vehicle {
        id: VehicleId::from(id),
        name: name.to_string(),
        category: category.to_string(),
        price_per_day: Money::rupees(price),
        availability,
        seats,
        transmission,
        fuel,
        owner: owner.to_string(),
        rating,
    }
}

#[rustfmt::skip]
fn demo_vehicles() -> Vec<Vehicle> {
    use Availability::{Available, Maintenance, Rented};
    use FuelType::{Diesel, Electric, Petrol};
    use Transmission::{Automatic, Manual};

    vec![
        vehicle("s1", "Tata Nexon EV", "SUV", 2500, Available, 5, Automatic, Electric, "Ahmedabad Central Hub", 4.8),
        vehicle("s2", "Mahindra XUV700", "SUV", 3800, Available, 7, Automatic, Diesel, "SG Highway Hub", 4.9),
        vehicle("s3", "Hyundai Creta", "SUV", 3000, Rented, 5, Manual, Petrol, "Ahmedabad Central Hub", 4.6),
        vehicle("s4", "Kia Seltos", "SUV", 3100, Available, 5, Automatic, Petrol, "Gandhinagar Hub", 4.5),
        vehicle("d1", "Honda City", "Sedan", 2200, Available, 5, Manual, Petrol, "SG Highway Hub", 4.6),
        vehicle("d2", "Hyundai Verna", "Sedan", 2300, Rented, 5, Automatic, Petrol, "Gandhinagar Hub", 4.4),
        vehicle("d3", "Skoda Slavia", "Sedan", 2600, Rented, 5, Automatic, Petrol, "Ahmedabad Central Hub", 4.7),
        vehicle("d4", "Volkswagen Virtus", "Sedan", 2700, Maintenance, 5, Manual, Petrol, "SG Highway Hub", 4.5),
        vehicle("h1", "Maruti Suzuki Swift", "Hatchback", 1200, Available, 5, Manual, Petrol, "Ahmedabad Central Hub", 4.3),
        vehicle("h2", "Tata Tiago EV", "Hatchback", 1500, Available, 5, Automatic, Electric, "Gandhinagar Hub", 4.4),
        vehicle("h3", "Hyundai i20", "Hatchback", 1400, Available, 5, Manual, Petrol, "SG Highway Hub", 4.2),
        vehicle("h4", "Maruti Suzuki Baleno", "Hatchback", 1300, Maintenance, 5, Manual, Diesel, "Gandhinagar Hub", 4.1),
    ]
}

fn demo_add_ons() -> Vec<AddOn> {
    [
        ("gps", "GPS Navigation", 100, "🧭"),
        ("childseat", "Child Safety Seat", 150, "👶"),
        ("insurance", "Zero-Depreciation Cover", 300, "🛡️"),
        ("wifi", "In-Car Wi-Fi Hotspot", 80, "📶"),
    ]
    .into_iter()
    .map(|(id, name, price, icon)| AddOn {
        id: AddOnId::from(id),
        name: name.to_string(),
        price: Money::rupees(price),
        icon: icon.to_string(),
    })
    .collect()
}

fn demo_nearby_services() -> Vec<NearbyService> {
    [
        ("n1", "HP Petrol Pump", ServiceKind::Petrol, "1.2 km"),
        ("n2", "Tata Power EZ Charge", ServiceKind::Ev, "2.5 km"),
        ("n3", "Sparkle Car Wash", ServiceKind::Wash, "0.8 km"),
        ("n4", "Highway Chai Café", ServiceKind::Cafe, "3.1 km"),
    ]
    .into_iter()
    .map(|(id, name, kind, distance)| NearbyService {
        id: ServiceId::from(id),
        name: name.to_string(),
        kind,
        distance: distance.to_string(),
    })
    .collect()
}
