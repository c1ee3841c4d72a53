//! Simulated sign-in and the capabilities a session holds.
//!
//! There is no credential check. Signing in only decides which identity is
//! shown and which dashboard the session sees.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who is using the app
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Rents vehicles
    Renter,
    /// Runs a hub and its fleet
    Owner,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Renter => f.write_str("Renter"),
            Self::Owner => f.write_str("Owner"),
        }
    }
}

/// Something a session may do
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// See the fleet listing
    BrowseFleet,
    /// Run the booking wizard
    BookVehicle,
    /// See past and active bookings
    ViewBookingHistory,
    /// See fleet status and revenue
    ManageFleet,
}

/// A signed-in user
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Display name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Role chosen at sign-in
    pub role: Role,
}

impl Identity {
    const DEMO_EMAIL: &'static str = "test@example.com";

    /// The demo identity for a role
    #[must_use]
    pub fn demo(role: Role) -> Self {
        let name = match role {
            Role::Renter => "Test User",
            Role::Owner => "Test Owner",
        };
        Self {
            name: name.to_string(),
            email: Self::DEMO_EMAIL.to_string(),
            role,
        }
    }
}

/// Identity state of one session
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    identity: Option<Identity>,
}

impl Session {
    /// An anonymous session
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { identity: None }
    }

    /// Signs in with the demo identity for `role`
    pub fn sign_in(&mut self, role: Role) -> &Identity {
        self.identity.insert(Identity::demo(role))
    }

    /// Forgets the identity
    pub fn sign_out(&mut self) {
        self.identity = None;
    }

    /// The signed-in identity
    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// The signed-in role
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.identity.as_ref().map(|i| i.role)
    }

    /// Whether the session holds a capability
    #[must_use]
    pub fn can(&self, capability: Capability) -> bool {
        use Capability::{BookVehicle, BrowseFleet, ManageFleet, ViewBookingHistory};
        match (self.role(), capability) {
            (_, BrowseFleet)
            | (None | Some(Role::Renter), BookVehicle)
            | (Some(Role::Renter), ViewBookingHistory)
            | (Some(Role::Owner), ManageFleet) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_may_browse_and_book() {
        let session = Session::anonymous();
        assert!(session.can(Capability::BrowseFleet));
        assert!(session.can(Capability::BookVehicle));
        assert!(!session.can(Capability::ViewBookingHistory));
        assert!(!session.can(Capability::ManageFleet));
    }

    #[test]
    fn renter_and_owner_capabilities() {
        let mut session = Session::anonymous();

        let identity = session.sign_in(Role::Renter);
        assert_eq!(identity.name, "Test User");
        assert!(session.can(Capability::ViewBookingHistory));
        assert!(!session.can(Capability::ManageFleet));

        session.sign_in(Role::Owner);
        assert_eq!(session.identity().map(|i| i.name.as_str()), Some("Test Owner"));
        assert!(session.can(Capability::ManageFleet));
        assert!(session.can(Capability::BrowseFleet));
        assert!(!session.can(Capability::BookVehicle));

        session.sign_out();
        assert_eq!(session.role(), None);
    }
}
