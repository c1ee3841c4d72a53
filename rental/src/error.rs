//! Error types for the booking flow and catalog loading.

use crate::flow::Step;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias for booking-flow operations.
pub type Result<T> = std::result::Result<T, FlowError>;

/// Kind of catalog entry a lookup failed for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// A vehicle
    Vehicle,
    /// An add-on
    AddOn,
    /// A nearby service
    NearbyService,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Vehicle => "vehicle",
            Self::AddOn => "add-on",
            Self::NearbyService => "nearby service",
        };
        f.write_str(label)
    }
}

/// Recoverable booking-flow failures.
///
/// Neither variant is fatal: the flow reducer records it as the session's
/// last error and moves to a safe step.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowError {
    /// An identifier does not exist in the catalog.
    #[error("Unknown {kind} '{id}'")]
    NotFound {
        /// What was looked up
        kind: EntityKind,
        /// The identifier that was not found
        id: String,
    },

    /// The action is not allowed in the current step.
    #[error("Not allowed in {step}: {reason}")]
    InvalidState {
        /// Step the flow was in when the action arrived
        step: Step,
        /// Why the action was refused
        reason: String,
    },
}

impl FlowError {
    /// Shorthand for an unknown vehicle
    #[must_use]
    pub fn vehicle_not_found(id: impl fmt::Display) -> Self {
        Self::NotFound {
            kind: EntityKind::Vehicle,
            id: id.to_string(),
        }
    }

    /// Shorthand for [`FlowError::InvalidState`]
    #[must_use]
    pub fn invalid_state(step: Step, reason: impl Into<String>) -> Self {
        Self::InvalidState {
            step,
            reason: reason.into(),
        }
    }
}

/// Failures while loading a catalog document.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid catalog JSON.
    #[error("Invalid catalog document: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two entries of the same kind share an identifier.
    #[error("Duplicate {kind} id '{id}' in catalog")]
    DuplicateId {
        /// Kind of the duplicated entry
        kind: EntityKind,
        /// The duplicated identifier
        id: String,
    },
}
