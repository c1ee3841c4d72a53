//! # DriveEase Testing
//!
//! Testing utilities for DriveEase reducers.
//!
//! This crate provides:
//! - Deterministic environment implementations (fixed clock)
//! - [`ReducerTest`], a Given-When-Then harness for reducers
//! - Effect assertion helpers
//!
//! ## Example
//!
//! ```ignore
//! use driveease_core::environment::MonotonicIds;
//! use driveease_rental::{
//!     BookingAction, BookingEnvironment, BookingFlowReducer, BookingState, Catalog,
//!     SimulatedPayment, Step,
//! };
//! use driveease_testing::{test_clock, ReducerTest};
//! use std::{sync::Arc, time::Duration};
//!
//! let env = BookingEnvironment::new(
//!     Arc::new(Catalog::demo()),
//!     Arc::new(test_clock()),
//!     Arc::new(MonotonicIds::starting_at(1001)),
//!     SimulatedPayment::shared(Duration::from_millis(1)),
//! );
//!
//! ReducerTest::new(BookingFlowReducer::new())
//!     .with_env(env)
//!     .given_state(BookingState::default())
//!     .when_action(BookingAction::SelectVehicle { vehicle_id: "s1".into() })
//!     .then_state(|s| assert_eq!(s.step, Step::Preferences))
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use driveease_core::environment::Clock;


/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, so booking dates are reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use driveease_testing::mocks::FixedClock;
    /// use driveease_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

// Re-export commonly used items
pub use mocks::{test_clock, FixedClock};
pub use reducer_test::{assertions, ReducerTest};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
        assert_eq!(time1.date_naive().to_string(), "2025-01-01");
    }
}
