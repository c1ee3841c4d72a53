//! # DriveEase Core
//!
//! Core traits and types for the DriveEase booking flow.
//!
//! Every interactive flow in the workspace is written as a reducer:
//!
//! - **State**: the session-scoped data a flow owns (draft booking, ledger, step)
//! - **Action**: every input the flow accepts (user commands and feedback events)
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: a description of deferred work (a simulated payment)
//! - **Environment**: injected dependencies (clock, id generator, payment simulator)
//!
//! Reducers never perform I/O themselves. Anything asynchronous is returned as an
//! [`effect::Effect`] and executed by the runtime, which feeds the resulting action
//! back into the reducer.
//!
//! ## Example
//!
//! ```
//! use driveease_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Debug, Default)]
//! struct TotalState {
//!     total: u64,
//! }
//!
//! enum TotalAction {
//!     AddCharge(u64),
//!     Reset,
//! }
//!
//! struct TotalReducer;
//!
//! impl Reducer for TotalReducer {
//!     type State = TotalState;
//!     type Action = TotalAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut TotalState,
//!         action: TotalAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<TotalAction>; 4]> {
//!         match action {
//!             TotalAction::AddCharge(amount) => state.total += amount,
//!             TotalAction::Reset => state.total = 0,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let mut state = TotalState::default();
//! TotalReducer.reduce(&mut state, TotalAction::AddCharge(2500), &());
//! TotalReducer.reduce(&mut state, TotalAction::AddCharge(250), &());
//! assert_eq!(state.total, 2750);
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, NaiveDate, Utc};
pub use smallvec::{smallvec, SmallVec};

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// Effects are returned in a `SmallVec` sized for the common case of at
    /// most four effects per action, so the happy path never allocates.
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action against the current state
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed by the runtime
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects are values, not execution. They are returned from reducers and
/// executed by the Store runtime.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Effect type - describes a side effect to be executed
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Returns `true` for [`Effect::None`]
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All sources of non-determinism a reducer needs (time, identifiers) are
/// abstracted behind traits and injected via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use driveease_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let today = clock.now().date_naive();
    /// assert!(today.to_string().len() == 10);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Source of unique, increasing sequence numbers
    ///
    /// Booking references are derived from these numbers, so an implementation
    /// must never hand out the same value twice.
    pub trait IdGenerator: Send + Sync {
        /// Returns the next sequence number
        fn next_id(&self) -> u64;
    }

    /// Monotonic counter shared by every clone of the owning environment
    ///
    /// # Examples
    ///
    /// ```
    /// use driveease_core::environment::{IdGenerator, MonotonicIds};
    ///
    /// let ids = MonotonicIds::starting_at(103);
    /// assert_eq!(ids.next_id(), 103);
    /// assert_eq!(ids.next_id(), 104);
    /// ```
    #[derive(Debug)]
    pub struct MonotonicIds {
        next: AtomicU64,
    }

    impl MonotonicIds {
        /// Create a generator whose first value is `first`
        #[must_use]
        pub const fn starting_at(first: u64) -> Self {
            Self {
                next: AtomicU64::new(first),
            }
        }
    }

    impl Default for MonotonicIds {
        fn default() -> Self {
            Self::starting_at(1)
        }
    }

    impl IdGenerator for MonotonicIds {
        fn next_id(&self) -> u64 {
            self.next.fetch_add(1, Ordering::SeqCst)
        }
    }
}
