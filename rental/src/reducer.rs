//! The booking flow reducer.
//!
//! Sequences the wizard steps, keeps the draft in step with every choice and
//! commits the draft to the ledger once the simulated payment resolves.
//!
//! Rejected actions never escape as errors: they are recorded in
//! [`BookingState::last_error`] and, if the session has no draft, the flow
//! falls back to [`Step::Selection`].

use crate::catalog::Catalog;
use crate::error::{FlowError, Result};
use crate::flow::{BookingAction, BookingState, PaymentStatus, Step};
use crate::payment::PaymentSimulator;
use crate::types::{Booking, BookingId};
use driveease_core::effect::Effect;
use driveease_core::environment::{Clock, IdGenerator};
use driveease_core::reducer::Reducer;
use driveease_core::{smallvec, SmallVec};
use std::sync::Arc;

type Effects = SmallVec<[Effect<BookingAction>; 4]>;

/// Dependencies of the booking flow
#[derive(Clone)]
pub struct BookingEnvironment {
    /// Reference data
    pub catalog: Arc<Catalog>,
    /// Source of booking dates
    pub clock: Arc<dyn Clock>,
    /// Source of booking reference numbers
    pub ids: Arc<dyn IdGenerator>,
    /// Payment authorization
    pub payments: Arc<dyn PaymentSimulator>,
}

impl BookingEnvironment {
    /// Creates an environment
    #[must_use]
    pub fn new(
        catalog: Arc<Catalog>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        payments: Arc<dyn PaymentSimulator>,
    ) -> Self {
        Self {
            catalog,
            clock,
            ids,
            payments,
        }
    }
}

/// Reducer for one session's booking wizard
#[derive(Clone, Copy, Debug, Default)]
pub struct BookingFlowReducer;

impl BookingFlowReducer {
    /// Creates the reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn apply(
        state: &mut BookingState,
        action: BookingAction,
        env: &BookingEnvironment,
    ) -> Result<Effects> {
        match action {
            BookingAction::SignIn { role } => {
                let identity = state.session.sign_in(role);
                tracing::info!(name = %identity.name, %role, "Signed in");
            },

            BookingAction::SignOut => {
                state.session.sign_out();
                tracing::info!("Signed out");
            },

            BookingAction::SelectVehicle { vehicle_id } => {
                Self::ensure_not_authorizing(state)?;
                if let Err(error) = state.draft.start(&env.catalog, &vehicle_id) {
                    Self::return_to_selection(state);
                    return Err(error);
                }
                state.confirmed = None;
                state.step = Step::Preferences;
                tracing::info!(%vehicle_id, "Draft booking started");
            },

            BookingAction::ChoosePickup { option } => {
                Self::ensure_step(state, Step::Preferences, "pickup is chosen in Preferences")?;
                let draft = state.draft.set_pickup(option)?;
                tracing::debug!(?option, total = %draft.total, "Pickup option chosen");
            },

            BookingAction::SetAddOns { ids } => {
                Self::ensure_step(state, Step::AddOns, "add-ons are chosen in AddOns")?;
                let draft = state.draft.set_add_ons(&env.catalog, &ids)?;
                tracing::debug!(
                    selected = draft.add_ons.len(),
                    total = %draft.total,
                    "Add-ons set"
                );
            },

            BookingAction::ToggleAddOn { id } => {
                Self::ensure_step(state, Step::AddOns, "add-ons are chosen in AddOns")?;
                let draft = state.draft.toggle_add_on(&env.catalog, &id)?;
                tracing::debug!(add_on = %id, total = %draft.total, "Add-on toggled");
            },

            BookingAction::Navigate { to } => Self::navigate(state, to)?,

            BookingAction::ConfirmAndPay => return Self::start_payment(state, env),

            BookingAction::PaymentAuthorized { booking } => Self::commit(state, booking),
        }

        Ok(smallvec![Effect::None])
    }

    fn navigate(state: &mut BookingState, to: Step) -> Result<()> {
        Self::ensure_not_authorizing(state)?;

        if to == Step::Selection {
            Self::return_to_selection(state);
            return Ok(());
        }

        if !state.step.can_transition_to(to) {
            return Err(FlowError::invalid_state(
                state.step,
                format!("cannot move to {to}"),
            ));
        }

        if to.requires_draft() && state.draft.is_empty() {
            state.step = Step::Selection;
            return Err(FlowError::invalid_state(to, "no vehicle selected"));
        }

        tracing::debug!(from = %state.step, %to, "Step changed");
        state.step = to;
        Ok(())
    }

    /// Abandons the current booking instance
    fn return_to_selection(state: &mut BookingState) {
        state.draft.clear();
        state.confirmed = None;
        state.step = Step::Selection;
        tracing::debug!("Back to vehicle selection");
    }

    fn start_payment(state: &mut BookingState, env: &BookingEnvironment) -> Result<Effects> {
        Self::ensure_not_authorizing(state)?;
        Self::ensure_step(state, Step::Payment, "payment starts from Payment")?;

        let draft = state
            .draft
            .current()
            .cloned()
            .ok_or_else(|| FlowError::invalid_state(state.step, "no vehicle selected"))?;

        let booking_id = BookingId::from_sequence(env.ids.next_id());
        let date = env.clock.now().date_naive();
        tracing::info!(%booking_id, total = %draft.total, "Payment authorization started");

        state.payment = PaymentStatus::Authorizing {
            booking_id: booking_id.clone(),
        };

        let pending = env.payments.authorize(draft, booking_id, date);
        Ok(smallvec![Effect::Future(Box::pin(async move {
            Some(BookingAction::PaymentAuthorized {
                booking: pending.await,
            })
        }))])
    }

    fn commit(state: &mut BookingState, booking: Booking) {
        state.payment = PaymentStatus::Idle;
        state.draft.clear();
        state.ledger.append(booking.clone());
        state.step = Step::Confirmation;
        tracing::info!(booking_id = %booking.id, total = %booking.total_price, "Booking confirmed");
        metrics::counter!("driveease.bookings.committed").increment(1);
        state.confirmed = Some(booking);
    }

    fn ensure_not_authorizing(state: &BookingState) -> Result<()> {
        if state.payment.is_authorizing() {
            return Err(FlowError::invalid_state(
                state.step,
                "payment authorization in progress",
            ));
        }
        Ok(())
    }

    fn ensure_step(state: &BookingState, expected: Step, reason: &str) -> Result<()> {
        if state.step != expected {
            return Err(FlowError::invalid_state(state.step, reason));
        }
        Ok(())
    }

    fn reject(state: &mut BookingState, error: FlowError) {
        tracing::warn!(step = %state.step, %error, "Action rejected");
        metrics::counter!("driveease.actions.rejected").increment(1);

        if state.step.requires_draft() && state.draft.is_empty() {
            state.step = Step::Selection;
        }
        state.last_error = Some(error);
    }
}

impl Reducer for BookingFlowReducer {
    type State = BookingState;
    type Action = BookingAction;
    type Environment = BookingEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        // A completion for anything but the pending authorization is stale.
        if let BookingAction::PaymentAuthorized { booking } = &action {
            let expected = matches!(
                &state.payment,
                PaymentStatus::Authorizing { booking_id } if *booking_id == booking.id
            );
            if !expected {
                tracing::warn!(booking_id = %booking.id, "Ignoring unexpected payment completion");
                return smallvec![Effect::None];
            }
        }

        match Self::apply(state, action, env) {
            Ok(effects) => {
                state.last_error = None;
                effects
            },
            Err(error) => {
                Self::reject(state, error);
                smallvec![Effect::None]
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::draft::{DraftBooking, PickupOption};
    use crate::ledger::BookingLedger;
    use crate::payment::committed_booking;
    use crate::session::Role;
    use crate::types::{AddOnId, BookingStatus, Money, VehicleId};
    use chrono::NaiveDate;
    use driveease_core::environment::MonotonicIds;
    use driveease_testing::{assertions, test_clock, ReducerTest};
    use std::future::Future;
    use std::pin::Pin;

    struct InstantPayment;

    impl PaymentSimulator for InstantPayment {
        fn authorize(
            &self,
            draft: DraftBooking,
            booking_id: BookingId,
            date: NaiveDate,
        ) -> Pin<Box<dyn Future<Output = Booking> + Send>> {
            Box::pin(async move { committed_booking(draft, booking_id, date) })
        }
    }

    fn env() -> BookingEnvironment {
        BookingEnvironment::new(
            Arc::new(Catalog::demo()),
            Arc::new(test_clock()),
            Arc::new(MonotonicIds::starting_at(1001)),
            Arc::new(InstantPayment),
        )
    }

    fn select(id: &str) -> BookingAction {
        BookingAction::SelectVehicle {
            vehicle_id: VehicleId::from(id),
        }
    }

    fn go(to: Step) -> BookingAction {
        BookingAction::Navigate { to }
    }

    fn add_ons(ids: &[&str]) -> BookingAction {
        BookingAction::SetAddOns {
            ids: ids.iter().copied().map(AddOnId::from).collect(),
        }
    }

    fn to_payment() -> Vec<BookingAction> {
        vec![
            select("s1"),
            go(Step::AddOns),
            add_ons(&["gps", "childseat"]),
            go(Step::NearbyReview),
            go(Step::Payment),
        ]
    }

    fn state_at_payment() -> BookingState {
        let env = env();
        let mut state = BookingState::with_ledger(BookingLedger::seeded());
        for action in to_payment() {
            BookingFlowReducer.reduce(&mut state, action, &env);
        }
        state
    }

    #[test]
    fn select_vehicle_starts_draft() {
        ReducerTest::new(BookingFlowReducer::new())
            .with_env(env())
            .given_state(BookingState::default())
            .when_action(select("s1"))
            .then_state(|state| {
                assert_eq!(state.step, Step::Preferences);
                assert_eq!(state.draft.current().unwrap().total, Money::rupees(2500));
                assert!(state.last_error.is_none());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn unknown_vehicle_is_recorded_and_stays_at_selection() {
        ReducerTest::new(BookingFlowReducer::new())
            .with_env(env())
            .given_state(BookingState::default())
            .when_action(select("zz"))
            .then_state(|state| {
                assert_eq!(state.step, Step::Selection);
                assert!(state.draft.is_empty());
                assert_eq!(state.last_error, Some(FlowError::vehicle_not_found("zz")));
            })
            .run();
    }

    #[test]
    fn unknown_vehicle_abandons_the_current_draft() {
        ReducerTest::new(BookingFlowReducer::new())
            .with_env(env())
            .given_state(BookingState::default())
            .when_actions([select("s1"), select("zz"), go(Step::Preferences)])
            .then_state(|state| {
                assert_eq!(state.step, Step::Selection);
                assert!(state.draft.is_empty());
                assert!(state.snapshot().running_total.is_none());
                assert!(matches!(
                    state.last_error,
                    Some(FlowError::InvalidState {
                        step: Step::Preferences,
                        ..
                    })
                ));
            })
            .run();
    }

    #[test]
    fn unknown_vehicle_after_confirmation_clears_it() {
        let env = env();
        let mut state = state_at_payment();
        let draft = state.draft.current().cloned().unwrap();
        let booking = committed_booking(
            draft,
            BookingId::from("BK-1001"),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        );
        state.payment = PaymentStatus::Authorizing {
            booking_id: booking.id.clone(),
        };
        BookingFlowReducer.reduce(&mut state, BookingAction::PaymentAuthorized { booking }, &env);
        assert_eq!(state.step, Step::Confirmation);

        BookingFlowReducer.reduce(&mut state, select("zz"), &env);

        assert_eq!(state.step, Step::Selection);
        assert!(state.confirmed.is_none());
        assert_eq!(state.last_error, Some(FlowError::vehicle_not_found("zz")));
    }

    #[test]
    fn running_total_follows_choices() {
        ReducerTest::new(BookingFlowReducer::new())
            .with_env(env())
            .given_state(BookingState::default())
            .when_actions([
                select("s1"),
                BookingAction::ChoosePickup {
                    option: PickupOption::HomeDelivery,
                },
                go(Step::AddOns),
                add_ons(&["gps", "childseat"]),
                BookingAction::ToggleAddOn {
                    id: AddOnId::from("gps"),
                },
            ])
            .then_state(|state| {
                let snapshot = state.snapshot();
                assert_eq!(snapshot.step, Step::AddOns);
                assert_eq!(snapshot.running_total, Some(Money::rupees(2950)));
                assert_eq!(snapshot.add_ons, vec![AddOnId::from("childseat")]);
            })
            .run();
    }

    #[test]
    fn skipping_steps_is_rejected_in_place() {
        ReducerTest::new(BookingFlowReducer::new())
            .with_env(env())
            .given_state(BookingState::default())
            .when_actions([select("s1"), go(Step::Payment)])
            .then_state(|state| {
                assert_eq!(state.step, Step::Preferences);
                assert!(!state.draft.is_empty());
                assert!(matches!(
                    state.last_error,
                    Some(FlowError::InvalidState {
                        step: Step::Preferences,
                        ..
                    })
                ));
            })
            .run();
    }

    #[test]
    fn entering_a_step_without_draft_redirects_to_selection() {
        ReducerTest::new(BookingFlowReducer::new())
            .with_env(env())
            .given_state(BookingState {
                step: Step::AddOns,
                ..BookingState::default()
            })
            .when_action(go(Step::NearbyReview))
            .then_state(|state| {
                assert_eq!(state.step, Step::Selection);
                assert!(matches!(state.last_error, Some(FlowError::InvalidState { .. })));
            })
            .run();
    }

    #[test]
    fn step_specific_actions_elsewhere_are_rejected() {
        ReducerTest::new(BookingFlowReducer::new())
            .with_env(env())
            .given_state(BookingState::default())
            .when_actions([select("s1"), add_ons(&["gps"])])
            .then_state(|state| {
                assert_eq!(state.step, Step::Preferences);
                assert_eq!(state.draft.current().unwrap().total, Money::rupees(2500));
                assert!(state.last_error.is_some());
            })
            .run();
    }

    #[test]
    fn successful_action_clears_last_error() {
        ReducerTest::new(BookingFlowReducer::new())
            .with_env(env())
            .given_state(BookingState::default())
            .when_actions([select("zz"), select("h1")])
            .then_state(|state| {
                assert!(state.last_error.is_none());
                assert_eq!(state.step, Step::Preferences);
            })
            .run();
    }

    #[test]
    fn confirm_and_pay_reserves_id_and_returns_future() {
        ReducerTest::new(BookingFlowReducer::new())
            .with_env(env())
            .given_state(state_at_payment())
            .when_action(BookingAction::ConfirmAndPay)
            .then_state(|state| {
                assert_eq!(
                    state.payment,
                    PaymentStatus::Authorizing {
                        booking_id: BookingId::from("BK-1001")
                    }
                );
                assert_eq!(state.step, Step::Payment);
                assert!(!state.draft.is_empty());
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn draft_is_frozen_while_authorizing() {
        ReducerTest::new(BookingFlowReducer::new())
            .with_env(env())
            .given_state(state_at_payment())
            .when_actions([
                BookingAction::ConfirmAndPay,
                go(Step::NearbyReview),
                go(Step::Selection),
                select("h1"),
                BookingAction::ConfirmAndPay,
            ])
            .then_state(|state| {
                assert_eq!(state.step, Step::Payment);
                assert!(state.payment.is_authorizing());
                assert_eq!(state.draft.current().unwrap().total, Money::rupees(2750));
                assert!(state.last_error.is_some());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn stale_completion_is_ignored() {
        let mut state = state_at_payment();
        let ledger_before = state.ledger.clone();
        let draft = state.draft.current().cloned().unwrap();
        let stray = committed_booking(
            draft,
            BookingId::from("BK-4242"),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        );

        BookingFlowReducer.reduce(
            &mut state,
            BookingAction::PaymentAuthorized { booking: stray },
            &env(),
        );

        assert_eq!(state.step, Step::Payment);
        assert_eq!(state.ledger, ledger_before);
    }

    #[tokio::test]
    async fn payment_commits_to_ledger_head() {
        let env = env();
        let mut state = state_at_payment();
        let before: Vec<_> = state.ledger.list().cloned().collect();

        let effects = BookingFlowReducer.reduce(&mut state, BookingAction::ConfirmAndPay, &env);
        let Some(Effect::Future(pending)) = effects.into_iter().next() else {
            panic!("expected a payment future");
        };
        let completion = pending.await.unwrap();
        BookingFlowReducer.reduce(&mut state, completion, &env);

        assert_eq!(state.step, Step::Confirmation);
        assert!(state.draft.is_empty());
        assert_eq!(state.payment, PaymentStatus::Idle);

        let after: Vec<_> = state.ledger.list().cloned().collect();
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(&after[1..], &before[..]);

        let booking = &after[0];
        assert_eq!(booking.id.as_str(), "BK-1001");
        assert_eq!(booking.status, BookingStatus::Upcoming);
        assert_eq!(booking.total_price, Money::rupees(2750));
        assert_eq!(booking.date.to_string(), "2025-01-01");
        assert_eq!(state.confirmed.as_ref(), Some(booking));

        // Only Selection leads out of Confirmation.
        BookingFlowReducer.reduce(&mut state, go(Step::Payment), &env);
        assert_eq!(state.step, Step::Confirmation);
        BookingFlowReducer.reduce(&mut state, add_ons(&["gps"]), &env);
        assert!(state.draft.is_empty());

        BookingFlowReducer.reduce(&mut state, go(Step::Selection), &env);
        assert_eq!(state.step, Step::Selection);
        assert!(state.confirmed.is_none());
    }

    #[test]
    fn sign_in_does_not_touch_the_flow() {
        ReducerTest::new(BookingFlowReducer::new())
            .with_env(env())
            .given_state(BookingState::default())
            .when_actions([select("s1"), BookingAction::SignIn { role: Role::Renter }])
            .then_state(|state| {
                assert_eq!(state.step, Step::Preferences);
                assert_eq!(state.session.role(), Some(Role::Renter));
            })
            .run();
    }
}
