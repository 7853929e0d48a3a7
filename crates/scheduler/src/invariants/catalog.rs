//! Invariant catalog for [`crate::Scheduler`].
#![allow(dead_code)]

/// Every executed action must have had its preconditions satisfied by the state held when it started.
///
/// - Enforced in: [`crate::preflight::legal_explorers`], [`crate::preflight::check`]
/// - Tested by: [`crate::invariants::test_selected_action_is_legal`]
/// - Failure symptom: Actions run against a deployment that lacks what they need and report spurious failures.
pub(crate) const SELECTED_ACTION_IS_LEGAL: () = ();

/// A fatal outcome must leave state exactly as it was before the step.
///
/// - Enforced in: `Scheduler::execute`
/// - Tested by: [`crate::invariants::test_fatal_outcome_applies_no_effect`]
/// - Failure symptom: The report's final state claims facts the failing action never established.
pub(crate) const FATAL_OUTCOME_APPLIES_NO_EFFECT: () = ();

/// Effects must apply additions before removals, so a capability both granted and revoked ends up absent.
///
/// - Enforced in: [`gauntlet_model::State::apply`]
/// - Tested by: [`crate::invariants::test_additions_applied_before_removals`]
/// - Failure symptom: Stale capabilities survive teardown-and-recreate actions.
pub(crate) const ADDITIONS_APPLIED_BEFORE_REMOVALS: () = ();

/// The same seed, catalog, and initial state must yield the same step sequence.
///
/// - Enforced in: [`gauntlet_model::SeededEntropy`], `Scheduler::explore`
/// - Tested by: [`crate::invariants::test_same_seed_same_trace`]
/// - Failure symptom: Failing runs cannot be replayed from their logged seed.
pub(crate) const SAME_SEED_SAME_TRACE: () = ();

/// An empty legal subset must end the run as stalled and execute no further steps, finalizers included.
///
/// - Enforced in: `Scheduler::explore`, `Scheduler::run_until_stopped`
/// - Tested by: [`crate::invariants::test_empty_legal_subset_stalls`]
/// - Failure symptom: The scheduler spins forever on an unreachable catalog.
pub(crate) const EMPTY_LEGAL_SUBSET_STALLS: () = ();

/// Budgets must be checked only between steps; a running action is never abandoned.
///
/// - Enforced in: `Scheduler::explore`
/// - Tested by: [`crate::invariants::test_budget_checked_only_between_steps`]
/// - Failure symptom: Half-applied actions leave the deployment in a state the model does not describe.
pub(crate) const BUDGET_CHECKED_ONLY_BETWEEN_STEPS: () = ();

/// Replaying the recorded effects over the initial state must reproduce the final state.
///
/// - Enforced in: `Scheduler::execute`
/// - Tested by: [`crate::invariants::test_trace_replays_to_final_state`]
/// - Failure symptom: The trace omits or misreports state transitions and cannot be trusted for diagnosis.
pub(crate) const TRACE_REPLAYS_TO_FINAL_STATE: () = ();
