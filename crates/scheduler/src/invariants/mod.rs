//! Machine-checkable invariant catalog and proof entrypoints for scheduler behavior.
#![allow(dead_code)]

pub(crate) mod catalog;

#[allow(unused_imports)]
pub(crate) use catalog::{
	ADDITIONS_APPLIED_BEFORE_REMOVALS, BUDGET_CHECKED_ONLY_BETWEEN_STEPS, EMPTY_LEGAL_SUBSET_STALLS, FATAL_OUTCOME_APPLIES_NO_EFFECT,
	SAME_SEED_SAME_TRACE, SELECTED_ACTION_IS_LEGAL, TRACE_REPLAYS_TO_FINAL_STATE,
};

#[cfg(doc)]
pub(crate) fn test_selected_action_is_legal() {}

#[cfg(doc)]
pub(crate) async fn test_fatal_outcome_applies_no_effect() {}

#[cfg(doc)]
pub(crate) async fn test_additions_applied_before_removals() {}

#[cfg(doc)]
pub(crate) fn test_same_seed_same_trace() {}

#[cfg(doc)]
pub(crate) async fn test_empty_legal_subset_stalls() {}

#[cfg(doc)]
pub(crate) async fn test_budget_checked_only_between_steps() {}

#[cfg(doc)]
pub(crate) fn test_trace_replays_to_final_state() {}


#[cfg(test)]
#[allow(unused_imports)]
pub(crate) use proofs::{
	test_additions_applied_before_removals, test_budget_checked_only_between_steps, test_empty_legal_subset_stalls,
	test_fatal_outcome_applies_no_effect, test_same_seed_same_trace, test_selected_action_is_legal, test_trace_replays_to_final_state,
};
