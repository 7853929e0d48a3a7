use gauntlet_model::{Action, Catalog, CapabilitySet, Composition, Requirement};
use tracing::trace;

/// Result of checking one action against the held capabilities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PreflightDecision {
	Proceed,
	Deny { missing: Vec<Requirement> },
}

/// Checks an action's preconditions against `caps`.
pub(crate) fn check<C: Composition + ?Sized>(action: &dyn Action<C>, caps: &CapabilitySet) -> PreflightDecision {
	let pre = action.requires();
	if pre.is_satisfied_by(caps) {
		PreflightDecision::Proceed
	} else {
		PreflightDecision::Deny { missing: pre.missing(caps) }
	}
}

/// Indices of the explorer entries legal under `caps`, in catalog order.
pub(crate) fn legal_explorers<C: Composition + ?Sized>(catalog: &Catalog<C>, caps: &CapabilitySet) -> Vec<usize> {
	catalog
		.explorers()
		.iter()
		.enumerate()
		.filter_map(|(idx, entry)| match check(&**entry.action(), caps) {
			PreflightDecision::Proceed => Some(idx),
			PreflightDecision::Deny { missing } => {
				trace!(action = entry.name(), missing = ?missing, "action not legal");
				None
			}
		})
		.collect()
}
