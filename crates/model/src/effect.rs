//! Capability deltas declared by an action outcome.

use crate::capability::{Capability, CapabilityKind, CapabilitySet};

/// A capability the action asks to drop.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Revocation {
	/// One exact capability.
	Instance(Capability),
	/// Every held instance of a kind.
	Kind(CapabilityKind),
}

impl Revocation {
	fn is_absent_from(&self, caps: &CapabilitySet) -> bool {
		match self {
			Self::Instance(cap) => !caps.contains(cap),
			Self::Kind(kind) => !caps.has_kind(*kind),
		}
	}

	fn covers(&self, cap: &Capability) -> bool {
		match self {
			Self::Instance(revoked) => revoked == cap,
			Self::Kind(kind) => cap.kind() == *kind,
		}
	}
}

/// Additions and removals applied to [`crate::State`] after a non-fatal outcome.
///
/// Additions are applied before removals, so an effect that both grants and
/// revokes the same capability leaves it absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Effect {
	added: Vec<Capability>,
	removed: Vec<Revocation>,
}

impl Effect {
	/// An effect that changes nothing.
	#[inline]
	pub fn none() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn grant(mut self, cap: impl Into<Capability>) -> Self {
		self.added.push(cap.into());
		self
	}

	#[must_use]
	pub fn revoke(mut self, cap: impl Into<Capability>) -> Self {
		self.removed.push(Revocation::Instance(cap.into()));
		self
	}

	#[must_use]
	pub fn revoke_kind(mut self, kind: CapabilityKind) -> Self {
		self.removed.push(Revocation::Kind(kind));
		self
	}

	pub fn added(&self) -> &[Capability] {
		&self.added
	}

	pub fn removed(&self) -> &[Revocation] {
		&self.removed
	}

	pub fn is_empty(&self) -> bool {
		self.added.is_empty() && self.removed.is_empty()
	}

	/// Checks that `caps` reflects this effect: every revoked capability is absent and
	/// every granted capability not also revoked is present.
	pub fn holds_in(&self, caps: &CapabilitySet) -> bool {
		let removed_ok = self.removed.iter().all(|rev| rev.is_absent_from(caps));
		let added_ok = self
			.added
			.iter()
			.filter(|cap| !self.removed.iter().any(|rev| rev.covers(cap)))
			.all(|cap| caps.contains(cap));
		removed_ok && added_ok
	}
}
