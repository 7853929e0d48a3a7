//! Capabilities: typed facts about the deployment under test.
//!
//! A [`Capability`] is a value: a [`CapabilityKind`] plus an optional instance name
//! (for example which named service is running). The [`CapabilitySet`] held by
//! [`crate::State`] has set semantics and iterates in sorted order so every PRNG draw
//! made over its contents is reproducible.

use std::collections::BTreeSet;
use std::fmt;

use crate::entropy::Entropy;

/// The type of a fact, compared by name.
///
/// Declared as constants next to the actions that grant or require them:
///
/// ```
/// use gauntlet_model::CapabilityKind;
///
/// const SERVICE_RUNNING: CapabilityKind = CapabilityKind::new("service_running");
/// assert_eq!(SERVICE_RUNNING.name(), "service_running");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CapabilityKind(&'static str);

impl CapabilityKind {
	pub const fn new(name: &'static str) -> Self {
		Self(name)
	}

	pub const fn name(self) -> &'static str {
		self.0
	}
}

impl fmt::Display for CapabilityKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.0)
	}
}

/// A fact currently true (or not) about the system under test.
///
/// Ordering is by kind first, then instance, with the unparameterized form sorting
/// before any named instance of the same kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Capability {
	kind: CapabilityKind,
	instance: Option<String>,
}

impl Capability {
	/// Creates an unparameterized capability.
	pub const fn new(kind: CapabilityKind) -> Self {
		Self { kind, instance: None }
	}

	/// Creates a capability for one named instance of `kind`.
	pub fn instance(kind: CapabilityKind, name: impl Into<String>) -> Self {
		Self {
			kind,
			instance: Some(name.into()),
		}
	}

	pub const fn kind(&self) -> CapabilityKind {
		self.kind
	}

	pub fn instance_name(&self) -> Option<&str> {
		self.instance.as_deref()
	}
}

impl From<CapabilityKind> for Capability {
	fn from(kind: CapabilityKind) -> Self {
		Self::new(kind)
	}
}

impl fmt::Display for Capability {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.instance {
			Some(name) => write!(f, "{}({name})", self.kind),
			None => write!(f, "{}", self.kind),
		}
	}
}

/// One precondition term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Requirement {
	/// Any instance of the kind.
	Kind(CapabilityKind),
	/// Exactly this `(kind, instance)` pair.
	Exact(Capability),
}

impl From<CapabilityKind> for Requirement {
	fn from(kind: CapabilityKind) -> Self {
		Self::Kind(kind)
	}
}

impl From<Capability> for Requirement {
	fn from(cap: Capability) -> Self {
		Self::Exact(cap)
	}
}

impl fmt::Display for Requirement {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Kind(kind) => write!(f, "{kind}(*)"),
			Self::Exact(cap) => cap.fmt(f),
		}
	}
}

/// The set of currently held capabilities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CapabilitySet {
	held: BTreeSet<Capability>,
}

impl CapabilitySet {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.held.len()
	}

	pub fn is_empty(&self) -> bool {
		self.held.is_empty()
	}

	pub fn contains(&self, cap: &Capability) -> bool {
		self.held.contains(cap)
	}

	/// Inserts `cap`, returning `false` if it was already held.
	pub fn insert(&mut self, cap: Capability) -> bool {
		self.held.insert(cap)
	}

	/// Removes `cap`, returning `false` if it was not held.
	pub fn remove(&mut self, cap: &Capability) -> bool {
		self.held.remove(cap)
	}

	/// Removes every instance of `kind` and returns how many were dropped.
	pub fn remove_kind(&mut self, kind: CapabilityKind) -> usize {
		let before = self.held.len();
		self.held.retain(|cap| cap.kind != kind);
		before - self.held.len()
	}

	pub fn has_kind(&self, kind: CapabilityKind) -> bool {
		self.instances(kind).next().is_some()
	}

	/// Held capabilities of `kind`, in sorted order.
	pub fn instances(&self, kind: CapabilityKind) -> impl Iterator<Item = &Capability> + '_ {
		self.held.iter().filter(move |cap| cap.kind == kind)
	}

	pub fn satisfies(&self, req: &Requirement) -> bool {
		match req {
			Requirement::Kind(kind) => self.has_kind(*kind),
			Requirement::Exact(cap) => self.contains(cap),
		}
	}

	pub fn iter(&self) -> impl Iterator<Item = &Capability> + '_ {
		self.held.iter()
	}

	/// Picks a name of the form `{kind}_{i}` (`i < max`) not held by any instance of `kind`.
	///
	/// Returns `None` when all `max` names are taken.
	pub fn free_instance_name(&self, kind: CapabilityKind, max: usize, entropy: &mut dyn Entropy) -> Option<String> {
		let mut free: Vec<String> = (0..max)
			.map(|i| format!("{kind}_{i}"))
			.filter(|name| !self.instances(kind).any(|cap| cap.instance_name() == Some(name.as_str())))
			.collect();
		if free.is_empty() {
			return None;
		}
		free.sort_unstable();
		let idx = entropy.pick_index(free.len());
		Some(free.swap_remove(idx.min(free.len() - 1)))
	}
}

impl FromIterator<Capability> for CapabilitySet {
	fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
		Self {
			held: iter.into_iter().collect(),
		}
	}
}

impl Extend<Capability> for CapabilitySet {
	fn extend<I: IntoIterator<Item = Capability>>(&mut self, iter: I) {
		self.held.extend(iter);
	}
}

impl<'a> IntoIterator for &'a CapabilitySet {
	type Item = &'a Capability;
	type IntoIter = std::collections::btree_set::Iter<'a, Capability>;

	fn into_iter(self) -> Self::IntoIter {
		self.held.iter()
	}
}

/// Legality rule declared by an action.
///
/// Legal when at least one requirement group is fully held and no excluded
/// requirement is held. [`Preconditions::none`] is a single empty group and is
/// therefore always legal.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Preconditions {
	groups: Vec<Vec<Requirement>>,
	excluded: Vec<Requirement>,
}

impl Default for Preconditions {
	fn default() -> Self {
		Self::none()
	}
}

impl Preconditions {
	pub fn none() -> Self {
		Self {
			groups: vec![Vec::new()],
			excluded: Vec::new(),
		}
	}

	/// Every requirement in `reqs` must be held.
	pub fn all<R: Into<Requirement>>(reqs: impl IntoIterator<Item = R>) -> Self {
		Self {
			groups: vec![reqs.into_iter().map(Into::into).collect()],
			excluded: Vec::new(),
		}
	}

	/// Adds an alternative group; the action is legal if any group is fully held.
	#[must_use]
	pub fn or_all<R: Into<Requirement>>(mut self, reqs: impl IntoIterator<Item = R>) -> Self {
		self.groups.push(reqs.into_iter().map(Into::into).collect());
		self
	}

	/// The action is illegal while any of `reqs` is held.
	#[must_use]
	pub fn unless<R: Into<Requirement>>(mut self, reqs: impl IntoIterator<Item = R>) -> Self {
		self.excluded.extend(reqs.into_iter().map(Into::into));
		self
	}

	pub fn groups(&self) -> &[Vec<Requirement>] {
		&self.groups
	}

	pub fn excluded(&self) -> &[Requirement] {
		&self.excluded
	}

	pub fn is_satisfied_by(&self, caps: &CapabilitySet) -> bool {
		let any_group = self.groups.iter().any(|group| group.iter().all(|req| caps.satisfies(req)));
		any_group && !self.excluded.iter().any(|req| caps.satisfies(req))
	}

	/// Explains why the preconditions fail: requirements missing from the closest
	/// group, followed by excluded requirements that are held.
	///
	/// Empty when [`Self::is_satisfied_by`] holds.
	pub fn missing(&self, caps: &CapabilitySet) -> Vec<Requirement> {
		if self.is_satisfied_by(caps) {
			return Vec::new();
		}
		let mut out: Vec<Requirement> = self
			.groups
			.iter()
			.map(|group| group.iter().filter(|req| !caps.satisfies(req)).cloned().collect::<Vec<_>>())
			.min_by_key(Vec::len)
			.unwrap_or_default();
		out.extend(self.excluded.iter().filter(|req| caps.satisfies(req)).cloned());
		out
	}
}
