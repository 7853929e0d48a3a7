//! Scenario state: held capabilities plus read-only scenario configuration.

use std::collections::BTreeMap;

use tracing::trace;

use crate::capability::{Capability, CapabilityKind, CapabilitySet};
use crate::effect::{Effect, Revocation};

/// Scenario-wide settings shared by every action.
///
/// Fixed when the scenario starts. Actions only ever see it through `&State`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ScenarioConfig {
	target_service: String,
	settings: BTreeMap<String, String>,
}

impl ScenarioConfig {
	/// Creates a configuration targeting the given logical service endpoint.
	pub fn new(target_service: impl Into<String>) -> Self {
		Self {
			target_service: target_service.into(),
			settings: BTreeMap::new(),
		}
	}

	/// Adds a free-form setting. Later values for the same key replace earlier ones.
	#[must_use]
	pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.settings.insert(key.into(), value.into());
		self
	}

	pub fn target_service(&self) -> &str {
		&self.target_service
	}

	pub fn setting(&self, key: &str) -> Option<&str> {
		self.settings.get(key).map(String::as_str)
	}

	pub fn settings(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
		self.settings.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}
}

/// The capability timeline of one scenario run.
///
/// Only the holder of `&mut State` (the scheduler) can change capabilities; actions
/// receive a shared reference and report intended changes through an [`Effect`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct State {
	held: CapabilitySet,
	config: ScenarioConfig,
}

impl State {
	pub fn new(config: ScenarioConfig) -> Self {
		Self {
			held: CapabilitySet::new(),
			config,
		}
	}

	/// Creates a state whose initial capabilities reflect environment bootstrap.
	pub fn with_capabilities(config: ScenarioConfig, initial: impl IntoIterator<Item = Capability>) -> Self {
		Self {
			held: initial.into_iter().collect(),
			config,
		}
	}

	/// Exact membership test: `instance = None` asks for the unparameterized capability.
	pub fn has(&self, kind: CapabilityKind, instance: Option<&str>) -> bool {
		self.held.iter().any(|cap| cap.kind() == kind && cap.instance_name() == instance)
	}

	pub fn has_kind(&self, kind: CapabilityKind) -> bool {
		self.held.has_kind(kind)
	}

	pub fn capabilities(&self) -> &CapabilitySet {
		&self.held
	}

	pub fn configuration(&self) -> &ScenarioConfig {
		&self.config
	}

	/// Adds `cap`. Adding a held capability is a no-op.
	pub fn add(&mut self, cap: Capability) {
		if self.held.insert(cap.clone()) {
			trace!(capability = %cap, "capability granted");
		}
	}

	/// Removes `cap`. Removing an absent capability is a no-op.
	pub fn remove(&mut self, cap: &Capability) {
		if self.held.remove(cap) {
			trace!(capability = %cap, "capability revoked");
		}
	}

	pub fn remove_kind(&mut self, kind: CapabilityKind) {
		let dropped = self.held.remove_kind(kind);
		if dropped > 0 {
			trace!(kind = %kind, dropped, "capability kind revoked");
		}
	}

	/// Applies an effect: all additions first, then all removals.
	pub fn apply(&mut self, effect: &Effect) {
		for cap in effect.added() {
			self.add(cap.clone());
		}
		for rev in effect.removed() {
			match rev {
				Revocation::Instance(cap) => self.remove(cap),
				Revocation::Kind(kind) => self.remove_kind(*kind),
			}
		}
	}
}
