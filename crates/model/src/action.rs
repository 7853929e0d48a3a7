//! The action contract: preconditions plus one async unit of work.

use async_trait::async_trait;

use crate::capability::{Capability, CapabilityKind, Preconditions};
use crate::entropy::Entropy;
use crate::outcome::Outcome;
use crate::state::{ScenarioConfig, State};

/// The external driver actions use to reach the system under test.
///
/// Opaque to the scheduler; any owned, sendable type qualifies.
pub trait Composition: Send + 'static {}

impl<T: Send + 'static + ?Sized> Composition for T {}

/// One catalog entry's behavior.
///
/// `requires` must be pure: the scheduler calls it on every step to decide legality.
/// `run` is only ever called when `requires` holds, and never concurrently with any
/// other `run` of the same scenario.
#[async_trait]
pub trait Action<C: Composition + ?Sized>: Send + Sync {
	/// Stable name used in traces and for catalog lookups.
	fn name(&self) -> &str;

	fn requires(&self) -> Preconditions {
		Preconditions::none()
	}

	async fn run(&self, composition: &mut C, ctx: &mut StepContext<'_>) -> Outcome;
}

/// Per-step view handed to [`Action::run`].
///
/// Gives read-only access to the scenario state and draws from the scenario's PRNG,
/// so any choice an action makes replays under the same seed.
pub struct StepContext<'a> {
	index: u64,
	state: &'a State,
	entropy: &'a mut dyn Entropy,
}

impl<'a> StepContext<'a> {
	pub fn new(index: u64, state: &'a State, entropy: &'a mut dyn Entropy) -> Self {
		Self { index, state, entropy }
	}

	/// Zero-based position of this step in the run.
	pub const fn index(&self) -> u64 {
		self.index
	}

	pub fn state(&self) -> &'a State {
		self.state
	}

	pub fn config(&self) -> &'a ScenarioConfig {
		self.state.configuration()
	}

	/// Picks one held instance of `kind`, or `None` if none is held.
	pub fn pick_instance(&mut self, kind: CapabilityKind) -> Option<&'a Capability> {
		let state = self.state;
		let candidates: Vec<&'a Capability> = state.capabilities().instances(kind).collect();
		self.choose(&candidates).copied()
	}

	/// Picks one element of `items`, or `None` if empty.
	pub fn choose<'b, T>(&mut self, items: &'b [T]) -> Option<&'b T> {
		if items.is_empty() {
			return None;
		}
		let idx = self.entropy.pick_index(items.len());
		items.get(idx.min(items.len() - 1))
	}

	/// See [`crate::CapabilitySet::free_instance_name`].
	pub fn free_instance_name(&mut self, kind: CapabilityKind, max: usize) -> Option<String> {
		self.state.capabilities().free_instance_name(kind, max, &mut *self.entropy)
	}
}
