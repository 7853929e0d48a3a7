use std::time::Duration;

/// Bounds on random exploration.
///
/// Both limits are checked between steps only; a step already running is allowed to
/// finish. With neither limit set, a run ends only on stall, fatal outcome or stop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Budget {
	max_steps: Option<u64>,
	max_duration: Option<Duration>,
}

impl Budget {
	pub const fn unbounded() -> Self {
		Self {
			max_steps: None,
			max_duration: None,
		}
	}

	/// At most `n` exploration steps.
	pub const fn steps(n: u64) -> Self {
		Self {
			max_steps: Some(n),
			max_duration: None,
		}
	}

	/// No new exploration step starts once `limit` has elapsed since the run began.
	pub const fn duration(limit: Duration) -> Self {
		Self {
			max_steps: None,
			max_duration: Some(limit),
		}
	}

	#[must_use]
	pub const fn with_steps(mut self, n: u64) -> Self {
		self.max_steps = Some(n);
		self
	}

	#[must_use]
	pub const fn with_duration(mut self, limit: Duration) -> Self {
		self.max_duration = Some(limit);
		self
	}

	pub const fn max_steps(&self) -> Option<u64> {
		self.max_steps
	}

	pub const fn max_duration(&self) -> Option<Duration> {
		self.max_duration
	}
}

/// Settings for one scenario run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RunConfig {
	pub(crate) seed: u64,
	pub(crate) budget: Budget,
	pub(crate) finalize: bool,
}

impl Default for RunConfig {
	fn default() -> Self {
		Self {
			seed: 0,
			budget: Budget::unbounded(),
			finalize: true,
		}
	}
}

impl RunConfig {
	pub fn new(seed: u64, budget: Budget) -> Self {
		Self {
			seed,
			budget,
			..Self::default()
		}
	}

	#[must_use]
	pub fn seed(mut self, seed: u64) -> Self {
		self.seed = seed;
		self
	}

	#[must_use]
	pub fn budget(mut self, budget: Budget) -> Self {
		self.budget = budget;
		self
	}

	/// Whether finalization actions run once the budget is exhausted; other endings never finalize.
	#[must_use]
	pub fn finalize(mut self, finalize: bool) -> Self {
		self.finalize = finalize;
		self
	}

	pub const fn seed_value(&self) -> u64 {
		self.seed
	}

	pub const fn budget_value(&self) -> Budget {
		self.budget
	}

	pub const fn finalizes(&self) -> bool {
		self.finalize
	}
}
