//! Draw sources for action selection and instance picks.
//!
//! Every random decision in a scenario run goes through one [`Entropy`] value owned by
//! the scheduler, so the same seed replays the same decisions regardless of timing.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of reproducible index draws.
pub trait Entropy: Send {
	/// Returns an index into `weights`, drawn proportionally to each weight.
	///
	/// Callers pass a non-empty slice of non-zero weights.
	fn pick_weighted(&mut self, weights: &[u32]) -> usize;

	/// Returns an index in `0..len`. Callers pass `len > 0`.
	fn pick_index(&mut self, len: usize) -> usize;
}

/// ChaCha8 stream seeded from a `u64`.
#[derive(Debug, Clone)]
pub struct SeededEntropy {
	seed: u64,
	rng: ChaCha8Rng,
}

impl SeededEntropy {
	pub fn new(seed: u64) -> Self {
		Self {
			seed,
			rng: ChaCha8Rng::seed_from_u64(seed),
		}
	}

	pub const fn seed(&self) -> u64 {
		self.seed
	}
}

impl Entropy for SeededEntropy {
	fn pick_weighted(&mut self, weights: &[u32]) -> usize {
		let total: u64 = weights.iter().map(|&w| u64::from(w)).sum();
		if total == 0 {
			return 0;
		}
		let mut point = self.rng.gen_range(0..total);
		for (idx, &weight) in weights.iter().enumerate() {
			let weight = u64::from(weight);
			if point < weight {
				return idx;
			}
			point -= weight;
		}
		weights.len() - 1
	}

	fn pick_index(&mut self, len: usize) -> usize {
		if len <= 1 {
			return 0;
		}
		self.rng.gen_range(0..len)
	}
}

/// Replays a fixed sequence of indices, cycling when exhausted.
///
/// Each scripted value is reduced modulo the number of candidates; weights are ignored.
/// An empty script always yields index 0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedEntropy {
	script: Vec<usize>,
	cursor: usize,
}

impl ScriptedEntropy {
	pub fn new(script: impl IntoIterator<Item = usize>) -> Self {
		Self {
			script: script.into_iter().collect(),
			cursor: 0,
		}
	}

	/// Number of draws served so far.
	pub const fn draws(&self) -> usize {
		self.cursor
	}

	fn next(&mut self, len: usize) -> usize {
		if self.script.is_empty() || len == 0 {
			self.cursor += 1;
			return 0;
		}
		let value = self.script[self.cursor % self.script.len()];
		self.cursor += 1;
		value % len
	}
}

impl Entropy for ScriptedEntropy {
	fn pick_weighted(&mut self, weights: &[u32]) -> usize {
		self.next(weights.len())
	}

	fn pick_index(&mut self, len: usize) -> usize {
		self.next(len)
	}
}
