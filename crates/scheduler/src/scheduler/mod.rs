//! The capability-gated step loop.
//!
//! One scenario runs as `bootstrap -> explore -> finalize`. Each exploration step filters
//! the catalog to the legal subset, draws one entry from the seeded [`Entropy`], awaits
//! its `run`, and applies the declared effect. Awaiting `run` is the only suspension
//! point; budget and stop checks happen strictly between steps. Finalization follows
//! budget exhaustion only: a stalled run executes no further steps.

use std::sync::Arc;

use gauntlet_model::{Action, Catalog, Composition, Effect, Entropy, Outcome, SeededEntropy, State, StepContext};
use tokio::time::Instant;
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::config::RunConfig;
use crate::preflight::{PreflightDecision, check, legal_explorers};
use crate::token::StopToken;
use crate::trace::{RunReport, StepOutcome, StepPhase, StepRecord, TerminalReason};

/// Owns the state timeline of one scenario and drives it to a terminal reason.
pub struct Scheduler<C: Composition + ?Sized> {
	catalog: Catalog<C>,
	state: State,
	entropy: Box<dyn Entropy>,
	config: RunConfig,
	steps: Vec<StepRecord>,
}

impl<C: Composition + ?Sized> Scheduler<C> {
	/// Creates a scheduler drawing from a ChaCha stream seeded with `config`'s seed.
	pub fn new(catalog: Catalog<C>, state: State, config: RunConfig) -> Self {
		Self {
			catalog,
			state,
			entropy: Box::new(SeededEntropy::new(config.seed)),
			config,
			steps: Vec::new(),
		}
	}

	/// Replaces the draw source, for example with a scripted sequence.
	#[must_use]
	pub fn with_entropy(mut self, entropy: impl Entropy + 'static) -> Self {
		self.entropy = Box::new(entropy);
		self
	}

	pub fn state(&self) -> &State {
		&self.state
	}

	pub fn config(&self) -> &RunConfig {
		&self.config
	}

	/// Steps executed so far.
	pub fn trace(&self) -> &[StepRecord] {
		&self.steps
	}

	/// Names of explorer entries legal under the current state, in catalog order.
	pub fn legal_actions(&self) -> Vec<&str> {
		legal_explorers(&self.catalog, self.state.capabilities())
			.into_iter()
			.map(|idx| self.catalog.explorers()[idx].name())
			.collect()
	}

	/// Runs the scenario to completion.
	pub async fn run(self, composition: &mut C) -> RunReport {
		self.run_until_stopped(composition, &StopToken::new()).await
	}

	/// Runs the scenario, additionally ending it when `stop` is triggered.
	///
	/// A stop request never interrupts a step that is already running.
	pub async fn run_until_stopped(mut self, composition: &mut C, stop: &StopToken) -> RunReport {
		let span = info_span!("scenario", seed = self.config.seed);
		async move {
			let started = Instant::now();
			info!(
				bootstrap = self.catalog.bootstrap().len(),
				explorers = self.catalog.explorers().len(),
				held = self.state.capabilities().len(),
				"scenario started"
			);

			let terminal = match self.bootstrap(composition, stop).await {
				Ok(()) => self.explore(composition, stop, started).await,
				Err(reason) => reason,
			};

			let mut skipped_finalizers = Vec::new();
			let terminal = if self.config.finalize && terminal.is_exhaustion() {
				match self.finalize(composition, stop, &mut skipped_finalizers).await {
					Ok(()) => terminal,
					Err(reason) => reason,
				}
			} else {
				terminal
			};

			let elapsed = started.elapsed();
			info!(%terminal, steps = self.steps.len(), ?elapsed, "scenario finished");

			RunReport {
				seed: self.config.seed,
				terminal,
				steps: self.steps,
				skipped_finalizers,
				final_state: self.state,
				elapsed,
			}
		}
		.instrument(span)
		.await
	}

	async fn bootstrap(&mut self, composition: &mut C, stop: &StopToken) -> Result<(), TerminalReason> {
		let actions = self.catalog.bootstrap().to_vec();
		for action in actions {
			if stop.is_stopped() {
				return Err(TerminalReason::Cancelled);
			}
			if let PreflightDecision::Deny { missing } = check(&*action, self.state.capabilities()) {
				warn!(action = action.name(), missing = ?missing, "bootstrap action not legal");
				return Err(TerminalReason::Stalled {
					phase: StepPhase::Bootstrap,
				});
			}
			self.execute(&action, StepPhase::Bootstrap, 1, composition).await?;
		}
		Ok(())
	}

	async fn explore(&mut self, composition: &mut C, stop: &StopToken, started: Instant) -> TerminalReason {
		let budget = self.config.budget;
		let deadline = budget.max_duration().map(|limit| started + limit);
		let mut explored: u64 = 0;

		loop {
			if stop.is_stopped() {
				return TerminalReason::Cancelled;
			}
			if budget.max_steps().is_some_and(|max| explored >= max) {
				return TerminalReason::StepBudgetExhausted;
			}
			if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
				return TerminalReason::TimeBudgetExhausted;
			}

			let legal = legal_explorers(&self.catalog, self.state.capabilities());
			if legal.is_empty() {
				warn!(step = self.steps.len(), held = self.state.capabilities().len(), "no legal action");
				return TerminalReason::Stalled { phase: StepPhase::Explore };
			}

			let explorers = self.catalog.explorers();
			let weights: Vec<u32> = legal.iter().map(|&idx| explorers[idx].weight().get()).collect();
			let drawn = self.entropy.pick_weighted(&weights).min(legal.len() - 1);
			let action = Arc::clone(explorers[legal[drawn]].action());
			debug!(candidates = legal.len(), action = action.name(), "action selected");

			if let Err(reason) = self.execute(&action, StepPhase::Explore, legal.len(), composition).await {
				return reason;
			}
			explored += 1;
		}
	}

	async fn finalize(&mut self, composition: &mut C, stop: &StopToken, skipped: &mut Vec<String>) -> Result<(), TerminalReason> {
		let actions = self.catalog.finalization().to_vec();
		for action in actions {
			if stop.is_stopped() {
				return Err(TerminalReason::Cancelled);
			}
			if let PreflightDecision::Deny { missing } = check(&*action, self.state.capabilities()) {
				warn!(action = action.name(), missing = ?missing, "skipping finalization action");
				skipped.push(action.name().to_string());
				continue;
			}
			self.execute(&action, StepPhase::Finalize, 1, composition).await?;
		}
		Ok(())
	}

	/// Runs one legal action and applies its outcome.
	///
	/// Returns the terminal reason when the outcome is fatal; state is then left exactly
	/// as it was before the step.
	async fn execute(&mut self, action: &Arc<dyn Action<C>>, phase: StepPhase, candidates: usize, composition: &mut C) -> Result<(), TerminalReason> {
		let index = self.steps.len() as u64;
		debug_assert!(
			action.requires().is_satisfied_by(self.state.capabilities()),
			"scheduled '{}' without its preconditions",
			action.name()
		);

		let span = info_span!("step", index, action = action.name(), phase = phase.as_str());
		let outcome = {
			let mut ctx = StepContext::new(index, &self.state, &mut *self.entropy);
			action.run(composition, &mut ctx).instrument(span.clone()).await
		};

		let (recorded, applied) = match outcome {
			Outcome::Success(effect) => (StepOutcome::Success, effect),
			Outcome::ExpectedFailure(effect) => (StepOutcome::ExpectedFailure, effect),
			Outcome::Fatal(err) => {
				let message = err.to_string();
				span.in_scope(|| error!(error = %err, "action failed fatally"));
				self.steps.push(StepRecord {
					index,
					phase,
					action: action.name().to_string(),
					candidates,
					outcome: StepOutcome::Fatal { message: message.clone() },
					applied: Effect::none(),
				});
				return Err(TerminalReason::Fatal {
					action: action.name().to_string(),
					message,
				});
			}
		};

		self.state.apply(&applied);
		debug_assert!(applied.holds_in(self.state.capabilities()), "effect of '{}' not reflected in state", action.name());
		span.in_scope(|| {
			info!(
				outcome = recorded.kind().as_str(),
				added = applied.added().len(),
				removed = applied.removed().len(),
				"step finished"
			)
		});

		self.steps.push(StepRecord {
			index,
			phase,
			action: action.name().to_string(),
			candidates,
			outcome: recorded,
			applied,
		});
		Ok(())
	}
}
