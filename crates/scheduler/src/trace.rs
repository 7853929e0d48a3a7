//! Step records and the end-of-run report.

use std::fmt;
use std::time::Duration;

use gauntlet_model::{Effect, OutcomeKind, State};

/// Which part of the run a step belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum StepPhase {
	Bootstrap,
	Explore,
	Finalize,
}

impl StepPhase {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Bootstrap => "bootstrap",
			Self::Explore => "explore",
			Self::Finalize => "finalize",
		}
	}
}

impl fmt::Display for StepPhase {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Outcome of one executed step as kept in the trace.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum StepOutcome {
	Success,
	ExpectedFailure,
	Fatal { message: String },
}

impl StepOutcome {
	pub fn kind(&self) -> OutcomeKind {
		match self {
			Self::Success => OutcomeKind::Success,
			Self::ExpectedFailure => OutcomeKind::ExpectedFailure,
			Self::Fatal { .. } => OutcomeKind::Fatal,
		}
	}
}

/// One executed step.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StepRecord {
	/// Zero-based position across all phases.
	pub index: u64,
	pub phase: StepPhase,
	pub action: String,
	/// Number of legal explorer entries the action was drawn from; 1 outside exploration.
	pub candidates: usize,
	pub outcome: StepOutcome,
	/// The delta applied to state; empty for fatal steps.
	pub applied: Effect,
}

/// Why a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TerminalReason {
	StepBudgetExhausted,
	TimeBudgetExhausted,
	/// No legal action existed: either the catalog cannot reach a needed capability or
	/// the system is in a genuinely terminal state.
	Stalled { phase: StepPhase },
	Fatal { action: String, message: String },
	Cancelled,
}

impl TerminalReason {
	/// True for endings that ran out of budget rather than hitting a condition.
	pub const fn is_exhaustion(&self) -> bool {
		matches!(self, Self::StepBudgetExhausted | Self::TimeBudgetExhausted)
	}

	pub const fn is_fatal(&self) -> bool {
		matches!(self, Self::Fatal { .. })
	}
}

impl fmt::Display for TerminalReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::StepBudgetExhausted => f.write_str("step budget exhausted"),
			Self::TimeBudgetExhausted => f.write_str("time budget exhausted"),
			Self::Stalled { phase } => write!(f, "stalled during {phase}: no legal action"),
			Self::Fatal { action, message } => write!(f, "fatal error in '{action}': {message}"),
			Self::Cancelled => f.write_str("stopped on request"),
		}
	}
}

/// Everything a run produced, for diagnosis and replay comparison.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RunReport {
	pub seed: u64,
	pub terminal: TerminalReason,
	pub steps: Vec<StepRecord>,
	/// Finalization actions skipped because their preconditions did not hold.
	pub skipped_finalizers: Vec<String>,
	pub final_state: State,
	pub elapsed: Duration,
}

impl RunReport {
	/// `(action, outcome)` pairs in execution order.
	pub fn sequence(&self) -> Vec<(&str, OutcomeKind)> {
		self.steps.iter().map(|step| (step.action.as_str(), step.outcome.kind())).collect()
	}

	/// Steps of one phase.
	pub fn phase(&self, phase: StepPhase) -> impl Iterator<Item = &StepRecord> + '_ {
		self.steps.iter().filter(move |step| step.phase == phase)
	}

	pub fn explored(&self) -> usize {
		self.phase(StepPhase::Explore).count()
	}
}
