//! Three-way result of running an action.

use std::error::Error as StdError;

use thiserror::Error;

use crate::effect::Effect;

/// Unrecoverable condition reported by an action. Ends the scenario.
#[derive(Debug, Error)]
pub enum FatalError {
	/// The driver for the system under test cannot be reached.
	#[error("driver unreachable: {0}")]
	DriverUnreachable(String),

	/// An assertion failed that the action did not anticipate.
	#[error("unexpected assertion failure: {0}")]
	UnexpectedAssertion(String),

	/// A driver call failed in a way the action did not classify as expected.
	#[error("{context}: {source}")]
	Driver {
		/// What the action was doing when the call failed.
		context: String,
		/// The driver's own error.
		#[source]
		source: Box<dyn StdError + Send + Sync>,
	},
}

impl FatalError {
	pub fn driver(context: impl Into<String>, source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
		Self::Driver {
			context: context.into(),
			source: source.into(),
		}
	}
}

/// Discriminant of an [`Outcome`], kept in traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum OutcomeKind {
	Success,
	ExpectedFailure,
	Fatal,
}

impl OutcomeKind {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Success => "success",
			Self::ExpectedFailure => "expected_failure",
			Self::Fatal => "fatal",
		}
	}
}

/// What an action reports back to the scheduler.
///
/// The scheduler only reacts to the variant; classifying raw driver failures is the
/// action's job.
#[derive(Debug)]
pub enum Outcome {
	/// The work completed; the effect is applied.
	Success(Effect),
	/// The action provoked and verified an anticipated failure; the effect is applied.
	ExpectedFailure(Effect),
	/// The scenario cannot continue; nothing from this step is applied.
	Fatal(FatalError),
}

impl Outcome {
	/// Success with no capability change.
	pub fn success() -> Self {
		Self::Success(Effect::none())
	}

	/// Expected failure with no capability change.
	pub fn expected_failure() -> Self {
		Self::ExpectedFailure(Effect::none())
	}

	pub fn fatal(error: FatalError) -> Self {
		Self::Fatal(error)
	}

	/// Maps a driver result onto an outcome.
	///
	/// `Ok` becomes [`Outcome::Success`] carrying `effect`. An error accepted by
	/// `is_expected` becomes [`Outcome::ExpectedFailure`] with no capability change;
	/// any other error is [`Outcome::Fatal`] with `context` attached.
	pub fn classify<T, E>(result: Result<T, E>, effect: Effect, context: &str, is_expected: impl FnOnce(&E) -> bool) -> Self
	where
		E: StdError + Send + Sync + 'static,
	{
		match result {
			Ok(_) => Self::Success(effect),
			Err(err) if is_expected(&err) => Self::expected_failure(),
			Err(err) => Self::Fatal(FatalError::driver(context, err)),
		}
	}

	pub fn kind(&self) -> OutcomeKind {
		match self {
			Self::Success(_) => OutcomeKind::Success,
			Self::ExpectedFailure(_) => OutcomeKind::ExpectedFailure,
			Self::Fatal(_) => OutcomeKind::Fatal,
		}
	}

	/// The delta to apply, or `None` for a fatal outcome.
	pub fn effect(&self) -> Option<&Effect> {
		match self {
			Self::Success(effect) | Self::ExpectedFailure(effect) => Some(effect),
			Self::Fatal(_) => None,
		}
	}
}
