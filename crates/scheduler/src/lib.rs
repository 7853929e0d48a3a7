//! Seeded, capability-gated scenario scheduler.
//!
//! A [`Scheduler`] drives one scenario: it runs the catalog's bootstrap actions, then
//! repeatedly draws a legal explorer action until a [`Budget`] runs out, no action is
//! legal, an action reports a fatal outcome, or a [`StopToken`] fires. Finalization
//! actions run after a non-fatal ending. The [`RunReport`] records every step so two runs
//! with the same seed and catalog can be compared step for step.

pub mod config;
mod invariants;
pub(crate) mod preflight;
pub mod scheduler;
pub mod token;
pub mod trace;

pub use config::{Budget, RunConfig};
pub use gauntlet_model as model;
pub use scheduler::Scheduler;
pub use token::StopToken;
pub use trace::{RunReport, StepOutcome, StepPhase, StepRecord, TerminalReason};
