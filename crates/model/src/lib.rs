//! Domain model for capability-gated scenario runs.
//!
//! A scenario tracks which facts ([`Capability`]) currently hold about a deployment in a
//! [`State`]. Each [`Action`] declares the [`Preconditions`] under which it is legal to
//! run, does its work against an opaque [`Composition`], and reports an [`Outcome`]
//! carrying the [`Effect`] the scheduler applies afterwards. All randomness flows
//! through one [`Entropy`] source so runs replay from a seed.

pub mod action;
pub mod capability;
pub mod catalog;
pub mod effect;
pub mod entropy;
pub mod outcome;
pub mod state;

pub use action::{Action, Composition, StepContext};
pub use capability::{Capability, CapabilityKind, CapabilitySet, Preconditions, Requirement};
pub use catalog::{Catalog, CatalogBuilder, CatalogEntry, CatalogError};
pub use effect::{Effect, Revocation};
pub use entropy::{Entropy, ScriptedEntropy, SeededEntropy};
pub use outcome::{FatalError, Outcome, OutcomeKind};
pub use state::{ScenarioConfig, State};
