//! Static action catalogs.
//!
//! A catalog has three parts: bootstrap actions run once in order, weighted explorer
//! entries drawn at random, and finalization actions run once in order at the end.

use std::collections::HashSet;
use std::fmt;
use std::num::NonZeroU32;
use std::sync::Arc;

use thiserror::Error;

use crate::action::{Action, Composition};

/// Errors rejected while assembling a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
	/// Two explorer entries share a name, so traces could not tell them apart.
	#[error("duplicate explorer action: {0}")]
	DuplicateName(String),

	/// An explorer entry was given weight zero and could never be drawn.
	#[error("explorer action '{0}' has zero weight")]
	ZeroWeight(String),
}

/// A randomly selectable catalog entry.
pub struct CatalogEntry<C: Composition + ?Sized> {
	action: Arc<dyn Action<C>>,
	weight: NonZeroU32,
}

impl<C: Composition + ?Sized> CatalogEntry<C> {
	pub fn action(&self) -> &Arc<dyn Action<C>> {
		&self.action
	}

	pub fn name(&self) -> &str {
		self.action.name()
	}

	pub const fn weight(&self) -> NonZeroU32 {
		self.weight
	}
}

impl<C: Composition + ?Sized> Clone for CatalogEntry<C> {
	fn clone(&self) -> Self {
		Self {
			action: Arc::clone(&self.action),
			weight: self.weight,
		}
	}
}

impl<C: Composition + ?Sized> fmt::Debug for CatalogEntry<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CatalogEntry").field("name", &self.name()).field("weight", &self.weight).finish()
	}
}

/// The set of actions known when a scenario starts.
pub struct Catalog<C: Composition + ?Sized> {
	bootstrap: Vec<Arc<dyn Action<C>>>,
	explorers: Vec<CatalogEntry<C>>,
	finalization: Vec<Arc<dyn Action<C>>>,
}

impl<C: Composition + ?Sized> Catalog<C> {
	pub fn builder() -> CatalogBuilder<C> {
		CatalogBuilder::default()
	}

	pub fn bootstrap(&self) -> &[Arc<dyn Action<C>>] {
		&self.bootstrap
	}

	/// Entries eligible for random selection, in declaration order.
	pub fn explorers(&self) -> &[CatalogEntry<C>] {
		&self.explorers
	}

	pub fn finalization(&self) -> &[Arc<dyn Action<C>>] {
		&self.finalization
	}

	pub fn find(&self, name: &str) -> Option<&CatalogEntry<C>> {
		self.explorers.iter().find(|entry| entry.name() == name)
	}
}

impl<C: Composition + ?Sized> Clone for Catalog<C> {
	fn clone(&self) -> Self {
		Self {
			bootstrap: self.bootstrap.clone(),
			explorers: self.explorers.clone(),
			finalization: self.finalization.clone(),
		}
	}
}

impl<C: Composition + ?Sized> fmt::Debug for Catalog<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let names = |actions: &[Arc<dyn Action<C>>]| actions.iter().map(|a| a.name().to_string()).collect::<Vec<_>>();
		f.debug_struct("Catalog")
			.field("bootstrap", &names(&self.bootstrap))
			.field("explorers", &self.explorers)
			.field("finalization", &names(&self.finalization))
			.finish()
	}
}

/// Builder for [`Catalog`]. Validation happens in [`CatalogBuilder::build`].
pub struct CatalogBuilder<C: Composition + ?Sized> {
	bootstrap: Vec<Arc<dyn Action<C>>>,
	explorers: Vec<(Arc<dyn Action<C>>, u32)>,
	finalization: Vec<Arc<dyn Action<C>>>,
}

impl<C: Composition + ?Sized> Default for CatalogBuilder<C> {
	fn default() -> Self {
		Self {
			bootstrap: Vec::new(),
			explorers: Vec::new(),
			finalization: Vec::new(),
		}
	}
}

impl<C: Composition + ?Sized> CatalogBuilder<C> {
	/// Appends an action run once, in order, before random exploration.
	#[must_use]
	pub fn bootstrap(mut self, action: impl Action<C> + 'static) -> Self {
		self.bootstrap.push(Arc::new(action));
		self
	}

	/// Adds an explorer entry with weight 1.
	#[must_use]
	pub fn action(self, action: impl Action<C> + 'static) -> Self {
		self.weighted(action, 1)
	}

	/// Adds an explorer entry drawn proportionally to `weight` among legal entries.
	#[must_use]
	pub fn weighted(self, action: impl Action<C> + 'static, weight: u32) -> Self {
		let action: Arc<dyn Action<C>> = Arc::new(action);
		self.shared(action, weight)
	}

	/// Adds an already shared explorer entry.
	#[must_use]
	pub fn shared(mut self, action: Arc<dyn Action<C>>, weight: u32) -> Self {
		self.explorers.push((action, weight));
		self
	}

	/// Appends an action run once, in order, after the exploration budget is exhausted.
	#[must_use]
	pub fn finalize_with(mut self, action: impl Action<C> + 'static) -> Self {
		self.finalization.push(Arc::new(action));
		self
	}

	pub fn build(self) -> Result<Catalog<C>, CatalogError> {
		let mut seen = HashSet::new();
		let mut explorers = Vec::with_capacity(self.explorers.len());
		for (action, weight) in self.explorers {
			if !seen.insert(action.name().to_string()) {
				return Err(CatalogError::DuplicateName(action.name().to_string()));
			}
			let weight = NonZeroU32::new(weight).ok_or_else(|| CatalogError::ZeroWeight(action.name().to_string()))?;
			explorers.push(CatalogEntry { action, weight });
		}
		Ok(Catalog {
			bootstrap: self.bootstrap,
			explorers,
			finalization: self.finalization,
		})
	}
}
