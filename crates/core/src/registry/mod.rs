//! The generator registry.
//!
//! # Role
//!
//! [`Generators`] keeps the registered generators in descending priority
//! order and resolves a requested [`Type`] to the first generator that
//! supports it. It is the entrypoint for value generation: the contract-level
//! methods return erased values of the value type, the typed facade
//! (`default`, `random`, ...) returns finished values of the requested Rust
//! type.
//!
//! # Invariants
//!
//! - Readers load an immutable snapshot; writers publish a new one under a
//!   mutex, so concurrent registrations are never lost.
//! - Per-type lookups (hits and misses) are cached inside the snapshot, so
//!   every mutation drops them eagerly.
//! - The generator list is seeded from discovery on first use and again after
//!   [`Generators::reset`].

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use parking_lot::{Mutex, MutexGuard, RwLock};
use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};

use crate::config::GeneratorsConfig;
use crate::discovery;
use crate::error::{Error, Result};
use crate::factory::{FactoryDef, FactoryGenerator};
use crate::generator::{Generator, same_generator};
use crate::params::{Parameters, ParametersExtractors, ParametersType, Source};
use crate::priority::sort_descending;
use crate::types::{Declare, Type, Value, downcast};

mod dispatch;
#[cfg(test)]
mod tests;

pub(crate) use dispatch::Mode;

#[derive(Clone)]
enum Lookup {
	Found(Arc<dyn Generator>),
	Missing,
}

struct GeneratorSnapshot {
	entries: Arc<[Arc<dyn Generator>]>,
	lookups: RwLock<FxHashMap<Type, Lookup>>,
}

impl GeneratorSnapshot {
	fn new(entries: Vec<Arc<dyn Generator>>) -> Self {
		Self {
			entries: entries.into(),
			lookups: RwLock::default(),
		}
	}
}

/// Registry of generators plus the extractor registry they draw parameters
/// from.
pub struct Generators {
	snap: ArcSwapOption<GeneratorSnapshot>,
	write: Mutex<()>,
	extractors: Arc<ParametersExtractors>,
	config: GeneratorsConfig,
}

impl Generators {
	/// Registry with the default configuration: discovery on.
	pub fn new() -> Self {
		Self::with_config(GeneratorsConfig::default())
	}

	pub fn with_config(config: GeneratorsConfig) -> Self {
		let extractors = if config.discover {
			ParametersExtractors::new()
		} else {
			ParametersExtractors::without_discovery()
		};
		Self::with_extractors(config, Arc::new(extractors))
	}

	/// Registry sharing an existing extractor registry.
	pub fn with_extractors(config: GeneratorsConfig, extractors: Arc<ParametersExtractors>) -> Self {
		Self {
			snap: ArcSwapOption::empty(),
			write: Mutex::new(()),
			extractors,
			config,
		}
	}

	pub fn config(&self) -> &GeneratorsConfig {
		&self.config
	}

	pub fn extractors(&self) -> &Arc<ParametersExtractors> {
		&self.extractors
	}

	fn current(&self) -> Arc<GeneratorSnapshot> {
		if let Some(snap) = self.snap.load_full() {
			return snap;
		}
		let guard = self.write.lock();
		self.seeded(&guard)
	}

	fn seeded(&self, _guard: &MutexGuard<'_, ()>) -> Arc<GeneratorSnapshot> {
		if let Some(snap) = self.snap.load_full() {
			return snap;
		}
		let mut entries = if self.config.discover {
			discovery::discover_generators()
		} else {
			Vec::new()
		};
		for generator in &entries {
			if let Some(nulls) = generator.null_probability()
				&& let Err(error) = nulls.set(self.config.null_probability)
			{
				warn!(generator = generator.name(), %error, "ignoring configured null probability");
			}
		}
		sort_descending(&mut entries, |g| g.priority());
		debug!(count = entries.len(), "seeded generators");
		let snap = Arc::new(GeneratorSnapshot::new(entries));
		self.snap.store(Some(snap.clone()));
		snap
	}

	fn update(&self, f: impl FnOnce(&mut Vec<Arc<dyn Generator>>)) {
		let guard = self.write.lock();
		let snap = self.seeded(&guard);
		let mut entries = snap.entries.to_vec();
		f(&mut entries);
		sort_descending(&mut entries, |g| g.priority());
		self.snap.store(Some(Arc::new(GeneratorSnapshot::new(entries))));
	}

	/// Registered generators, highest priority first.
	pub fn registered(&self) -> Vec<Arc<dyn Generator>> {
		self.current().entries.to_vec()
	}

	/// Adds generators and re-sorts by priority. Earlier registrations win
	/// ties.
	pub fn register(&self, generators: impl IntoIterator<Item = Arc<dyn Generator>>) {
		self.update(|entries| {
			let before = entries.len();
			entries.extend(generators);
			debug!(added = entries.len() - before, "registered generators");
		});
	}

	/// Removes every registered generator equal to one of `generators`:
	/// same concrete type and same name.
	pub fn unregister(&self, generators: &[Arc<dyn Generator>]) {
		self.update(|entries| {
			entries.retain(|entry| !generators.iter().any(|gone| same_generator(&**entry, &**gone)));
		});
	}

	/// Drops all registrations. The next use re-seeds from discovery.
	pub fn reset(&self) {
		let _guard = self.write.lock();
		self.snap.store(None);
		debug!("reset generators");
	}

	/// Registers a factory with the registry's factory generator, adding one
	/// if none is registered.
	pub fn register_factory(&self, factory: FactoryDef) {
		self.update(|entries| {
			let existing = entries.iter().find_map(|entry| {
				let any: &dyn Any = &**entry;
				any.downcast_ref::<FactoryGenerator>()
			});
			match existing {
				Some(generator) => generator.add(factory),
				None => {
					let generator = FactoryGenerator::new();
					generator.add(factory);
					entries.push(Arc::new(generator));
				}
			}
		});
	}

	fn lookup(&self, ty: &Type) -> Lookup {
		let snap = self.current();
		if let Some(hit) = snap.lookups.read().get(ty) {
			return hit.clone();
		}
		let found = match snap.entries.iter().find(|g| g.supports(ty)) {
			Some(generator) => {
				trace!(%ty, generator = generator.name(), "resolved generator");
				Lookup::Found(generator.clone())
			}
			None => {
				trace!(%ty, "no generator found");
				Lookup::Missing
			}
		};
		snap.lookups.write().entry(ty.clone()).or_insert(found).clone()
	}

	pub fn supports(&self, ty: &Type) -> bool {
		matches!(self.lookup(ty), Lookup::Found(_))
	}

	/// Highest-priority generator supporting `ty`.
	pub fn get_generator(&self, ty: &Type) -> Result<Arc<dyn Generator>> {
		match self.lookup(ty) {
			Lookup::Found(generator) => Ok(generator),
			Lookup::Missing => Err(Error::GeneratorNotFound { ty: ty.to_string() }),
		}
	}

	/// Parameters of type `ptype` for generating `ty`, merged from the
	/// declaration of `ty` (when generic) followed by `sources`.
	pub fn parameters_for(
		&self,
		ptype: &ParametersType,
		ty: &Type,
		sources: &[&dyn Source],
	) -> Result<Box<dyn Parameters>> {
		match ty.declaration() {
			Some(declaration) => {
				let mut all: Vec<&dyn Source> = Vec::with_capacity(sources.len() + 1);
				all.push(declaration);
				all.extend_from_slice(sources);
				self.extractors.create_parameters(ptype, &all)
			}
			None => self.extractors.create_parameters(ptype, sources),
		}
	}

	pub(crate) fn dispatch(&self, ty: &Type, sources: &[&dyn Source], mode: Mode) -> Result<Option<Value>> {
		let generator = self.get_generator(ty)?;
		if sources.is_empty() {
			return mode.run(&*generator, ty, self);
		}
		let Some(parametrizable) = generator.as_parametrizable() else {
			return Err(Error::UnsupportedParameters {
				generator: generator.name().to_owned(),
			});
		};
		let params = self.parameters_for(&parametrizable.parameters_type(), ty, sources)?;
		mode.run_with(parametrizable, ty, &*params, self)
	}

	fn required(&self, ty: &Type, value: Option<Value>) -> Result<Value> {
		value.ok_or_else(|| Error::UnexpectedNull { ty: ty.to_string() })
	}

	pub fn default_value(&self, ty: &Type) -> Result<Value> {
		self.default_value_with(ty, &[])
	}

	/// Default value tuned by `sources`. Fails with
	/// [`Error::UnsupportedParameters`] when sources are given to a generator
	/// that takes none.
	pub fn default_value_with(&self, ty: &Type, sources: &[&dyn Source]) -> Result<Value> {
		let value = self.dispatch(ty, sources, Mode::Default)?;
		self.required(ty, value)
	}

	pub fn nullable_default_value(&self, ty: &Type) -> Result<Option<Value>> {
		self.nullable_default_value_with(ty, &[])
	}

	pub fn nullable_default_value_with(&self, ty: &Type, sources: &[&dyn Source]) -> Result<Option<Value>> {
		self.dispatch(ty, sources, Mode::NullableDefault)
	}

	pub fn random_value(&self, ty: &Type) -> Result<Value> {
		self.random_value_with(ty, &[])
	}

	pub fn random_value_with(&self, ty: &Type, sources: &[&dyn Source]) -> Result<Value> {
		let value = self.dispatch(ty, sources, Mode::Random)?;
		self.required(ty, value)
	}

	pub fn nullable_random_value(&self, ty: &Type) -> Result<Option<Value>> {
		self.nullable_random_value_with(ty, &[])
	}

	pub fn nullable_random_value_with(&self, ty: &Type, sources: &[&dyn Source]) -> Result<Option<Value>> {
		self.dispatch(ty, sources, Mode::NullableRandom)
	}

	fn typed<T: Declare>(&self, sources: &[&dyn Source], mode: Mode) -> Result<T> {
		let ty = T::declare();
		let value = self.dispatch(&ty, sources, mode)?;
		downcast(ty.finish(value)?)
	}

	/// Default value of `T`. `Option<T>` yields `Some` of the default.
	pub fn default<T: Declare>(&self) -> Result<T> {
		self.typed(&[], Mode::Default)
	}

	pub fn default_with<T: Declare>(&self, sources: &[&dyn Source]) -> Result<T> {
		self.typed(sources, Mode::Default)
	}

	/// Default value of `T`, which is `None` for `Option<T>`.
	pub fn nullable_default<T: Declare>(&self) -> Result<T> {
		self.typed(&[], Mode::NullableDefault)
	}

	pub fn nullable_default_with<T: Declare>(&self, sources: &[&dyn Source]) -> Result<T> {
		self.typed(sources, Mode::NullableDefault)
	}

	pub fn random<T: Declare>(&self) -> Result<T> {
		self.typed(&[], Mode::Random)
	}

	pub fn random_with<T: Declare>(&self, sources: &[&dyn Source]) -> Result<T> {
		self.typed(sources, Mode::Random)
	}

	/// Random value of `T`. `Option<T>` is `None` with the generator's null
	/// probability.
	pub fn nullable_random<T: Declare>(&self) -> Result<T> {
		self.typed(&[], Mode::NullableRandom)
	}

	pub fn nullable_random_with<T: Declare>(&self, sources: &[&dyn Source]) -> Result<T> {
		self.typed(sources, Mode::NullableRandom)
	}

	#[cfg(test)]
	pub(crate) fn cached_lookups(&self) -> usize {
		self.snap
			.load()
			.as_ref()
			.map_or(0, |snap| snap.lookups.read().len())
	}
}

impl Default for Generators {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for Generators {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let snap = self.snap.load();
		f.debug_struct("Generators")
			.field("registered", &snap.as_ref().map(|s| s.entries.len()))
			.field("config", &self.config)
			.field("extractors", &self.extractors)
			.finish()
	}
}
