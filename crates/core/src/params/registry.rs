//! Registry of parameters source extractors.
//!
//! # Role
//!
//! Holds the registered [`ParametersSourceExtractor`]s in descending priority
//! order, plus the filter and builder strategies that derive one
//! [`ParametersExtractor`] per parameters type. Derived extractors are cached
//! per parameters type.
//!
//! # Invariants
//!
//! - Readers load an immutable snapshot; writers publish a new one.
//! - The derived-extractor cache lives in the snapshot, so every mutation
//!   drops it eagerly.
//! - The registered list is seeded from discovery on first use, and again
//!   after [`ParametersExtractors::reset`].

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::{Mutex, MutexGuard, RwLock};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use super::extractor::same_extractor;
use super::{
	DefaultParametersExtractor, Parameters, ParametersExtractor, ParametersSourceExtractor,
	ParametersType, Source,
};
use crate::discovery;
use crate::error::Result;
use crate::priority::sort_descending;

/// Picks the registered extractors that apply to a parameters type.
pub type SourceExtractorFilter = Arc<
	dyn Fn(&[Arc<dyn ParametersSourceExtractor>], &ParametersType) -> Vec<Arc<dyn ParametersSourceExtractor>>
		+ Send
		+ Sync,
>;

/// Builds the merged extractor from the filtered, priority-ordered list.
pub type ExtractorBuilder =
	Arc<dyn Fn(Vec<Arc<dyn ParametersSourceExtractor>>) -> Arc<dyn ParametersExtractor> + Send + Sync>;

/// Keeps extractors whose target capability the parameters type implements.
pub fn default_filter(
	registered: &[Arc<dyn ParametersSourceExtractor>],
	ty: &ParametersType,
) -> Vec<Arc<dyn ParametersSourceExtractor>> {
	registered
		.iter()
		.filter(|extractor| ty.implements(extractor.parameters_type()))
		.cloned()
		.collect()
}

pub fn default_builder(extractors: Vec<Arc<dyn ParametersSourceExtractor>>) -> Arc<dyn ParametersExtractor> {
	Arc::new(DefaultParametersExtractor::new(extractors))
}

struct ExtractorSnapshot {
	/// `None` until seeded.
	registered: Option<Arc<[Arc<dyn ParametersSourceExtractor>]>>,
	filter: SourceExtractorFilter,
	builder: ExtractorBuilder,
	cache: RwLock<FxHashMap<std::any::TypeId, Arc<dyn ParametersExtractor>>>,
}

impl ExtractorSnapshot {
	fn unseeded(filter: SourceExtractorFilter, builder: ExtractorBuilder) -> Self {
		Self {
			registered: None,
			filter,
			builder,
			cache: RwLock::default(),
		}
	}

	fn registered(&self) -> &[Arc<dyn ParametersSourceExtractor>] {
		self.registered.as_deref().unwrap_or_default()
	}

	fn republish(&self, registered: Vec<Arc<dyn ParametersSourceExtractor>>) -> Self {
		Self {
			registered: Some(registered.into()),
			filter: self.filter.clone(),
			builder: self.builder.clone(),
			cache: RwLock::default(),
		}
	}
}

/// The parameters-extractor registry.
pub struct ParametersExtractors {
	snap: ArcSwap<ExtractorSnapshot>,
	write: Mutex<()>,
	discover: bool,
}

impl ParametersExtractors {
	/// Registry seeded from discovered plugins.
	pub fn new() -> Self {
		Self::build(true)
	}

	/// Registry that starts empty and stays empty across resets.
	pub fn without_discovery() -> Self {
		Self::build(false)
	}

	fn build(discover: bool) -> Self {
		Self {
			snap: ArcSwap::from_pointee(ExtractorSnapshot::unseeded(
				Arc::new(default_filter),
				Arc::new(default_builder),
			)),
			write: Mutex::new(()),
			discover,
		}
	}

	fn current(&self) -> Arc<ExtractorSnapshot> {
		let snap = self.snap.load_full();
		if snap.registered.is_some() {
			return snap;
		}
		let guard = self.write.lock();
		self.seeded(&guard)
	}

	fn seeded(&self, _guard: &MutexGuard<'_, ()>) -> Arc<ExtractorSnapshot> {
		let snap = self.snap.load_full();
		if snap.registered.is_some() {
			return snap;
		}
		let mut registered = if self.discover {
			discovery::discover_extractors()
		} else {
			Vec::new()
		};
		sort_descending(&mut registered, |e| e.priority());
		debug!(count = registered.len(), "seeded parameters source extractors");
		let next = Arc::new(snap.republish(registered));
		self.snap.store(next.clone());
		next
	}

	fn update(&self, f: impl FnOnce(&mut Vec<Arc<dyn ParametersSourceExtractor>>)) {
		let guard = self.write.lock();
		let snap = self.seeded(&guard);
		let mut registered = snap.registered().to_vec();
		f(&mut registered);
		sort_descending(&mut registered, |e| e.priority());
		self.snap.store(Arc::new(snap.republish(registered)));
	}

	/// Registered extractors, highest priority first.
	pub fn registered(&self) -> Vec<Arc<dyn ParametersSourceExtractor>> {
		self.current().registered().to_vec()
	}

	/// Adds extractors and re-sorts by priority.
	pub fn register(&self, extractors: impl IntoIterator<Item = Arc<dyn ParametersSourceExtractor>>) {
		self.update(|registered| {
			let before = registered.len();
			registered.extend(extractors);
			debug!(added = registered.len() - before, "registered parameters source extractors");
		});
	}

	/// Removes every registered extractor equal to one of `extractors`.
	pub fn unregister(&self, extractors: &[Arc<dyn ParametersSourceExtractor>]) {
		self.update(|registered| {
			registered.retain(|entry| !extractors.iter().any(|gone| same_extractor(&**entry, &**gone)));
		});
	}

	/// Drops all registrations. The next use re-seeds from discovery.
	///
	/// The filter and builder strategies are kept.
	pub fn reset(&self) {
		let _guard = self.write.lock();
		let snap = self.snap.load();
		self.snap.store(Arc::new(ExtractorSnapshot::unseeded(
			snap.filter.clone(),
			snap.builder.clone(),
		)));
		debug!("reset parameters source extractors");
	}

	pub fn filter(&self) -> SourceExtractorFilter {
		self.snap.load().filter.clone()
	}

	/// Replaces the filter strategy. Registrations are kept.
	pub fn set_filter(&self, filter: SourceExtractorFilter) {
		let _guard = self.write.lock();
		let snap = self.snap.load();
		self.snap.store(Arc::new(ExtractorSnapshot {
			registered: snap.registered.clone(),
			filter,
			builder: snap.builder.clone(),
			cache: RwLock::default(),
		}));
	}

	pub fn builder(&self) -> ExtractorBuilder {
		self.snap.load().builder.clone()
	}

	/// Replaces the builder strategy. Registrations are kept.
	pub fn set_builder(&self, builder: ExtractorBuilder) {
		let _guard = self.write.lock();
		let snap = self.snap.load();
		self.snap.store(Arc::new(ExtractorSnapshot {
			registered: snap.registered.clone(),
			filter: snap.filter.clone(),
			builder,
			cache: RwLock::default(),
		}));
	}

	/// Merged extractor for `ty`, built on first request and cached.
	pub fn get_extractor(&self, ty: &ParametersType) -> Arc<dyn ParametersExtractor> {
		let snap = self.current();
		let id = ty.key().id();
		if let Some(hit) = snap.cache.read().get(&id) {
			return hit.clone();
		}
		let applicable = (snap.filter)(snap.registered(), ty);
		trace!(parameters = %ty, applicable = applicable.len(), "building parameters extractor");
		let built = (snap.builder)(applicable);
		snap.cache.write().entry(id).or_insert(built).clone()
	}

	/// Creates empty parameters of type `ty` and merges `sources` into them.
	pub fn create_parameters(
		&self,
		ty: &ParametersType,
		sources: &[&dyn Source],
	) -> Result<Box<dyn Parameters>> {
		let mut params = ty.create_empty()?;
		if !sources.is_empty() {
			self.get_extractor(ty).extract_parameters(&mut *params, sources)?;
		}
		Ok(params)
	}

	#[cfg(test)]
	pub(crate) fn cached_extractors(&self) -> usize {
		self.snap.load().cache.read().len()
	}
}

impl Default for ParametersExtractors {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for ParametersExtractors {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let snap = self.snap.load();
		f.debug_struct("ParametersExtractors")
			.field("registered", &snap.registered.as_ref().map(|r| r.len()))
			.field("cached", &snap.cache.read().len())
			.field("discover", &self.discover)
			.finish()
	}
}
