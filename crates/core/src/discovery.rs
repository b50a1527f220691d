//! Link-time plugin discovery.
//!
//! Crates contribute generators and source extractors by submitting
//! [`GeneratorPlugin`] and [`ExtractorPlugin`] descriptors with `inventory`.
//! Registries load them lazily on first use. Plugins are ordered by name
//! before priority sorting, so the resulting order is deterministic across
//! builds. A plugin whose build function fails is logged and skipped.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::Result;
use crate::generator::Generator;
use crate::params::ParametersSourceExtractor;

/// Descriptor of a discoverable generator.
pub struct GeneratorPlugin {
	name: &'static str,
	build: fn() -> Result<Arc<dyn Generator>>,
}

inventory::collect!(GeneratorPlugin);

impl GeneratorPlugin {
	pub const fn new(name: &'static str, build: fn() -> Result<Arc<dyn Generator>>) -> Self {
		Self { name, build }
	}

	pub fn name(&self) -> &'static str {
		self.name
	}
}

/// Descriptor of a discoverable source extractor.
pub struct ExtractorPlugin {
	name: &'static str,
	build: fn() -> Result<Arc<dyn ParametersSourceExtractor>>,
}

inventory::collect!(ExtractorPlugin);

impl ExtractorPlugin {
	pub const fn new(
		name: &'static str,
		build: fn() -> Result<Arc<dyn ParametersSourceExtractor>>,
	) -> Self {
		Self { name, build }
	}

	pub fn name(&self) -> &'static str {
		self.name
	}
}

/// Submits a generator for discovery.
///
/// ```ignore
/// fixgen_core::submit_generator!("my-crate::widget", WidgetGenerator::new());
/// ```
#[macro_export]
macro_rules! submit_generator {
	($name:literal, $generator:expr $(,)?) => {
		$crate::inventory::submit! {
			$crate::discovery::GeneratorPlugin::new($name, || {
				::core::result::Result::Ok(
					::std::sync::Arc::new($generator) as ::std::sync::Arc<dyn $crate::generator::Generator>
				)
			})
		}
	};
}

/// Submits a source extractor for discovery.
#[macro_export]
macro_rules! submit_extractor {
	($name:literal, $extractor:expr $(,)?) => {
		$crate::inventory::submit! {
			$crate::discovery::ExtractorPlugin::new($name, || ::core::result::Result::Ok($extractor))
		}
	};
}

pub(crate) fn discover_generators() -> Vec<Arc<dyn Generator>> {
	load(
		"generator",
		inventory::iter::<GeneratorPlugin>
			.into_iter()
			.map(|plugin| (plugin.name, plugin.build)),
	)
}

pub(crate) fn discover_extractors() -> Vec<Arc<dyn ParametersSourceExtractor>> {
	load(
		"extractor",
		inventory::iter::<ExtractorPlugin>
			.into_iter()
			.map(|plugin| (plugin.name, plugin.build)),
	)
}

fn load<T: ?Sized>(
	kind: &'static str,
	plugins: impl Iterator<Item = (&'static str, fn() -> Result<Arc<T>>)>,
) -> Vec<Arc<T>> {
	let mut plugins: Vec<_> = plugins.collect();
	plugins.sort_by_key(|(name, _)| *name);

	let mut loaded = Vec::with_capacity(plugins.len());
	for (name, build) in plugins {
		match build() {
			Ok(entry) => loaded.push(entry),
			Err(error) => warn!(plugin = name, kind, %error, "skipping misconfigured plugin"),
		}
	}
	debug!(kind, count = loaded.len(), "discovered plugins");
	loaded
}
