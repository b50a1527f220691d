use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use super::{Parameters, Source};
use crate::error::{Error, Result};
use crate::priority::Priority;
use crate::types::TypeKey;

/// Copies information from one kind of source into one kind of parameters.
///
/// `parameters_type` names the capability the extractor writes (a facet
/// trait object or a concrete parameters type). `source_type` names what it
/// reads: a concrete source type, or a facet that parameters sources expose.
///
/// Two extractors are the same registration when their concrete type, name,
/// parameters type and source type all agree.
pub trait ParametersSourceExtractor: Any + Send + Sync + 'static {
	fn name(&self) -> &str {
		type_name::<Self>()
	}

	fn parameters_type(&self) -> TypeKey;

	fn source_type(&self) -> TypeKey;

	fn priority(&self) -> Priority {
		Priority::DEFAULT
	}

	/// Writes what `source` carries into `target`.
	///
	/// Only called with sources matching [`Self::source_type`] and targets
	/// exposing [`Self::parameters_type`].
	fn extract_parameters(&self, source: &dyn Source, target: &mut dyn Parameters) -> Result<()>;
}

pub(crate) fn same_extractor(
	a: &dyn ParametersSourceExtractor,
	b: &dyn ParametersSourceExtractor,
) -> bool {
	let (a_any, b_any): (&dyn Any, &dyn Any) = (a, b);
	a_any.type_id() == b_any.type_id()
		&& a.name() == b.name()
		&& a.parameters_type() == b.parameters_type()
		&& a.source_type() == b.source_type()
}

impl fmt::Debug for dyn ParametersSourceExtractor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ParametersSourceExtractor")
			.field("name", &self.name())
			.field("parameters", &self.parameters_type())
			.field("source", &self.source_type())
			.field("priority", &self.priority())
			.finish()
	}
}

/// Merges a list of sources into one parameters value.
pub trait ParametersExtractor: Send + Sync {
	fn extract_parameters(&self, target: &mut dyn Parameters, sources: &[&dyn Source]) -> Result<()>;
}

/// The default merge: sources in order, extractors in ascending priority
/// within each source.
///
/// A later source overwrites what an earlier source set. Within one source a
/// higher-priority extractor runs later and so has the final say.
pub struct DefaultParametersExtractor {
	extractors: Vec<Arc<dyn ParametersSourceExtractor>>,
}

impl DefaultParametersExtractor {
	/// `extractors` must be in descending priority order.
	pub fn new(extractors: Vec<Arc<dyn ParametersSourceExtractor>>) -> Self {
		Self { extractors }
	}

	pub fn extractors(&self) -> &[Arc<dyn ParametersSourceExtractor>] {
		&self.extractors
	}
}

impl ParametersExtractor for DefaultParametersExtractor {
	fn extract_parameters(&self, target: &mut dyn Parameters, sources: &[&dyn Source]) -> Result<()> {
		for source in sources {
			for extractor in self.extractors.iter().rev() {
				if source.matches(extractor.source_type()) {
					extractor.extract_parameters(*source, target)?;
				}
			}
		}
		Ok(())
	}
}

/// Extractor built from a plain function.
///
/// `P` is the target capability, `S` the source type or source capability.
pub struct SourceExtractorFn<P: ?Sized + 'static, S: ?Sized + 'static> {
	name: &'static str,
	priority: Priority,
	view: fn(&dyn Source) -> Option<&S>,
	extract: fn(&S, &mut P) -> Result<()>,
}

impl<P: ?Sized + 'static, S: Source> SourceExtractorFn<P, S> {
	/// Reads sources of the concrete type `S`.
	pub fn new(name: &'static str, priority: Priority, extract: fn(&S, &mut P) -> Result<()>) -> Self {
		Self {
			name,
			priority,
			view: |source| source.downcast_ref::<S>(),
			extract,
		}
	}
}

impl<P: ?Sized + 'static, S: ?Sized + 'static> SourceExtractorFn<P, S> {
	/// Reads parameters sources exposing capability `S`.
	pub fn from_facet(name: &'static str, priority: Priority, extract: fn(&S, &mut P) -> Result<()>) -> Self {
		Self {
			name,
			priority,
			view: |source| source.facet::<S>(),
			extract,
		}
	}
}

impl<P: ?Sized + 'static, S: ?Sized + 'static> ParametersSourceExtractor for SourceExtractorFn<P, S> {
	fn name(&self) -> &str {
		self.name
	}

	fn parameters_type(&self) -> TypeKey {
		TypeKey::of::<P>()
	}

	fn source_type(&self) -> TypeKey {
		TypeKey::of::<S>()
	}

	fn priority(&self) -> Priority {
		self.priority
	}

	fn extract_parameters(&self, source: &dyn Source, target: &mut dyn Parameters) -> Result<()> {
		let Some(source) = (self.view)(source) else {
			return Ok(());
		};
		let described = target.parameters_type();
		let Some(target) = target.facet_mut::<P>() else {
			return Err(Error::invalid_parameters(format!(
				"{described} does not expose {}",
				TypeKey::of::<P>()
			)));
		};
		(self.extract)(source, target)
	}
}
