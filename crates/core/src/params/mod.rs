//! Generation parameters and the sources they are extracted from.
//!
//! # Role
//!
//! A parameters value tunes one generation call: whether null is allowed,
//! numeric bounds, size bounds, component types. Generators declare which
//! concrete parameters type they take; callers supply heterogeneous
//! [`Source`] values (constraints, type declarations, other parameters) that
//! [`ParametersSourceExtractor`]s fold into a fresh parameters value.
//!
//! # Facets
//!
//! Extractors are written against capabilities rather than concrete types.
//! A capability is a trait object such as `dyn SizeParameters`. Each
//! parameters type publishes a [`ParametersType`] listing the capabilities it
//! implements together with casts to reach them from `&dyn Any`. An extractor
//! applies to a parameters type when that type lists the extractor's target
//! capability.
//!
//! The [`parameters!`](crate::parameters) macro writes the [`Source`] and
//! [`DescribeParameters`] impls for a parameters struct.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::types::{Type, TypeDeclaration, TypeKey};

mod builtin;
pub mod constraints;
mod extractor;
pub mod extractors;
mod registry;

pub use builtin::{
	CollectionGenerationParameters, GenerationParameters, GenericsGenerationParameters,
	MapGenerationParameters, NumberGenerationParameters, StringGenerationParameters,
};
pub use extractor::{
	DefaultParametersExtractor, ParametersExtractor, ParametersSourceExtractor,
	SourceExtractorFn,
};
pub use registry::{
	ExtractorBuilder, ParametersExtractors, SourceExtractorFilter, default_builder,
	default_filter,
};

/// Default of the `nullable` flag on fresh parameters.
pub const DEFAULT_NULLABLE: bool = true;

/// Anything parameters can be extracted from.
///
/// Plain sources only need an empty impl. Parameters types report themselves
/// through [`Source::as_parameters`] so extractors can match them by facet.
pub trait Source: Any + Send + Sync + 'static {
	fn as_parameters(&self) -> Option<&dyn Parameters> {
		None
	}
}

impl dyn Source {
	pub fn downcast_ref<S: Any>(&self) -> Option<&S> {
		let any: &dyn Any = self;
		any.downcast_ref()
	}

	/// Views this source through capability `F`, when it is a parameters value
	/// implementing it.
	pub fn facet<F: ?Sized + 'static>(&self) -> Option<&F> {
		self.as_parameters()?.facet::<F>()
	}

	/// Whether this source is of `key`'s type or exposes it as a facet.
	pub fn matches(&self, key: TypeKey) -> bool {
		let any: &dyn Any = self;
		any.type_id() == key.id()
			|| self
				.as_parameters()
				.is_some_and(|params| params.parameters_type().implements(key))
	}
}

/// A generation parameters value.
pub trait Parameters: Source + fmt::Debug + 'static {
	fn is_nullable(&self) -> bool;

	fn set_nullable(&mut self, nullable: bool);

	/// Runtime descriptor of this value's concrete type.
	fn parameters_type(&self) -> ParametersType;
}

impl dyn Parameters {
	pub fn downcast_ref<P: Parameters>(&self) -> Option<&P> {
		let any: &dyn Any = self;
		any.downcast_ref()
	}

	pub fn downcast_mut<P: Parameters>(&mut self) -> Option<&mut P> {
		let any: &mut dyn Any = self;
		any.downcast_mut()
	}

	pub fn facet<F: ?Sized + 'static>(&self) -> Option<&F> {
		self.parameters_type().cast_ref::<F>(self)
	}

	pub fn facet_mut<F: ?Sized + 'static>(&mut self) -> Option<&mut F> {
		let ty = self.parameters_type();
		ty.cast_mut::<F>(self)
	}
}

/// Static access to a parameters type's descriptor.
pub trait DescribeParameters: Parameters + Sized {
	fn describe() -> ParametersType;
}

/// Parameters carrying collection or string size bounds (inclusive).
pub trait SizeParameters: Parameters + 'static {
	fn min_size(&self) -> usize;
	fn set_min_size(&mut self, min: usize);
	fn max_size(&self) -> usize;
	fn set_max_size(&mut self, max: usize);
}

/// Parameters carrying numeric bounds (inclusive). Infinite means unbounded.
///
/// Integer constraints are also kept exactly, since `f64` cannot hold every
/// integer beyond 2^53. The `f64` pair never excludes a value the exact
/// bounds allow.
pub trait NumberParameters: Parameters + 'static {
	fn min(&self) -> f64;
	fn set_min(&mut self, min: f64);
	fn max(&self) -> f64;
	fn set_max(&mut self, max: f64);

	fn integer_min(&self) -> Option<i128>;
	fn set_integer_min(&mut self, min: i128);
	fn integer_max(&self) -> Option<i128>;
	fn set_integer_max(&mut self, max: i128);
}

/// Parameters of a single-argument generic such as a list or set.
pub trait SimpleGenericParameters: Parameters + 'static {
	fn element_type(&self) -> Option<&Type>;
	fn set_element_type(&mut self, ty: Type);
}

/// Parameters of a key/value generic such as a map.
pub trait KeyValueGenericParameters: Parameters + 'static {
	fn keys_type(&self) -> Option<&Type>;
	fn set_keys_type(&mut self, ty: Type);
	fn values_type(&self) -> Option<&Type>;
	fn set_values_type(&mut self, ty: Type);
}

/// Parameters of an arbitrary generic type, holding its full declaration.
pub trait GenericsParameters: Parameters + 'static {
	fn type_declaration(&self) -> Option<&TypeDeclaration>;
	fn set_type_declaration(&mut self, declaration: TypeDeclaration);
}

/// Runtime descriptor of a parameters type: its identity, the capabilities
/// it implements and, optionally, how to create an empty instance.
#[derive(Clone)]
pub struct ParametersType(Arc<ParametersTypeInner>);

struct ParametersTypeInner {
	key: TypeKey,
	facets: Vec<Facet>,
	empty: Option<fn() -> Box<dyn Parameters>>,
}

struct Facet {
	key: TypeKey,
	caster: Box<dyn Any + Send + Sync>,
}

struct Caster<F: ?Sized + 'static> {
	as_ref: fn(&dyn Any) -> Option<&F>,
	as_mut: fn(&mut dyn Any) -> Option<&mut F>,
}

impl ParametersType {
	/// Starts a descriptor for `P`. `P` itself and `dyn Parameters` are
	/// registered as facets up front.
	pub fn builder<P: Parameters>() -> ParametersTypeBuilder {
		ParametersTypeBuilder {
			key: TypeKey::of::<P>(),
			facets: Vec::new(),
			empty: None,
		}
		.facet::<P>(concrete_ref::<P>, concrete_mut::<P>)
		.facet::<dyn Parameters>(erased_ref::<P>, erased_mut::<P>)
	}

	pub fn of<P: DescribeParameters>() -> Self {
		P::describe()
	}

	pub fn key(&self) -> TypeKey {
		self.0.key
	}

	pub fn implements(&self, facet: TypeKey) -> bool {
		self.0.facets.iter().any(|f| f.key == facet)
	}

	pub fn facets(&self) -> impl Iterator<Item = TypeKey> + '_ {
		self.0.facets.iter().map(|f| f.key)
	}

	/// New parameters value with every field at its default.
	pub fn create_empty(&self) -> Result<Box<dyn Parameters>> {
		self.0
			.empty
			.map(|empty| empty())
			.ok_or_else(|| Error::MissingDefaultParameters {
				parameters: self.0.key.to_string(),
			})
	}

	pub fn cast_ref<'a, F: ?Sized + 'static>(&self, value: &'a dyn Any) -> Option<&'a F> {
		(self.caster::<F>()?.as_ref)(value)
	}

	pub fn cast_mut<'a, F: ?Sized + 'static>(&self, value: &'a mut dyn Any) -> Option<&'a mut F> {
		(self.caster::<F>()?.as_mut)(value)
	}

	fn caster<F: ?Sized + 'static>(&self) -> Option<&Caster<F>> {
		self.0
			.facets
			.iter()
			.find(|f| f.key.is::<F>())
			.and_then(|f| f.caster.downcast_ref::<Caster<F>>())
	}
}

impl PartialEq for ParametersType {
	fn eq(&self, other: &Self) -> bool {
		self.0.key == other.0.key
	}
}

impl Eq for ParametersType {}

impl fmt::Debug for ParametersType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ParametersType")
			.field("key", &self.0.key)
			.field("facets", &self.facets().collect::<Vec<_>>())
			.field("empty", &self.0.empty.is_some())
			.finish()
	}
}

impl fmt::Display for ParametersType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.0.key, f)
	}
}

/// Builder for [`ParametersType`].
pub struct ParametersTypeBuilder {
	key: TypeKey,
	facets: Vec<Facet>,
	empty: Option<fn() -> Box<dyn Parameters>>,
}

impl ParametersTypeBuilder {
	/// Registers capability `F` with casts from the erased value.
	pub fn facet<F: ?Sized + 'static>(
		mut self,
		as_ref: fn(&dyn Any) -> Option<&F>,
		as_mut: fn(&mut dyn Any) -> Option<&mut F>,
	) -> Self {
		let key = TypeKey::of::<F>();
		self.facets.retain(|f| f.key != key);
		self.facets.push(Facet {
			key,
			caster: Box::new(Caster { as_ref, as_mut }),
		});
		self
	}

	/// Sets the zero-argument constructor.
	pub fn empty(mut self, empty: fn() -> Box<dyn Parameters>) -> Self {
		self.empty = Some(empty);
		self
	}

	pub fn build(self) -> ParametersType {
		ParametersType(Arc::new(ParametersTypeInner {
			key: self.key,
			facets: self.facets,
			empty: self.empty,
		}))
	}
}

fn concrete_ref<P: Any>(value: &dyn Any) -> Option<&P> {
	value.downcast_ref()
}

fn concrete_mut<P: Any>(value: &mut dyn Any) -> Option<&mut P> {
	value.downcast_mut()
}

fn erased_ref<P: Parameters>(value: &dyn Any) -> Option<&dyn Parameters> {
	value.downcast_ref::<P>().map(|p| p as &dyn Parameters)
}

fn erased_mut<P: Parameters>(value: &mut dyn Any) -> Option<&mut dyn Parameters> {
	value.downcast_mut::<P>().map(|p| p as &mut dyn Parameters)
}

/// Zero-argument constructor of a `Default` parameters type.
pub fn empty_parameters<P: Parameters + Default>() -> Box<dyn Parameters> {
	Box::new(P::default())
}

/// Implements [`Source`] and [`DescribeParameters`] for a parameters type.
///
/// List the capability traits the type implements after a colon. Types that
/// implement `Default` get an empty constructor; use the `@no_default` form
/// otherwise.
///
/// ```ignore
/// parameters!(StringGenerationParameters: SizeParameters);
/// parameters!(@no_default Seeded: NumberParameters);
/// ```
#[macro_export]
macro_rules! parameters {
	(@no_default $ty:ty $(: $($facet:path),+)? $(,)?) => {
		$crate::parameters!(@describe $ty, |builder| builder $(; $($facet),+)?);
	};
	(@describe $ty:ty, |$builder:ident| $init:expr $(; $($facet:path),+)?) => {
		impl $crate::params::Source for $ty {
			fn as_parameters(&self) -> ::core::option::Option<&dyn $crate::params::Parameters> {
				::core::option::Option::Some(self)
			}
		}

		impl $crate::params::DescribeParameters for $ty {
			fn describe() -> $crate::params::ParametersType {
				static DESCRIPTOR: ::std::sync::LazyLock<$crate::params::ParametersType> =
					::std::sync::LazyLock::new(|| {
						let $builder = $crate::params::ParametersType::builder::<$ty>();
						$init
							$($(.facet::<dyn $facet>(
								|value| value.downcast_ref::<$ty>().map(|p| p as &dyn $facet),
								|value| value.downcast_mut::<$ty>().map(|p| p as &mut dyn $facet),
							))+)?
							.build()
					});
				DESCRIPTOR.clone()
			}
		}
	};
	($ty:ty $(: $($facet:path),+)? $(,)?) => {
		$crate::parameters!(
			@describe $ty,
			|builder| builder.empty($crate::params::empty_parameters::<$ty>)
			$(; $($facet),+)?
		);
	};
}
