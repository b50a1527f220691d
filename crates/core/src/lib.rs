//! Type-directed default and random value generation for test fixtures.
//!
//! Callers ask a [`Generators`] registry for a value of some type; the
//! registry dispatches to the highest-priority [`Generator`] that supports
//! it. Generators that accept [`Parameters`] are tuned by heterogeneous
//! [`Source`]s (constraints, type declarations, other parameters), merged by
//! the [`ParametersExtractors`] registry.
//!
//! ```ignore
//! use fixgen_core::Generators;
//! use fixgen_core::params::constraints::{NotNull, Size};
//!
//! let generators = Generators::new();
//! let names: Vec<String> = generators.random_with(&[&Size::new(2, 4)])?;
//! let maybe: Option<u32> = generators.nullable_random()?;
//! let never_null: Option<u32> = generators.nullable_random_with(&[&NotNull])?;
//! ```
//!
//! Generators and source extractors are discovered at link time through
//! `inventory`; see [`discovery`].

pub mod config;
pub mod discovery;
pub mod error;
pub mod factory;
pub mod generator;
pub mod params;
pub mod priority;
pub mod registry;
pub mod resolver;
pub mod targeted;
pub mod types;

pub use config::GeneratorsConfig;
pub use error::{BoxError, Error, Result};
pub use generator::{
	DEFAULT_NULL_PROBABILITY, Generator, NullProbability, ParametrizableGenerator, Parametrized,
	ParametrizedGenerator,
};
pub use params::{
	DescribeParameters, Parameters, ParametersExtractors, ParametersSourceExtractor, ParametersType,
	Source,
};
pub use priority::Priority;
pub use registry::Generators;
pub use types::{Components, Declare, Erased, Type, TypeDeclaration, TypeKey, Value, downcast};

#[doc(hidden)]
pub use inventory;
