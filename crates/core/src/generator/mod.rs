//! The generator contract.
//!
//! A [`Generator`] produces default and random values for the types it
//! supports. Values it returns are of the *value type*: for a nullable
//! request such as `Option<u8>` the generator produces a bare `u8`, and
//! signals null by returning `None` from the `nullable_*` methods. The
//! registry's typed facade wraps the result into the requested
//! representation.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::{Error, Result};
use crate::params::{Parameters, ParametersType};
use crate::priority::Priority;
use crate::registry::Generators;
use crate::types::{Type, Value};

mod parametrized;

pub use parametrized::{Parametrized, ParametrizedGenerator};

/// Probability of null used when nothing else is configured.
pub const DEFAULT_NULL_PROBABILITY: f32 = 0.3;

/// A source of default and random values.
///
/// Implementations must be thread-safe: one instance serves every caller of
/// the registry it is registered in.
pub trait Generator: Any + Send + Sync + 'static {
	/// Identity used, together with the concrete type, to match registrations.
	fn name(&self) -> &str {
		type_name::<Self>()
	}

	fn priority(&self) -> Priority {
		Priority::DEFAULT
	}

	fn supports(&self, ty: &Type) -> bool;

	/// Deterministic default value for `ty`.
	fn default_value(&self, ty: &Type, generators: &Generators) -> Result<Value>;

	/// Default value, or `None` if `ty` is nullable.
	fn nullable_default_value(&self, ty: &Type, generators: &Generators) -> Result<Option<Value>> {
		self.assert_supported(ty)?;
		if ty.is_nullable() {
			Ok(None)
		} else {
			self.default_value(ty, generators).map(Some)
		}
	}

	fn random_value(&self, ty: &Type, generators: &Generators) -> Result<Value>;

	/// Random value, or `None` with this generator's null probability when
	/// `ty` is nullable.
	fn nullable_random_value(&self, ty: &Type, generators: &Generators) -> Result<Option<Value>> {
		self.assert_supported(ty)?;
		if self.random_null(ty) {
			Ok(None)
		} else {
			self.random_value(ty, generators).map(Some)
		}
	}

	/// Null probability of this instance, when it keeps one.
	fn null_probability(&self) -> Option<&NullProbability> {
		None
	}

	/// Rolls whether a random call for `ty` produces null.
	fn random_null(&self, ty: &Type) -> bool {
		ty.is_nullable()
			&& match self.null_probability() {
				Some(probability) => probability.roll(),
				None => roll(DEFAULT_NULL_PROBABILITY),
			}
	}

	/// Parameter-aware view of this generator, if it accepts parameters.
	fn as_parametrizable(&self) -> Option<&dyn ParametrizableGenerator> {
		None
	}

	fn assert_supported(&self, ty: &Type) -> Result<()> {
		if self.supports(ty) {
			Ok(())
		} else {
			Err(Error::unsupported_type(self.name(), ty))
		}
	}
}

/// A generator whose output is tuned by generation parameters.
///
/// The registry builds the parameters from caller-supplied sources and hands
/// them in type-erased; implementations check the concrete type.
pub trait ParametrizableGenerator: Generator {
	fn parameters_type(&self) -> ParametersType;

	fn default_value_with(
		&self,
		ty: &Type,
		params: &dyn Parameters,
		generators: &Generators,
	) -> Result<Value>;

	fn nullable_default_value_with(
		&self,
		ty: &Type,
		params: &dyn Parameters,
		generators: &Generators,
	) -> Result<Option<Value>>;

	fn random_value_with(
		&self,
		ty: &Type,
		params: &dyn Parameters,
		generators: &Generators,
	) -> Result<Value>;

	fn nullable_random_value_with(
		&self,
		ty: &Type,
		params: &dyn Parameters,
		generators: &Generators,
	) -> Result<Option<Value>>;
}

pub(crate) fn same_generator(a: &dyn Generator, b: &dyn Generator) -> bool {
	let (a_any, b_any): (&dyn Any, &dyn Any) = (a, b);
	a_any.type_id() == b_any.type_id() && a.name() == b.name()
}

impl fmt::Debug for dyn Generator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Generator")
			.field("name", &self.name())
			.field("priority", &self.priority())
			.field("parametrizable", &self.as_parametrizable().is_some())
			.finish()
	}
}

/// A mutable probability in `[0, 1]`, shared by all callers of a generator.
pub struct NullProbability(AtomicU32);

impl NullProbability {
	pub fn new(probability: f32) -> Result<Self> {
		Ok(Self(AtomicU32::new(validate(probability)?.to_bits())))
	}

	pub fn get(&self) -> f32 {
		f32::from_bits(self.0.load(Ordering::Relaxed))
	}

	pub fn set(&self, probability: f32) -> Result<()> {
		self.0.store(validate(probability)?.to_bits(), Ordering::Relaxed);
		Ok(())
	}

	/// `true` with the current probability.
	pub fn roll(&self) -> bool {
		roll(self.get())
	}
}

impl Default for NullProbability {
	fn default() -> Self {
		Self(AtomicU32::new(DEFAULT_NULL_PROBABILITY.to_bits()))
	}
}

impl fmt::Debug for NullProbability {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("NullProbability").field(&self.get()).finish()
	}
}

pub(crate) fn validate(probability: f32) -> Result<f32> {
	if (0.0..=1.0).contains(&probability) {
		Ok(probability)
	} else {
		Err(Error::InvalidProbability(probability))
	}
}

fn roll(probability: f32) -> bool {
	probability > 0.0 && rand::random::<f32>() < probability
}
