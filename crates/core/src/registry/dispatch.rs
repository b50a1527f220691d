use super::Generators;
use crate::error::Result;
use crate::generator::{Generator, ParametrizableGenerator};
use crate::params::Parameters;
use crate::types::{Type, Value};

/// Which of the four generation operations a call performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
	Default,
	NullableDefault,
	Random,
	NullableRandom,
}

impl Mode {
	pub(crate) fn run(
		self,
		generator: &dyn Generator,
		ty: &Type,
		generators: &Generators,
	) -> Result<Option<Value>> {
		match self {
			Self::Default => generator.default_value(ty, generators).map(Some),
			Self::NullableDefault => generator.nullable_default_value(ty, generators),
			Self::Random => generator.random_value(ty, generators).map(Some),
			Self::NullableRandom => generator.nullable_random_value(ty, generators),
		}
	}

	pub(crate) fn run_with(
		self,
		generator: &dyn ParametrizableGenerator,
		ty: &Type,
		params: &dyn Parameters,
		generators: &Generators,
	) -> Result<Option<Value>> {
		match self {
			Self::Default => generator.default_value_with(ty, params, generators).map(Some),
			Self::NullableDefault => generator.nullable_default_value_with(ty, params, generators),
			Self::Random => generator.random_value_with(ty, params, generators).map(Some),
			Self::NullableRandom => generator.nullable_random_value_with(ty, params, generators),
		}
	}
}
