//! Alphanumeric strings sized by [`SizeParameters`](fixgen_core::params::SizeParameters).

use fixgen_core::params::StringGenerationParameters;
use fixgen_core::{Generators, Parametrized, ParametrizedGenerator, Priority, Result, Type, Value};
use rand::Rng;
use rand::distributions::Alphanumeric;

use crate::size::{random_size, size_range};

/// Random strings are between `MIN_SIZE` and `MAX_SIZE` characters unless the
/// parameters demand otherwise.
pub const MIN_SIZE: usize = 1;
pub const MAX_SIZE: usize = 40;

/// Generator of ASCII alphanumeric `String`s.
///
/// The default is the shortest string the parameters allow, padded with `a`.
#[derive(Debug, Default)]
pub struct StringGenerator;

impl ParametrizedGenerator for StringGenerator {
	type Params = StringGenerationParameters;

	fn priority(&self) -> Priority {
		Priority::NATIVE_GENERATORS
	}

	fn supports(&self, ty: &Type) -> bool {
		ty.is_raw::<String>()
	}

	fn default_value(&self, _: &Type, params: &StringGenerationParameters, _: &Generators) -> Result<Value> {
		let shortest = *size_range(params, 0, 0)?.start();
		Ok(Box::new("a".repeat(shortest)))
	}

	fn random_value(&self, _: &Type, params: &StringGenerationParameters, _: &Generators) -> Result<Value> {
		let size = random_size(params, MIN_SIZE, MAX_SIZE)?;
		let value: String = rand::thread_rng()
			.sample_iter(&Alphanumeric)
			.take(size)
			.map(char::from)
			.collect();
		Ok(Box::new(value))
	}
}

fixgen_core::submit_generator!("fixgen::string", Parametrized::new(StringGenerator));
