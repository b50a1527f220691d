//! Generators for scalars that take no parameters.

use fixgen_core::{Generator, Generators, NullProbability, Priority, Result, Type, Value};
use rand::Rng;

macro_rules! scalar_generator {
	($(#[$meta:meta])* $name:ident, $ty:ty, default = $default:expr, random = $random:expr) => {
		$(#[$meta])*
		#[derive(Debug, Default)]
		pub struct $name {
			nulls: NullProbability,
		}

		impl $name {
			pub fn new() -> Self {
				Self::default()
			}
		}

		impl Generator for $name {
			fn priority(&self) -> Priority {
				Priority::NATIVE_GENERATORS
			}

			fn supports(&self, ty: &Type) -> bool {
				ty.is_raw::<$ty>()
			}

			fn default_value(&self, ty: &Type, _generators: &Generators) -> Result<Value> {
				self.assert_supported(ty)?;
				let value: $ty = $default;
				Ok(Box::new(value))
			}

			fn random_value(&self, ty: &Type, _generators: &Generators) -> Result<Value> {
				self.assert_supported(ty)?;
				let value: $ty = $random;
				Ok(Box::new(value))
			}

			fn null_probability(&self) -> Option<&NullProbability> {
				Some(&self.nulls)
			}
		}
	};
}

scalar_generator!(
	/// `false` by default, a fair coin otherwise.
	BoolGenerator,
	bool,
	default = false,
	random = rand::thread_rng().r#gen()
);

scalar_generator!(
	/// `'\0'` by default, any Unicode scalar value otherwise.
	CharGenerator,
	char,
	default = '\0',
	random = rand::thread_rng().r#gen()
);

scalar_generator!(UnitGenerator, (), default = (), random = ());

fixgen_core::submit_generator!("fixgen::bool", BoolGenerator::new());
fixgen_core::submit_generator!("fixgen::char", CharGenerator::new());
fixgen_core::submit_generator!("fixgen::unit", UnitGenerator::new());

#[cfg(test)]
mod tests {
	use fixgen_core::GeneratorsConfig;
	use pretty_assertions::assert_eq;

	use super::*;

	fn generators() -> Generators {
		Generators::with_config(GeneratorsConfig::without_discovery())
	}

	#[test]
	fn test_defaults() {
		let generators = generators();
		generators.register(crate::builtin_generators());
		assert!(!generators.default::<bool>().unwrap());
		assert_eq!(generators.default::<char>().unwrap(), '\0');
		assert_eq!(generators.default::<()>().unwrap(), ());
	}

	/// Both booleans show up over enough draws.
	#[test]
	fn test_random_bool_covers_both_values() {
		let generators = generators();
		generators.register(crate::builtin_generators());
		let draws: Vec<bool> = (0..200).map(|_| generators.random().unwrap()).collect();
		assert!(draws.contains(&true));
		assert!(draws.contains(&false));
	}

	#[test]
	fn test_only_own_type_is_supported() {
		let generators = generators();
		assert!(BoolGenerator::new().supports(&Type::of::<bool>()));
		assert!(BoolGenerator::new().supports(&Type::declare::<Option<bool>>()));
		assert!(!BoolGenerator::new().supports(&Type::of::<u8>()));
		assert!(CharGenerator::new().random_value(&Type::of::<bool>(), &generators).is_err());
	}
}
