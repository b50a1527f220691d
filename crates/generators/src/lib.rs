//! Built-in generators for `fixgen-core`.
//!
//! Linking this crate submits a generator for every primitive, `String`,
//! `()` and the standard collections to the discovery registry, so a plain
//! [`Generators::new`](fixgen_core::Generators::new) serves them. Registries
//! built without discovery can register [`builtin_generators`] explicitly.
//!
//! Scalars sit in the [`Priority::NATIVE_GENERATORS`] band and containers in
//! [`Priority::GENERIC_GENERATORS`], so user generators at the default
//! priority override either.
//!
//! [`Priority::NATIVE_GENERATORS`]: fixgen_core::Priority::NATIVE_GENERATORS
//! [`Priority::GENERIC_GENERATORS`]: fixgen_core::Priority::GENERIC_GENERATORS

use std::sync::Arc;

use fixgen_core::{Generator, Parametrized};

pub mod collection;
pub mod map;
pub mod number;
pub mod scalar;
mod size;
pub mod string;

pub use collection::{ArrayGenerator, ListGenerator, SetGenerator};
pub use map::MapGenerator;
pub use number::{Float, FloatGenerator, Integer, IntegerGenerator};
pub use scalar::{BoolGenerator, CharGenerator, UnitGenerator};
pub use string::StringGenerator;

/// Fresh instances of every built-in generator, in no particular order.
pub fn builtin_generators() -> Vec<Arc<dyn Generator>> {
	vec![
		Arc::new(BoolGenerator::new()),
		Arc::new(CharGenerator::new()),
		Arc::new(UnitGenerator::new()),
		Arc::new(Parametrized::new(IntegerGenerator::<i8>::new())),
		Arc::new(Parametrized::new(IntegerGenerator::<i16>::new())),
		Arc::new(Parametrized::new(IntegerGenerator::<i32>::new())),
		Arc::new(Parametrized::new(IntegerGenerator::<i64>::new())),
		Arc::new(Parametrized::new(IntegerGenerator::<i128>::new())),
		Arc::new(Parametrized::new(IntegerGenerator::<isize>::new())),
		Arc::new(Parametrized::new(IntegerGenerator::<u8>::new())),
		Arc::new(Parametrized::new(IntegerGenerator::<u16>::new())),
		Arc::new(Parametrized::new(IntegerGenerator::<u32>::new())),
		Arc::new(Parametrized::new(IntegerGenerator::<u64>::new())),
		Arc::new(Parametrized::new(IntegerGenerator::<u128>::new())),
		Arc::new(Parametrized::new(IntegerGenerator::<usize>::new())),
		Arc::new(Parametrized::new(FloatGenerator::<f32>::new())),
		Arc::new(Parametrized::new(FloatGenerator::<f64>::new())),
		Arc::new(Parametrized::new(StringGenerator)),
		Arc::new(Parametrized::new(ListGenerator)),
		Arc::new(Parametrized::new(SetGenerator)),
		Arc::new(Parametrized::new(MapGenerator)),
		Arc::new(ArrayGenerator::new()),
	]
}
