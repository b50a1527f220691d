//! Generation through user-declared factory functions.
//!
//! A [`FactoryDef`] pairs a concrete type with a default constructor and a
//! random constructor. Factories are collected with `inventory` (see
//! [`factory!`](crate::factory)) or added at runtime through
//! [`Generators::register_factory`]. The [`FactoryGenerator`] serves every
//! type that has a factory.

use std::any::TypeId;
use std::fmt;

use parking_lot::RwLock;
use rand::Rng;
use rustc_hash::FxHashMap;
use tracing::{trace, warn};

use crate::error::{Error, Result};
use crate::generator::{Generator, NullProbability};
use crate::priority::Priority;
use crate::registry::Generators;
use crate::submit_generator;
use crate::types::{Type, TypeKey, Value};

/// Factory functions for one concrete type.
#[derive(Clone, Copy)]
pub struct FactoryDef {
	name: &'static str,
	key: fn() -> TypeKey,
	default: fn() -> Value,
	random: fn(&Generators) -> Result<Value>,
}

inventory::collect!(FactoryDef);

impl FactoryDef {
	/// Prefer [`factory_def!`](crate::factory_def), which checks the
	/// constructors return the keyed type.
	pub const fn new(
		name: &'static str,
		key: fn() -> TypeKey,
		default: fn() -> Value,
		random: fn(&Generators) -> Result<Value>,
	) -> Self {
		Self {
			name,
			key,
			default,
			random,
		}
	}

	pub fn name(&self) -> &'static str {
		self.name
	}

	pub fn key(&self) -> TypeKey {
		(self.key)()
	}
}

impl fmt::Debug for FactoryDef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FactoryDef")
			.field("name", &self.name)
			.field("key", &self.key())
			.finish()
	}
}

#[derive(Clone, Copy)]
enum FactoryLookup {
	Found(FactoryDef),
	Missing,
}

impl FactoryLookup {
	fn found(self) -> Option<FactoryDef> {
		match self {
			Self::Found(def) => Some(def),
			Self::Missing => None,
		}
	}
}

/// Generator backed by registered factories.
///
/// Runtime factories shadow discovered ones. When two factories target the
/// same type, the first one wins and the conflict is logged.
pub struct FactoryGenerator {
	runtime: RwLock<Vec<FactoryDef>>,
	cache: RwLock<FxHashMap<TypeId, FactoryLookup>>,
	nulls: NullProbability,
}

impl FactoryGenerator {
	pub fn new() -> Self {
		Self {
			runtime: RwLock::default(),
			cache: RwLock::default(),
			nulls: NullProbability::default(),
		}
	}

	/// Adds a runtime factory and forgets cached resolutions.
	pub fn add(&self, def: FactoryDef) {
		self.runtime.write().push(def);
		self.cache.write().clear();
	}

	fn factory(&self, key: TypeKey) -> Option<FactoryDef> {
		if let Some(hit) = self.cache.read().get(&key.id()) {
			return hit.found();
		}
		let resolved = self.resolve(key);
		self.cache.write().entry(key.id()).or_insert(resolved).found()
	}

	fn resolve(&self, key: TypeKey) -> FactoryLookup {
		let runtime = self.runtime.read();
		let mut matching = runtime
			.iter()
			.copied()
			.chain(inventory::iter::<FactoryDef>.into_iter().copied())
			.filter(|def| def.key() == key);
		let Some(first) = matching.next() else {
			trace!(ty = %key, "no factory");
			return FactoryLookup::Missing;
		};
		for ignored in matching {
			warn!(ty = %key, kept = first.name, ignored = ignored.name, "duplicate factory");
		}
		FactoryLookup::Found(first)
	}

	fn factory_for(&self, ty: &Type) -> Result<FactoryDef> {
		self.assert_supported(ty)?;
		self.factory(ty.raw())
			.ok_or_else(|| Error::unsupported_type(self.name(), ty))
	}
}

impl Default for FactoryGenerator {
	fn default() -> Self {
		Self::new()
	}
}

impl Generator for FactoryGenerator {
	fn priority(&self) -> Priority {
		Priority::FACTORY_GENERATORS
	}

	fn supports(&self, ty: &Type) -> bool {
		ty.declaration().is_none() && self.factory(ty.raw()).is_some()
	}

	fn default_value(&self, ty: &Type, _generators: &Generators) -> Result<Value> {
		Ok((self.factory_for(ty)?.default)())
	}

	/// Failures of the factory itself are wrapped in
	/// [`Error::GenerationFailed`].
	fn random_value(&self, ty: &Type, generators: &Generators) -> Result<Value> {
		let def = self.factory_for(ty)?;
		(def.random)(generators).map_err(|source| Error::generation_failed(ty, source))
	}

	fn null_probability(&self) -> Option<&NullProbability> {
		Some(&self.nulls)
	}
}

submit_generator!("fixgen::factory", FactoryGenerator::new());

/// Calls one of `choices` at random.
///
/// # Panics
///
/// Panics if `choices` is empty. [`choice_factory_def!`](crate::choice_factory_def)
/// never passes an empty slice.
pub fn pick<T>(choices: &[fn() -> T]) -> T {
	let index = rand::thread_rng().gen_range(0..choices.len());
	(choices[index])()
}

/// Builds a [`FactoryDef`] for `$ty` from typed constructors.
///
/// ```ignore
/// let def = factory_def!(Point, default = || Point::ORIGIN, random = |g| Ok(Point::new(g.random()?, g.random()?)));
/// ```
#[macro_export]
macro_rules! factory_def {
	($ty:ty, default = $default:expr, random = $random:expr $(,)?) => {
		$crate::factory::FactoryDef::new(
			::core::stringify!($ty),
			$crate::types::TypeKey::of::<$ty>,
			|| -> $crate::types::Value {
				let value: $ty = ($default)();
				::std::boxed::Box::new(value)
			},
			|generators| -> $crate::Result<$crate::types::Value> {
				let produced: $crate::Result<$ty> = ($random)(generators);
				produced.map(|value| ::std::boxed::Box::new(value) as $crate::types::Value)
			},
		)
	};
}

/// Builds a [`FactoryDef`] picking uniformly among listed values. The first
/// value is the default.
#[macro_export]
macro_rules! choice_factory_def {
	($ty:ty => [$first:expr $(, $rest:expr)* $(,)?]) => {
		$crate::factory_def!(
			$ty,
			default = || $first,
			random = |_: &$crate::Generators| -> $crate::Result<$ty> {
				let choices: &[fn() -> $ty] = &[|| $first $(, || $rest)*];
				::core::result::Result::Ok($crate::factory::pick(choices))
			},
		)
	};
}

/// Submits a factory for discovery. Accepts the same forms as
/// [`factory_def!`](crate::factory_def) and, with `=>`, those of
/// [`choice_factory_def!`](crate::choice_factory_def).
#[macro_export]
macro_rules! factory {
	($ty:ty => [$($choice:expr),+ $(,)?]) => {
		$crate::inventory::submit! { $crate::choice_factory_def!($ty => [$($choice),+]) }
	};
	($ty:ty, $($rest:tt)+) => {
		$crate::inventory::submit! { $crate::factory_def!($ty, $($rest)+) }
	};
}

impl fmt::Debug for FactoryGenerator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FactoryGenerator")
			.field("runtime", &self.runtime.read().len())
			.field("nulls", &self.nulls)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::GeneratorsConfig;
	use crate::types::downcast;

	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	enum Suit {
		Hearts,
		Spades,
		Clubs,
	}

	crate::declare_concrete!(Suit);
	crate::factory!(Suit => [Suit::Hearts, Suit::Spades, Suit::Clubs]);

	#[derive(Debug, PartialEq)]
	struct Label(String);

	crate::declare_concrete!(Label);

	fn generators() -> Generators {
		Generators::with_config(GeneratorsConfig::default())
	}

	#[test]
	fn test_discovered_choice_factory() {
		let generators = generators();
		assert!(generators.supports(&Type::of::<Suit>()));
		assert_eq!(generators.default::<Suit>().unwrap(), Suit::Hearts);
		for _ in 0..50 {
			let suit = generators.random::<Suit>().unwrap();
			assert!(matches!(suit, Suit::Hearts | Suit::Spades | Suit::Clubs));
		}
	}

	#[test]
	fn test_runtime_factory_registration() {
		let generators = generators();
		assert!(!generators.supports(&Type::of::<Label>()));

		generators.register_factory(crate::factory_def!(
			Label,
			default = || Label(String::new()),
			random = |g: &Generators| Ok(Label(format!("label-{}", g.random::<Suit>()? as u8))),
		));

		assert!(generators.supports(&Type::of::<Label>()));
		assert_eq!(generators.default::<Label>().unwrap(), Label(String::new()));
		assert!(generators.random::<Label>().unwrap().0.starts_with("label-"));
	}

	/// A runtime factory for an already covered type shadows the discovered one.
	#[test]
	fn test_runtime_factory_shadows_discovered() {
		let factory = FactoryGenerator::new();
		factory.add(crate::factory_def!(Suit, default = || Suit::Clubs, random = |_| Ok(Suit::Clubs)));
		let generators = Generators::with_config(GeneratorsConfig::without_discovery());
		let value = factory.default_value(&Type::of::<Suit>(), &generators).unwrap();
		assert_eq!(downcast::<Suit>(value).unwrap(), Suit::Clubs);
	}

	#[test]
	fn test_factory_failures_are_wrapped() {
		#[derive(Debug)]
		struct Broken;
		crate::declare_concrete!(Broken);

		let generators = Generators::with_config(GeneratorsConfig::without_discovery());
		generators.register_factory(crate::factory_def!(
			Broken,
			default = || Broken,
			random = |g: &Generators| g.random::<Label>().map(|_| Broken),
		));
		assert!(generators.default::<Broken>().is_ok());
		match generators.random::<Broken>() {
			Err(Error::GenerationFailed { ty, source }) => {
				assert_eq!(ty, "Broken");
				assert!(matches!(
					source.downcast_ref::<Error>(),
					Some(Error::GeneratorNotFound { .. })
				));
			}
			other => panic!("expected a wrapped failure, got {other:?}"),
		}
	}

	#[test]
	fn test_factories_do_not_claim_generic_or_unknown_types() {
		let factory = FactoryGenerator::new();
		assert!(!factory.supports(&Type::of::<Label>()));
		assert!(!factory.supports(&Type::declare::<Vec<Suit>>()));
		assert!(factory.supports(&Type::declare::<Option<Suit>>()));
	}
}
