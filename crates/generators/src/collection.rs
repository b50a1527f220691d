//! Generators for sequences and sets.
//!
//! Element types come from the request's declaration: the registry feeds it
//! as a parameters source, which fills
//! [`SimpleGenericParameters::element_type`]. Elements are generated through
//! the registry, so any element type it supports (including nested
//! collections) works.

use std::collections::{BTreeSet, HashSet, VecDeque};

use fixgen_core::error::Error;
use fixgen_core::params::{CollectionGenerationParameters, SimpleGenericParameters};
use fixgen_core::resolver::{declaration_of, default_component, random_components, type_argument};
use fixgen_core::types::Erased;
use fixgen_core::{
	Components, Generator, Generators, NullProbability, Parametrized, ParametrizedGenerator, Priority, Result,
	Type, Value,
};
use rand::Rng;
use tracing::trace;

use crate::size::{random_size, size_range};

fn element_type<'a>(ty: &Type, params: &'a CollectionGenerationParameters) -> Result<&'a Type> {
	params
		.element_type()
		.ok_or_else(|| Error::invalid_parameters(format!("element type of {ty} is unknown")))
}

/// The shortest collection the parameters allow, filled with default
/// elements.
fn default_collection(
	ty: &Type,
	params: &CollectionGenerationParameters,
	generators: &Generators,
) -> Result<Value> {
	let element = element_type(ty, params)?;
	let shortest = *size_range(params, 0, 0)?.start();
	let items = (0..shortest)
		.map(|_| default_component(generators, element))
		.collect::<Result<Vec<_>>>()?;
	declaration_of(ty)?.assemble(Components::Items(items))
}

fn random_collection(
	ty: &Type,
	params: &CollectionGenerationParameters,
	generators: &Generators,
	(floor, ceiling): (usize, usize),
	nullable: bool,
) -> Result<Value> {
	let element = element_type(ty, params)?;
	let size = random_size(params, floor, ceiling)?;
	trace!(%ty, size, nullable, "generating collection");
	let items = random_components(generators, element, size, nullable)?;
	declaration_of(ty)?.assemble(Components::Items(items))
}

/// Generator of `Vec<T>` and `VecDeque<T>`, 1 to 10 elements by default.
#[derive(Debug, Default)]
pub struct ListGenerator;

impl ListGenerator {
	pub const SIZES: (usize, usize) = (1, 10);
}

impl ParametrizedGenerator for ListGenerator {
	type Params = CollectionGenerationParameters;

	fn priority(&self) -> Priority {
		Priority::GENERIC_GENERATORS
	}

	fn supports(&self, ty: &Type) -> bool {
		ty.is_raw::<Vec<Erased>>() || ty.is_raw::<VecDeque<Erased>>()
	}

	fn default_value(&self, ty: &Type, params: &Self::Params, generators: &Generators) -> Result<Value> {
		default_collection(ty, params, generators)
	}

	fn random_value(&self, ty: &Type, params: &Self::Params, generators: &Generators) -> Result<Value> {
		random_collection(ty, params, generators, Self::SIZES, false)
	}

	fn random_value_with_nulls(
		&self,
		ty: &Type,
		params: &Self::Params,
		generators: &Generators,
	) -> Result<Value> {
		random_collection(ty, params, generators, Self::SIZES, true)
	}
}

/// Generator of `HashSet<T>` and `BTreeSet<T>`, up to 100 elements by
/// default.
///
/// The size is the number of elements drawn. Duplicates collapse, so a set of
/// a small domain such as `bool` holds fewer.
#[derive(Debug, Default)]
pub struct SetGenerator;

impl SetGenerator {
	pub const SIZES: (usize, usize) = (0, 100);
}

impl ParametrizedGenerator for SetGenerator {
	type Params = CollectionGenerationParameters;

	fn priority(&self) -> Priority {
		Priority::GENERIC_GENERATORS
	}

	fn supports(&self, ty: &Type) -> bool {
		ty.is_raw::<HashSet<Erased>>() || ty.is_raw::<BTreeSet<Erased>>()
	}

	fn default_value(&self, ty: &Type, params: &Self::Params, generators: &Generators) -> Result<Value> {
		default_collection(ty, params, generators)
	}

	fn random_value(&self, ty: &Type, params: &Self::Params, generators: &Generators) -> Result<Value> {
		random_collection(ty, params, generators, Self::SIZES, false)
	}

	fn random_value_with_nulls(
		&self,
		ty: &Type,
		params: &Self::Params,
		generators: &Generators,
	) -> Result<Value> {
		random_collection(ty, params, generators, Self::SIZES, true)
	}
}

/// Generator of boxed slices `Box<[T]>`. Takes no parameters: the default
/// is empty and random slices hold 1 to 10 elements.
#[derive(Debug, Default)]
pub struct ArrayGenerator {
	nulls: NullProbability,
}

impl ArrayGenerator {
	pub fn new() -> Self {
		Self::default()
	}
}

impl Generator for ArrayGenerator {
	fn priority(&self) -> Priority {
		Priority::GENERIC_GENERATORS
	}

	fn supports(&self, ty: &Type) -> bool {
		ty.is_raw::<Box<[Erased]>>()
	}

	fn default_value(&self, ty: &Type, _generators: &Generators) -> Result<Value> {
		self.assert_supported(ty)?;
		declaration_of(ty)?.assemble(Components::Items(Vec::new()))
	}

	fn random_value(&self, ty: &Type, generators: &Generators) -> Result<Value> {
		self.assert_supported(ty)?;
		let declaration = declaration_of(ty)?;
		let element = type_argument(declaration, 0)?;
		let size = rand::thread_rng().gen_range(1..=10);
		let items = random_components(generators, element, size, false)?;
		declaration.assemble(Components::Items(items))
	}

	fn null_probability(&self) -> Option<&NullProbability> {
		Some(&self.nulls)
	}
}

fixgen_core::submit_generator!("fixgen::list", Parametrized::new(ListGenerator));
fixgen_core::submit_generator!("fixgen::set", Parametrized::new(SetGenerator));
fixgen_core::submit_generator!("fixgen::array", ArrayGenerator::new());
