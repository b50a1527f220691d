//! Generator for `HashMap<K, V>` and `BTreeMap<K, V>`.

use std::collections::{BTreeMap, HashMap};

use fixgen_core::error::Error;
use fixgen_core::params::{KeyValueGenericParameters, MapGenerationParameters};
use fixgen_core::resolver::{
	declaration_of, default_component, nullable_random_component, random_component,
};
use fixgen_core::types::Erased;
use fixgen_core::{Components, Generators, Parametrized, ParametrizedGenerator, Priority, Result, Type, Value};
use tracing::trace;

use crate::size::{random_size, size_range};

/// Random maps draw 1 to 100 entries by default. Keys are never null;
/// values may be when the request is nullable. Duplicate keys collapse.
#[derive(Debug, Default)]
pub struct MapGenerator;

impl MapGenerator {
	pub const SIZES: (usize, usize) = (1, 100);

	fn entry_types<'a>(ty: &Type, params: &'a MapGenerationParameters) -> Result<(&'a Type, &'a Type)> {
		match (params.keys_type(), params.values_type()) {
			(Some(keys), Some(values)) => Ok((keys, values)),
			_ => Err(Error::invalid_parameters(format!(
				"key and value types of {ty} are unknown"
			))),
		}
	}

	fn random_map(
		ty: &Type,
		params: &MapGenerationParameters,
		generators: &Generators,
		nullable: bool,
	) -> Result<Value> {
		let (keys, values) = Self::entry_types(ty, params)?;
		let size = random_size(params, Self::SIZES.0, Self::SIZES.1)?;
		trace!(%ty, size, nullable, "generating map");
		let entries = (0..size)
			.map(|_| {
				let key = random_component(generators, keys)?;
				let value = if nullable {
					nullable_random_component(generators, values)?
				} else {
					random_component(generators, values)?
				};
				Ok((key, value))
			})
			.collect::<Result<Vec<_>>>()?;
		declaration_of(ty)?.assemble(Components::Entries(entries))
	}
}

impl ParametrizedGenerator for MapGenerator {
	type Params = MapGenerationParameters;

	fn priority(&self) -> Priority {
		Priority::GENERIC_GENERATORS
	}

	fn supports(&self, ty: &Type) -> bool {
		ty.is_raw::<HashMap<Erased, Erased>>() || ty.is_raw::<BTreeMap<Erased, Erased>>()
	}

	/// Empty unless a minimum size is requested, then that many default
	/// entries, which all share the default key.
	fn default_value(&self, ty: &Type, params: &Self::Params, generators: &Generators) -> Result<Value> {
		let (keys, values) = Self::entry_types(ty, params)?;
		let shortest = *size_range(params, 0, 0)?.start();
		let entries = (0..shortest)
			.map(|_| Ok((default_component(generators, keys)?, default_component(generators, values)?)))
			.collect::<Result<Vec<_>>>()?;
		declaration_of(ty)?.assemble(Components::Entries(entries))
	}

	fn random_value(&self, ty: &Type, params: &Self::Params, generators: &Generators) -> Result<Value> {
		Self::random_map(ty, params, generators, false)
	}

	fn random_value_with_nulls(
		&self,
		ty: &Type,
		params: &Self::Params,
		generators: &Generators,
	) -> Result<Value> {
		Self::random_map(ty, params, generators, true)
	}
}

fixgen_core::submit_generator!("fixgen::map", Parametrized::new(MapGenerator));
