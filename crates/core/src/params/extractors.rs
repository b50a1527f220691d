//! Built-in source extractors.
//!
//! Parameters-to-parameters extractors narrow: the merged value never
//! allows more than either side. Constraint extractors translate
//! [`constraints`](super::constraints) into bounds. Declaration extractors
//! copy component types out of a [`TypeDeclaration`].

use std::sync::Arc;

use super::builtin::{f64_at_least, f64_at_most};
use super::constraints::{Max, Min, Negative, NegativeOrZero, NotNull, Positive, PositiveOrZero, Size};
use super::{
	GenericsParameters, KeyValueGenericParameters, NumberParameters, Parameters,
	ParametersSourceExtractor, SimpleGenericParameters, SizeParameters, SourceExtractorFn,
};
use crate::error::Error;
use crate::priority::Priority;
use crate::submit_extractor;
use crate::types::TypeDeclaration;

type Extractor = Arc<dyn ParametersSourceExtractor>;

/// Nullable only if both sides allow null.
pub fn nullable() -> Extractor {
	Arc::new(SourceExtractorFn::<dyn Parameters, dyn Parameters>::from_facet(
		"fixgen::nullable",
		Priority::DEFAULT,
		|source, target| {
			let nullable = target.is_nullable() && source.is_nullable();
			target.set_nullable(nullable);
			Ok(())
		},
	))
}

/// Intersects size bounds.
pub fn size() -> Extractor {
	Arc::new(SourceExtractorFn::<dyn SizeParameters, dyn SizeParameters>::from_facet(
		"fixgen::size",
		Priority::DEFAULT,
		|source, target| {
			narrow_sizes(target, source.min_size(), source.max_size());
			Ok(())
		},
	))
}

/// Intersects numeric bounds.
pub fn number() -> Extractor {
	Arc::new(SourceExtractorFn::<dyn NumberParameters, dyn NumberParameters>::from_facet(
		"fixgen::number",
		Priority::DEFAULT,
		|source, target| {
			raise_min(target, source.min());
			lower_max(target, source.max());
			if let Some(min) = source.integer_min() {
				raise_integer_min(target, min);
			}
			if let Some(max) = source.integer_max() {
				lower_integer_max(target, max);
			}
			Ok(())
		},
	))
}

pub fn simple_generic() -> Extractor {
	Arc::new(
		SourceExtractorFn::<dyn SimpleGenericParameters, dyn SimpleGenericParameters>::from_facet(
			"fixgen::simple-generic",
			Priority::DEFAULT,
			|source, target| {
				if let Some(ty) = source.element_type() {
					target.set_element_type(ty.clone());
				}
				Ok(())
			},
		),
	)
}

pub fn key_value_generic() -> Extractor {
	Arc::new(
		SourceExtractorFn::<dyn KeyValueGenericParameters, dyn KeyValueGenericParameters>::from_facet(
			"fixgen::key-value-generic",
			Priority::DEFAULT,
			|source, target| {
				if let Some(ty) = source.keys_type() {
					target.set_keys_type(ty.clone());
				}
				if let Some(ty) = source.values_type() {
					target.set_values_type(ty.clone());
				}
				Ok(())
			},
		),
	)
}

/// Element type from a single-argument declaration.
pub fn simple_generic_declaration() -> Extractor {
	Arc::new(SourceExtractorFn::<dyn SimpleGenericParameters, TypeDeclaration>::new(
		"fixgen::simple-generic-declaration",
		Priority::DEFAULT,
		|declaration, target| match declaration.args() {
			[element] => {
				target.set_element_type(element.clone());
				Ok(())
			}
			args => Err(arity(declaration, args.len(), 1)),
		},
	))
}

/// Key and value types from a two-argument declaration.
pub fn key_value_declaration() -> Extractor {
	Arc::new(SourceExtractorFn::<dyn KeyValueGenericParameters, TypeDeclaration>::new(
		"fixgen::key-value-declaration",
		Priority::DEFAULT,
		|declaration, target| match declaration.args() {
			[keys, values] => {
				target.set_keys_type(keys.clone());
				target.set_values_type(values.clone());
				Ok(())
			}
			args => Err(arity(declaration, args.len(), 2)),
		},
	))
}

pub fn generics_declaration() -> Extractor {
	Arc::new(SourceExtractorFn::<dyn GenericsParameters, TypeDeclaration>::new(
		"fixgen::generics-declaration",
		Priority::DEFAULT,
		|declaration, target| {
			target.set_type_declaration(declaration.clone());
			Ok(())
		},
	))
}

pub fn not_null() -> Extractor {
	Arc::new(SourceExtractorFn::<dyn Parameters, NotNull>::new(
		"fixgen::not-null",
		Priority::DEFAULT,
		|_, target| {
			target.set_nullable(false);
			Ok(())
		},
	))
}

pub fn size_constraint() -> Extractor {
	Arc::new(SourceExtractorFn::<dyn SizeParameters, Size>::new(
		"fixgen::size-constraint",
		Priority::DEFAULT,
		|size, target| {
			narrow_sizes(target, size.min, size.max);
			Ok(())
		},
	))
}

pub fn min() -> Extractor {
	Arc::new(SourceExtractorFn::<dyn NumberParameters, Min>::new(
		"fixgen::min",
		Priority::DEFAULT,
		|min, target| {
			raise_integer_min(target, i128::from(min.0));
			Ok(())
		},
	))
}

pub fn max() -> Extractor {
	Arc::new(SourceExtractorFn::<dyn NumberParameters, Max>::new(
		"fixgen::max",
		Priority::DEFAULT,
		|max, target| {
			lower_integer_max(target, i128::from(max.0));
			Ok(())
		},
	))
}

pub fn positive() -> Extractor {
	Arc::new(SourceExtractorFn::<dyn NumberParameters, Positive>::new(
		"fixgen::positive",
		Priority::DEFAULT,
		|_, target| {
			raise_min(target, f64::MIN_POSITIVE);
			Ok(())
		},
	))
}

pub fn positive_or_zero() -> Extractor {
	Arc::new(SourceExtractorFn::<dyn NumberParameters, PositiveOrZero>::new(
		"fixgen::positive-or-zero",
		Priority::DEFAULT,
		|_, target| {
			raise_min(target, 0.0);
			Ok(())
		},
	))
}

pub fn negative() -> Extractor {
	Arc::new(SourceExtractorFn::<dyn NumberParameters, Negative>::new(
		"fixgen::negative",
		Priority::DEFAULT,
		|_, target| {
			lower_max(target, -f64::MIN_POSITIVE);
			Ok(())
		},
	))
}

pub fn negative_or_zero() -> Extractor {
	Arc::new(SourceExtractorFn::<dyn NumberParameters, NegativeOrZero>::new(
		"fixgen::negative-or-zero",
		Priority::DEFAULT,
		|_, target| {
			lower_max(target, 0.0);
			Ok(())
		},
	))
}

/// Every built-in extractor, in the order discovery yields them.
pub fn builtin() -> Vec<Extractor> {
	let mut extractors = vec![
		generics_declaration(),
		key_value_declaration(),
		key_value_generic(),
		max(),
		min(),
		negative(),
		negative_or_zero(),
		not_null(),
		nullable(),
		number(),
		positive(),
		positive_or_zero(),
		simple_generic(),
		simple_generic_declaration(),
		size(),
		size_constraint(),
	];
	crate::priority::sort_descending(&mut extractors, |e| e.priority());
	extractors
}

submit_extractor!("fixgen::generics-declaration", generics_declaration());
submit_extractor!("fixgen::key-value-declaration", key_value_declaration());
submit_extractor!("fixgen::key-value-generic", key_value_generic());
submit_extractor!("fixgen::max", max());
submit_extractor!("fixgen::min", min());
submit_extractor!("fixgen::negative", negative());
submit_extractor!("fixgen::negative-or-zero", negative_or_zero());
submit_extractor!("fixgen::not-null", not_null());
submit_extractor!("fixgen::nullable", nullable());
submit_extractor!("fixgen::number", number());
submit_extractor!("fixgen::positive", positive());
submit_extractor!("fixgen::positive-or-zero", positive_or_zero());
submit_extractor!("fixgen::simple-generic", simple_generic());
submit_extractor!("fixgen::simple-generic-declaration", simple_generic_declaration());
submit_extractor!("fixgen::size", size());
submit_extractor!("fixgen::size-constraint", size_constraint());

fn narrow_sizes(target: &mut dyn SizeParameters, min: usize, max: usize) {
	target.set_min_size(target.min_size().max(min));
	target.set_max_size(target.max_size().min(max));
}

fn raise_min(target: &mut dyn NumberParameters, min: f64) {
	if min > target.min() {
		target.set_min(min);
	}
}

fn lower_max(target: &mut dyn NumberParameters, max: f64) {
	if max < target.max() {
		target.set_max(max);
	}
}

/// Raises the exact bound, and the `f64` bound to the nearest value that
/// still admits it.
fn raise_integer_min(target: &mut dyn NumberParameters, min: i128) {
	if target.integer_min().is_none_or(|current| min > current) {
		target.set_integer_min(min);
	}
	raise_min(target, f64_at_most(min));
}

fn lower_integer_max(target: &mut dyn NumberParameters, max: i128) {
	if target.integer_max().is_none_or(|current| max < current) {
		target.set_integer_max(max);
	}
	lower_max(target, f64_at_least(max));
}

fn arity(declaration: &TypeDeclaration, found: usize, expected: usize) -> Error {
	Error::invalid_parameters(format!(
		"{declaration} has {found} type arguments, expected {expected}"
	))
}
