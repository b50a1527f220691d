//! Component generation for generic containers.
//!
//! Container generators do not know their element types statically. They
//! read them from the declaration of the requested type and recurse into the
//! registry through these helpers. A declared element type such as
//! `Vec<i32>` carries its own declaration, which the registry feeds to the
//! nested generator as an implicit parameters source, so nesting works to any
//! depth.
//!
//! Every helper returns components in their final representation: a
//! nullable element type yields `Option` values.

use crate::error::{Error, Result};
use crate::registry::Generators;
use crate::types::{Type, TypeDeclaration, Value};

/// The `index`th type argument of `declaration`.
pub fn type_argument(declaration: &TypeDeclaration, index: usize) -> Result<&Type> {
	declaration.arg(index).ok_or_else(|| {
		Error::invalid_parameters(format!("{declaration} has no type argument at position {index}"))
	})
}

/// Declaration of `ty`, required by generators of generic families.
pub fn declaration_of(ty: &Type) -> Result<&TypeDeclaration> {
	ty.declaration().ok_or_else(|| {
		Error::invalid_parameters(format!("{ty} must be declared with its type arguments"))
	})
}

pub fn default_component(generators: &Generators, ty: &Type) -> Result<Value> {
	ty.finish(Some(generators.default_value(ty)?))
}

/// Random non-null component.
pub fn random_component(generators: &Generators, ty: &Type) -> Result<Value> {
	ty.finish(Some(generators.random_value(ty)?))
}

/// Random component that may be null when `ty` is nullable.
pub fn nullable_random_component(generators: &Generators, ty: &Type) -> Result<Value> {
	ty.finish(generators.nullable_random_value(ty)?)
}

/// `count` random components of `ty`.
pub fn random_components(
	generators: &Generators,
	ty: &Type,
	count: usize,
	nullable: bool,
) -> Result<Vec<Value>> {
	(0..count)
		.map(|_| {
			if nullable {
				nullable_random_component(generators, ty)
			} else {
				random_component(generators, ty)
			}
		})
		.collect()
}
