use std::sync::Arc;

use pretty_assertions::assert_eq;

use super::*;
use crate::config::GeneratorsConfig;
use crate::generator::{Parametrized, ParametrizedGenerator};
use crate::params::GenerationParameters;
use crate::params::constraints::{NotNull, Size};
use crate::priority::Priority;
use crate::types::TypeDeclaration;

#[derive(Debug, PartialEq)]
struct Gadget(u32);

crate::declare_concrete!(Gadget);

struct Owner;

const STRICT: Group = Group::new("strict");

struct Gadgets;

impl ParametrizedGenerator for Gadgets {
	type Params = GenerationParameters;

	fn priority(&self) -> Priority {
		Priority(10)
	}

	fn supports(&self, ty: &Type) -> bool {
		ty.is_raw::<Gadget>()
	}

	fn default_value(&self, _: &Type, _: &GenerationParameters, _: &crate::Generators) -> Result<Value> {
		Ok(Box::new(Gadget(0)))
	}

	fn random_value(&self, _: &Type, _: &GenerationParameters, _: &crate::Generators) -> Result<Value> {
		Ok(Box::new(Gadget(7)))
	}
}

/// Plain generator that claims every type and never produces a value.
struct Anything;

impl Generator for Anything {
	fn supports(&self, _: &Type) -> bool {
		true
	}

	fn default_value(&self, ty: &Type, _: &crate::Generators) -> Result<Value> {
		Err(crate::Error::unsupported_type("anything", ty))
	}

	fn random_value(&self, ty: &Type, _: &crate::Generators) -> Result<Value> {
		Err(crate::Error::unsupported_type("anything", ty))
	}
}

fn table() -> ConstraintTable {
	ConstraintTable::new()
		.with(TypeKey::of::<Owner>(), "gadget", NotNull)
		.with_group(TypeKey::of::<Owner>(), "gadget", STRICT, Size::at_most(3))
		.with(TypeKey::of::<Owner>(), "other", NotNull)
}

/// Registry whose only gadget generator always rolls null.
fn always_null() -> Generators {
	let generators = Generators::new();
	let gadgets = Arc::new(Parametrized::new(Gadgets));
	gadgets.null_probability().unwrap().set(1.0).unwrap();
	generators.register([gadgets as Arc<dyn Generator>]);
	generators
}

#[test]
fn test_constraint_groups() {
	let table = table();
	let member = Member::of::<Owner, Option<Gadget>>("gadget");

	assert_eq!(table.constraints(&member, &[]).len(), 1);
	assert_eq!(table.constraints(&member, &[Group::DEFAULT]).len(), 1);

	let strict = table.constraints(&member, &[STRICT]);
	assert_eq!(strict.len(), 1);
	assert!(strict[0].downcast_ref::<Size>().is_some());

	assert_eq!(table.constraints(&member, &[Group::DEFAULT, STRICT]).len(), 2);
	assert!(table.constraints(&Member::of::<Owner, u8>("missing"), &[]).is_empty());
	assert!(NoConstraints.constraints(&member, &[]).is_empty());
}

/// A not-null constraint overrides a certain null roll.
#[test]
fn test_not_null_member_is_never_null() {
	let generators = always_null();
	let member = Member::of::<Owner, Option<Gadget>>("gadget");

	let constrained = TargetedGenerator::targeting(&generators, member.clone(), Arc::new(table())).unwrap();
	for _ in 0..100 {
		let value: Option<Gadget> = constrained.nullable_random(&generators, &[]).unwrap();
		assert_eq!(value, Some(Gadget(7)));
	}

	let free = TargetedGenerator::targeting(&generators, member, Arc::new(NoConstraints)).unwrap();
	for _ in 0..100 {
		let value: Option<Gadget> = free.nullable_random(&generators, &[]).unwrap();
		assert_eq!(value, None);
	}
}

/// Groups decide which constraints take part.
#[test]
fn test_groups_select_constraints() {
	let generators = always_null();
	let member = Member::of::<Owner, Option<Gadget>>("gadget");
	let targeted = TargetedGenerator::targeting(&generators, member, Arc::new(table())).unwrap();

	let value: Option<Gadget> = targeted.nullable_random(&generators, &[STRICT]).unwrap();
	assert_eq!(value, None);
	let value: Option<Gadget> = targeted.random(&generators, &[STRICT]).unwrap();
	assert_eq!(value, Some(Gadget(7)));
}

#[test]
fn test_parameter_sources_start_with_the_declaration() {
	let member = Member::of::<Owner, Vec<u8>>("gadget");
	let targeted = TargetedGenerator::with_generator(member, Arc::new(Anything), Arc::new(table())).unwrap();

	let sources = targeted.parameter_sources(&[Group::DEFAULT, STRICT]);
	assert_eq!(sources.len(), 3);
	let declaration = sources[0].downcast_ref::<TypeDeclaration>().unwrap();
	assert_eq!(declaration.args(), &[Type::of::<u8>()][..]);
	assert!(sources[1].downcast_ref::<NotNull>().is_some());
	assert!(sources[2].downcast_ref::<Size>().is_some());

	let plain = TargetedGenerator::with_generator(
		Member::of::<Owner, u8>("other"),
		Arc::new(Anything),
		Arc::new(NoConstraints),
	)
	.unwrap();
	assert!(plain.parameter_sources(&[]).is_empty());
}

#[test]
fn test_constraints_need_a_parametrizable_generator() {
	let generators = Generators::with_config(GeneratorsConfig::without_discovery());
	let member = Member::of::<Owner, u8>("gadget");
	let targeted = TargetedGenerator::with_generator(member, Arc::new(Anything), Arc::new(table())).unwrap();

	let err = targeted.random_value(&generators, &[]).unwrap_err();
	assert!(matches!(err, Error::UnsupportedParameters { .. }));

	// No constraint in the group, so the generator itself is reached.
	let err = targeted.random_value(&generators, &[Group::new("lenient")]).unwrap_err();
	assert!(matches!(err, Error::UnsupportedType { .. }));
}

#[test]
fn test_binding_checks_support() {
	let generators = Generators::with_config(GeneratorsConfig::without_discovery());
	let member = Member::of::<Owner, Gadget>("gadget");

	let err = TargetedGenerator::targeting(&generators, member.clone(), Arc::new(NoConstraints)).unwrap_err();
	assert!(matches!(err, Error::GeneratorNotFound { .. }));

	let err = TargetedGenerator::with_generator(
		Member::of::<Owner, u8>("gadget"),
		Arc::new(Parametrized::new(Gadgets)),
		Arc::new(NoConstraints),
	)
	.unwrap_err();
	assert!(matches!(err, Error::UnsupportedType { .. }));

	assert_eq!(member.to_string(), "Owner::gadget: Gadget");
}
