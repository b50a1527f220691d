use std::collections::{BTreeMap, HashMap, HashSet};

use pretty_assertions::assert_eq;

use super::*;
use crate::error::Error;

#[test]
fn test_concrete_type_identity() {
	let a = Type::of::<i32>();
	let b = Type::declare::<i32>();
	assert_eq!(a, b);
	assert_ne!(a, Type::of::<i64>());
	assert!(a.is_raw::<i32>());
	assert!(!a.is_nullable());
	assert!(a.declaration().is_none());
	assert_eq!(a.to_string(), "i32");
}

/// Generic families share a raw key but differ by their arguments.
#[test]
fn test_declared_family_keys() {
	let ints = Type::declare::<Vec<i32>>();
	let strings = Type::declare::<Vec<String>>();
	assert_eq!(ints.raw(), strings.raw());
	assert!(ints.is_raw::<Vec<Erased>>());
	assert_ne!(ints, strings);
	assert_eq!(ints, Type::declare::<Vec<i32>>());

	let declaration = ints.declaration().expect("declared");
	assert_eq!(declaration.args(), &[Type::of::<i32>()]);
	assert_eq!(ints.to_string(), "Vec<i32>");
	assert_eq!(Type::declare::<HashMap<String, Vec<u8>>>().to_string(), "HashMap<String, Vec<u8>>");
}

#[test]
fn test_nullable_layers() {
	let ty = Type::declare::<Option<Vec<bool>>>();
	assert!(ty.is_nullable());
	assert!(!ty.value_type().is_nullable());
	assert!(ty.is_raw::<Vec<Erased>>());
	assert!(ty.declaration().is_some());
	assert_eq!(ty.to_string(), "Option<Vec<bool>>");
	assert_ne!(ty, Type::declare::<Vec<bool>>());

	// Nested options are their own raw type.
	let nested = Type::declare::<Option<Option<bool>>>();
	assert!(nested.is_raw::<Option<bool>>());
}

#[test]
fn test_finish_wraps_nullable_values() {
	let ty = Type::declare::<Option<u8>>();
	let some = downcast::<Option<u8>>(ty.finish(Some(Box::new(7u8))).unwrap()).unwrap();
	assert_eq!(some, Some(7));
	let none = downcast::<Option<u8>>(ty.finish(None).unwrap()).unwrap();
	assert_eq!(none, None);
}

#[test]
fn test_finish_rejects_null_for_plain_types() {
	let ty = Type::of::<u8>();
	assert!(matches!(ty.finish(None), Err(Error::UnexpectedNull { .. })));
	assert_eq!(downcast::<u8>(ty.finish(Some(Box::new(3u8))).unwrap()).unwrap(), 3);
}

#[test]
fn test_downcast_mismatch() {
	let err = downcast::<String>(Box::new(1u32)).unwrap_err();
	assert!(matches!(err, Error::TypeMismatch { ref expected } if expected == "String"));
}

#[test]
fn test_assemble_typed_containers() {
	let ty = Type::declare::<Vec<u16>>();
	let value = ty
		.declaration()
		.unwrap()
		.assemble(Components::Items(vec![Box::new(1u16), Box::new(2u16)]))
		.unwrap();
	assert_eq!(downcast::<Vec<u16>>(value).unwrap(), vec![1, 2]);

	let ty = Type::declare::<BTreeMap<char, bool>>();
	let value = ty
		.declaration()
		.unwrap()
		.assemble(Components::Entries(vec![
			(Box::new('b'), Box::new(true)),
			(Box::new('a'), Box::new(false)),
		]))
		.unwrap();
	let map = downcast::<BTreeMap<char, bool>>(value).unwrap();
	assert_eq!(map.into_iter().collect::<Vec<_>>(), vec![('a', false), ('b', true)]);

	let ty = Type::declare::<HashSet<u8>>();
	let value = ty
		.declaration()
		.unwrap()
		.assemble(Components::Items(vec![Box::new(4u8), Box::new(4u8)]))
		.unwrap();
	assert_eq!(downcast::<HashSet<u8>>(value).unwrap().len(), 1);
}

/// Components of the wrong type are reported, not silently dropped.
#[test]
fn test_assemble_rejects_foreign_components() {
	let ty = Type::declare::<Vec<u16>>();
	let declaration = ty.declaration().unwrap();
	let err = declaration.assemble(Components::Items(vec![Box::new("nope")])).unwrap_err();
	assert!(matches!(err, Error::TypeMismatch { .. }));
	let err = declaration.assemble(Components::Entries(Vec::new())).unwrap_err();
	assert!(matches!(err, Error::InvalidParameters { .. }));
}

#[test]
fn test_declaration_rejects_wildcards_and_empty_arguments() {
	fn never(_: Components) -> crate::Result<Value> {
		Ok(Box::new(()))
	}
	let raw = TypeKey::of::<Vec<Erased>>();

	let err = TypeDeclaration::new(raw, [TypeArg::Wildcard], never).unwrap_err();
	assert!(matches!(err, Error::InvalidTypeDeclaration { .. }));

	let err = TypeDeclaration::new(raw, [], never).unwrap_err();
	assert!(matches!(err, Error::InvalidTypeDeclaration { .. }));

	let ok = TypeDeclaration::new(raw, [Type::of::<i8>().into()], never).unwrap();
	assert_eq!(ok.args().len(), 1);
}

#[test]
fn test_short_names() {
	assert_eq!(short_name("alloc::vec::Vec<core::option::Option<i32>>"), "Vec<Option<i32>>");
	assert_eq!(short_name("dyn fixgen_core::params::Parameters"), "dyn Parameters");
	assert_eq!(short_name("&[u8]"), "&[u8]");
}
