//! Runtime type descriptors.
//!
//! A [`Type`] names what a caller wants generated. It is one of:
//!
//! * a concrete leaf type, identified by its [`TypeKey`];
//! * a [`TypeDeclaration`]: a generic family such as `Vec<_>` with its
//!   argument types fully bound, plus the function that assembles generated
//!   components into the final value;
//! * a nullable wrapper around either of the above. Only nullable types may
//!   receive null, and their values are produced as `Option<T>`.
//!
//! Descriptors are usually obtained through [`Declare`], which maps static
//! Rust types onto this model.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::params::Source;

mod declare;
#[cfg(test)]
mod tests;

pub use declare::Declare;

/// A type-erased generated value.
pub type Value = Box<dyn Any + Send>;

/// Turns components into the value of a declared generic type.
pub type Assemble = fn(Components) -> Result<Value>;

/// Wraps an optional inner value into the nullable representation.
pub type WrapNullable = fn(Option<Value>) -> Result<Value>;

/// Recovers a statically typed value from an erased one.
pub fn downcast<T: Any>(value: Value) -> Result<T> {
	value
		.downcast::<T>()
		.map(|boxed| *boxed)
		.map_err(|_| Error::TypeMismatch {
			expected: short_name(std::any::type_name::<T>()),
		})
}

/// Placeholder argument naming the raw family of a generic type.
///
/// `TypeKey::of::<Vec<Erased>>()` is the raw key shared by every `Vec<T>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Erased;

/// Identity of a Rust type, with its name kept for diagnostics.
#[derive(Clone, Copy)]
pub struct TypeKey {
	id: TypeId,
	name: &'static str,
}

impl TypeKey {
	pub fn of<T: ?Sized + 'static>() -> Self {
		Self {
			id: TypeId::of::<T>(),
			name: std::any::type_name::<T>(),
		}
	}

	pub fn id(&self) -> TypeId {
		self.id
	}

	/// Fully qualified type name.
	pub fn name(&self) -> &'static str {
		self.name
	}

	pub fn is<T: ?Sized + 'static>(&self) -> bool {
		self.id == TypeId::of::<T>()
	}
}

impl PartialEq for TypeKey {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.id.hash(state);
	}
}

impl fmt::Debug for TypeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}

impl fmt::Display for TypeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&short_name(self.name))
	}
}

/// A shareable type descriptor. Cloning is cheap.
#[derive(Clone)]
pub struct Type(Arc<Repr>);

enum Repr {
	Concrete(TypeKey),
	Declared(TypeDeclaration),
	Nullable {
		inner: Type,
		key: TypeKey,
		wrap: WrapNullable,
	},
}

impl Type {
	/// Concrete, non-generic type `T`.
	pub fn of<T: Any>() -> Self {
		Self::concrete(TypeKey::of::<T>())
	}

	pub fn concrete(key: TypeKey) -> Self {
		Self(Arc::new(Repr::Concrete(key)))
	}

	pub fn declared(declaration: TypeDeclaration) -> Self {
		Self(Arc::new(Repr::Declared(declaration)))
	}

	/// Descriptor of a statically known type.
	pub fn declare<T: Declare>() -> Self {
		T::declare()
	}

	/// Nullable form of this type, produced as `Option<T>`.
	///
	/// `T` must be the value type this descriptor describes.
	pub fn into_nullable<T: Any + Send>(self) -> Self {
		Self(Arc::new(Repr::Nullable {
			inner: self,
			key: TypeKey::of::<Option<T>>(),
			wrap: wrap_option::<T>,
		}))
	}

	pub fn is_nullable(&self) -> bool {
		matches!(*self.0, Repr::Nullable { .. })
	}

	/// The non-null value type: strips one nullable layer.
	pub fn value_type(&self) -> &Type {
		match &*self.0 {
			Repr::Nullable { inner, .. } => inner,
			_ => self,
		}
	}

	/// Raw key of the value type. Generic families report their erased key.
	pub fn raw(&self) -> TypeKey {
		match &*self.value_type().0 {
			Repr::Concrete(key) => *key,
			Repr::Declared(declaration) => declaration.raw,
			Repr::Nullable { key, .. } => *key,
		}
	}

	/// Whether the raw value type is `R`.
	pub fn is_raw<R: ?Sized + 'static>(&self) -> bool {
		self.raw().is::<R>()
	}

	/// Generic declaration of the value type, if it has one.
	pub fn declaration(&self) -> Option<&TypeDeclaration> {
		match &*self.value_type().0 {
			Repr::Declared(declaration) => Some(declaration),
			_ => None,
		}
	}

	/// Converts a generator result into this type's value representation.
	///
	/// Nullable types wrap the result into `Option`. Any other type rejects
	/// `None` with [`Error::UnexpectedNull`].
	pub fn finish(&self, value: Option<Value>) -> Result<Value> {
		match &*self.0 {
			Repr::Nullable { wrap, .. } => wrap(value),
			_ => value.ok_or_else(|| Error::UnexpectedNull {
				ty: self.to_string(),
			}),
		}
	}
}

fn wrap_option<T: Any + Send>(value: Option<Value>) -> Result<Value> {
	let value: Option<T> = value.map(downcast::<T>).transpose()?;
	Ok(Box::new(value))
}

impl PartialEq for Type {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0) || *self.0 == *other.0
	}
}

impl Eq for Type {}

impl Hash for Type {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.0.hash(state);
	}
}

impl PartialEq for Repr {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Concrete(a), Self::Concrete(b)) => a == b,
			(Self::Declared(a), Self::Declared(b)) => a == b,
			(Self::Nullable { inner: a, .. }, Self::Nullable { inner: b, .. }) => a == b,
			_ => false,
		}
	}
}

impl Hash for Repr {
	fn hash<H: Hasher>(&self, state: &mut H) {
		std::mem::discriminant(self).hash(state);
		match self {
			Self::Concrete(key) => key.hash(state),
			Self::Declared(declaration) => declaration.hash(state),
			Self::Nullable { inner, .. } => inner.hash(state),
		}
	}
}

impl fmt::Display for Type {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &*self.0 {
			Repr::Concrete(key) => fmt::Display::fmt(key, f),
			Repr::Declared(declaration) => fmt::Display::fmt(declaration, f),
			Repr::Nullable { inner, .. } => write!(f, "Option<{inner}>"),
		}
	}
}

impl fmt::Debug for Type {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Type({self})")
	}
}

/// A generic type family with every argument bound to a concrete [`Type`].
#[derive(Clone)]
pub struct TypeDeclaration {
	raw: TypeKey,
	args: Arc<[Type]>,
	assemble: Assemble,
}

/// Argument of a [`TypeDeclaration`] under construction.
#[derive(Debug, Clone)]
pub enum TypeArg {
	Type(Type),
	/// Unbounded argument. Values cannot be generated for it.
	Wildcard,
}

impl From<Type> for TypeArg {
	fn from(ty: Type) -> Self {
		Self::Type(ty)
	}
}

impl TypeDeclaration {
	/// Declares `raw` with the given arguments.
	///
	/// Rejects wildcard arguments and empty argument lists.
	pub fn new(
		raw: TypeKey,
		args: impl IntoIterator<Item = TypeArg>,
		assemble: Assemble,
	) -> Result<Self> {
		let mut resolved = Vec::new();
		for (index, arg) in args.into_iter().enumerate() {
			match arg {
				TypeArg::Type(ty) => resolved.push(ty),
				TypeArg::Wildcard => {
					return Err(Error::InvalidTypeDeclaration {
						reason: format!("argument {index} of {raw} is a wildcard"),
					});
				}
			}
		}
		if resolved.is_empty() {
			return Err(Error::InvalidTypeDeclaration {
				reason: format!("{raw} declares no type arguments"),
			});
		}
		Ok(Self::from_parts(raw, resolved, assemble))
	}

	pub(crate) fn from_parts(raw: TypeKey, args: Vec<Type>, assemble: Assemble) -> Self {
		Self {
			raw,
			args: args.into(),
			assemble,
		}
	}

	pub fn raw(&self) -> TypeKey {
		self.raw
	}

	pub fn args(&self) -> &[Type] {
		&self.args
	}

	pub fn arg(&self, index: usize) -> Option<&Type> {
		self.args.get(index)
	}

	/// Builds the declared value from generated components.
	pub fn assemble(&self, components: Components) -> Result<Value> {
		(self.assemble)(components)
	}
}

impl PartialEq for TypeDeclaration {
	fn eq(&self, other: &Self) -> bool {
		self.raw == other.raw && self.args == other.args
	}
}

impl Eq for TypeDeclaration {}

impl Hash for TypeDeclaration {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.raw.hash(state);
		self.args.hash(state);
	}
}

impl fmt::Display for TypeDeclaration {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let family = short_name(self.raw.name);
		let family = family.split('<').next().unwrap_or_default();
		write!(f, "{family}<")?;
		for (index, arg) in self.args.iter().enumerate() {
			if index > 0 {
				f.write_str(", ")?;
			}
			fmt::Display::fmt(arg, f)?;
		}
		f.write_str(">")
	}
}

impl fmt::Debug for TypeDeclaration {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TypeDeclaration({self})")
	}
}

impl Source for TypeDeclaration {}

/// Generated pieces of a generic value, handed to [`TypeDeclaration::assemble`].
pub enum Components {
	Items(Vec<Value>),
	Entries(Vec<(Value, Value)>),
}

impl Components {
	pub fn len(&self) -> usize {
		match self {
			Self::Items(items) => items.len(),
			Self::Entries(entries) => entries.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn into_items(self) -> Result<Vec<Value>> {
		match self {
			Self::Items(items) => Ok(items),
			Self::Entries(_) => Err(Error::invalid_parameters(
				"expected a sequence of items, got key/value entries",
			)),
		}
	}

	pub fn into_entries(self) -> Result<Vec<(Value, Value)>> {
		match self {
			Self::Entries(entries) => Ok(entries),
			Self::Items(_) => Err(Error::invalid_parameters(
				"expected key/value entries, got a sequence of items",
			)),
		}
	}
}

/// Drops module paths from a type name: `alloc::vec::Vec<i32>` becomes `Vec<i32>`.
pub(crate) fn short_name(name: &str) -> String {
	let mut out = String::with_capacity(name.len());
	let mut segment = String::new();
	for ch in name.chars() {
		match ch {
			':' => segment.clear(),
			'<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&' => {
				out.push_str(&segment);
				segment.clear();
				out.push(ch);
			}
			_ => segment.push(ch),
		}
	}
	out.push_str(&segment);
	out
}
