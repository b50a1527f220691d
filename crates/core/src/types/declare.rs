use std::any::Any;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::Hash;

use super::{Assemble, Components, Erased, Type, TypeDeclaration, TypeKey, Value, downcast};
use crate::error::Result;

/// Maps a static Rust type onto its runtime [`Type`] descriptor.
///
/// `Option<T>` declares the nullable form of `T`. Standard collections declare
/// their erased family with bound arguments, so generic generators can see the
/// component types they must produce.
pub trait Declare: Any + Send {
	fn declare() -> Type;
}

/// Implements [`Declare`] for concrete types that carry no type arguments.
#[macro_export]
macro_rules! declare_concrete {
	($($ty:ty),+ $(,)?) => {
		$(
			impl $crate::types::Declare for $ty {
				fn declare() -> $crate::types::Type {
					$crate::types::Type::of::<$ty>()
				}
			}
		)+
	};
}

declare_concrete!(
	bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
	String, ()
);

impl<T: Declare> Declare for Option<T> {
	fn declare() -> Type {
		T::declare().into_nullable::<T>()
	}
}

fn family<R: ?Sized + 'static>(args: Vec<Type>, assemble: Assemble) -> Type {
	Type::declared(TypeDeclaration::from_parts(TypeKey::of::<R>(), args, assemble))
}

fn items<T: Any>(components: Components) -> Result<impl Iterator<Item = Result<T>>> {
	Ok(components.into_items()?.into_iter().map(downcast::<T>))
}

fn entries<K: Any, V: Any>(
	components: Components,
) -> Result<impl Iterator<Item = Result<(K, V)>>> {
	Ok(components
		.into_entries()?
		.into_iter()
		.map(|(key, value)| Ok((downcast::<K>(key)?, downcast::<V>(value)?))))
}

impl<T: Declare> Declare for Vec<T> {
	fn declare() -> Type {
		family::<Vec<Erased>>(vec![T::declare()], |components| {
			Ok(Box::new(items::<T>(components)?.collect::<Result<Vec<T>>>()?) as Value)
		})
	}
}

impl<T: Declare> Declare for VecDeque<T> {
	fn declare() -> Type {
		family::<VecDeque<Erased>>(vec![T::declare()], |components| {
			Ok(Box::new(items::<T>(components)?.collect::<Result<VecDeque<T>>>()?) as Value)
		})
	}
}

impl<T: Declare> Declare for Box<[T]> {
	fn declare() -> Type {
		family::<Box<[Erased]>>(vec![T::declare()], |components| {
			Ok(Box::new(items::<T>(components)?.collect::<Result<Box<[T]>>>()?) as Value)
		})
	}
}

impl<T: Declare + Eq + Hash> Declare for HashSet<T> {
	fn declare() -> Type {
		family::<HashSet<Erased>>(vec![T::declare()], |components| {
			Ok(Box::new(items::<T>(components)?.collect::<Result<HashSet<T>>>()?) as Value)
		})
	}
}

impl<T: Declare + Ord> Declare for BTreeSet<T> {
	fn declare() -> Type {
		family::<BTreeSet<Erased>>(vec![T::declare()], |components| {
			Ok(Box::new(items::<T>(components)?.collect::<Result<BTreeSet<T>>>()?) as Value)
		})
	}
}

impl<K: Declare + Eq + Hash, V: Declare> Declare for HashMap<K, V> {
	fn declare() -> Type {
		family::<HashMap<Erased, Erased>>(vec![K::declare(), V::declare()], |components| {
			Ok(Box::new(entries::<K, V>(components)?.collect::<Result<HashMap<K, V>>>()?) as Value)
		})
	}
}

impl<K: Declare + Ord, V: Declare> Declare for BTreeMap<K, V> {
	fn declare() -> Type {
		family::<BTreeMap<Erased, Erased>>(vec![K::declare(), V::declare()], |components| {
			Ok(Box::new(entries::<K, V>(components)?.collect::<Result<BTreeMap<K, V>>>()?) as Value)
		})
	}
}
