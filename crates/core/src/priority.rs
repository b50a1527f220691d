use std::cmp::Reverse;
use std::fmt;

/// Ordering weight for generators and source extractors.
///
/// Higher values are consulted first. Entries sharing a priority keep their
/// registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Priority(pub i32);

impl Priority {
	pub const MIN: Self = Self(i32::MIN);
	/// Band for generators of generic containers.
	pub const GENERIC_GENERATORS: Self = Self(-2000);
	/// Band for generators of primitives and other built-in leaf types.
	pub const NATIVE_GENERATORS: Self = Self(-1000);
	/// Band for the factory-backed generator.
	pub const FACTORY_GENERATORS: Self = Self(-500);
	pub const DEFAULT: Self = Self(0);
	pub const MAX: Self = Self(i32::MAX);

	pub const fn new(value: i32) -> Self {
		Self(value)
	}

	pub const fn get(self) -> i32 {
		self.0
	}
}

impl From<i32> for Priority {
	fn from(value: i32) -> Self {
		Self(value)
	}
}

impl fmt::Display for Priority {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.0, f)
	}
}

/// Stable sort by descending priority.
pub(crate) fn sort_descending<T>(items: &mut [T], priority: impl Fn(&T) -> Priority) {
	items.sort_by_key(|item| Reverse(priority(item)));
}
