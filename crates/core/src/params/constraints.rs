//! Validation-style constraint sources.
//!
//! These are plain [`Source`] values. Built-in extractors translate them into
//! parameter values; see [`super::extractors`].

use super::Source;

/// The value must not be null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NotNull;

/// Inclusive size bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
	pub min: usize,
	pub max: usize,
}

impl Size {
	pub const fn new(min: usize, max: usize) -> Self {
		Self { min, max }
	}

	pub const fn at_least(min: usize) -> Self {
		Self::new(min, usize::MAX)
	}

	pub const fn at_most(max: usize) -> Self {
		Self::new(0, max)
	}
}

impl Default for Size {
	fn default() -> Self {
		Self::new(0, usize::MAX)
	}
}

/// Inclusive lower numeric bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Min(pub i64);

/// Inclusive upper numeric bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Max(pub i64);

/// Strictly greater than zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Positive;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PositiveOrZero;

/// Strictly less than zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Negative;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NegativeOrZero;

impl Source for NotNull {}
impl Source for Size {}
impl Source for Min {}
impl Source for Max {}
impl Source for Positive {}
impl Source for PositiveOrZero {}
impl Source for Negative {}
impl Source for NegativeOrZero {}
