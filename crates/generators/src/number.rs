//! Integer and floating point generators bounded by [`NumberParameters`].
//!
//! Bounds are `f64` so one parameters type serves every width, with exact
//! integer bounds alongside when a constraint supplied them. Integers round
//! the bounds inwards (`min` up, `max` down) and clip them to the width, so
//! the default unbounded parameters cover the full range while bounds
//! entirely outside the width are rejected. Floats keep strict sign bounds
//! strict after narrowing to the target width. Defaults are zero, moved to
//! the nearest bound when zero is out of range.

use std::fmt::Debug;
use std::marker::PhantomData;

use fixgen_core::error::Error;
use fixgen_core::params::{NumberGenerationParameters, NumberParameters};
use fixgen_core::{Generators, Parametrized, ParametrizedGenerator, Priority, Result, Type, Value};
use rand::Rng;
use rand::distributions::uniform::SampleUniform;

/// Primitive integer types the [`IntegerGenerator`] can produce.
pub trait Integer: Copy + PartialOrd + Debug + SampleUniform + Send + Sync + 'static {
	const ZERO: Self;
	const LOWEST: f64;
	const HIGHEST: f64;

	/// Converts an integral `f64`, saturating at the type's limits.
	fn saturating_from(value: f64) -> Self;

	/// `None` when `value` is outside the type's range.
	fn from_exact(value: i128) -> Option<Self>;
}

/// Primitive floating point types the [`FloatGenerator`] can produce.
pub trait Float: Copy + Debug + Send + Sync + 'static {
	const LOWEST: f64;
	const HIGHEST: f64;
	/// Smallest positive normal value.
	const MIN_POSITIVE: f64;

	/// Rounds to the nearest representable value.
	fn from_f64(value: f64) -> Self;
	fn to_f64(self) -> f64;
	fn step_up(self) -> Self;
	fn step_down(self) -> Self;
}

fn checked_bounds(ty: &Type, params: &NumberGenerationParameters) -> Result<(f64, f64)> {
	let (min, max) = (params.min(), params.max());
	if min.is_nan() || max.is_nan() || min > max {
		return Err(Error::invalid_parameters(format!(
			"no {ty} value between {min} and {max}"
		)));
	}
	Ok((min, max))
}

fn unsatisfiable(ty: &Type, lo: impl Debug, hi: impl Debug) -> Error {
	Error::invalid_parameters(format!("no {ty} value between {lo:?} and {hi:?}"))
}

/// Narrows `value` to `T`, stepping back inside `[lo, hi]` when rounding
/// left it outside.
fn narrow<T: Float>(value: f64, lo: f64, hi: f64) -> Option<T> {
	let mut narrowed = T::from_f64(value);
	if narrowed.to_f64() < lo {
		narrowed = narrowed.step_up();
	} else if narrowed.to_f64() > hi {
		narrowed = narrowed.step_down();
	}
	(lo..=hi).contains(&narrowed.to_f64()).then_some(narrowed)
}

fn clamp<T: PartialOrd>(value: T, lo: T, hi: T) -> T {
	if value < lo {
		lo
	} else if value > hi {
		hi
	} else {
		value
	}
}

/// Generator for one integer width.
pub struct IntegerGenerator<T>(PhantomData<fn() -> T>);

impl<T: Integer> IntegerGenerator<T> {
	pub const fn new() -> Self {
		Self(PhantomData)
	}

	fn range(ty: &Type, params: &NumberGenerationParameters) -> Result<(T, T)> {
		let (min, max) = checked_bounds(ty, params)?;
		let (lo, hi) = (min.ceil(), max.floor());
		if lo > hi || lo > T::HIGHEST || hi < T::LOWEST {
			return Err(unsatisfiable(ty, min, max));
		}
		let (mut lo, mut hi) = (T::saturating_from(lo), T::saturating_from(hi));

		if let Some(exact) = params.integer_min() {
			match T::from_exact(exact) {
				Some(exact) if exact > lo => lo = exact,
				Some(_) => {}
				None if exact > 0 => return Err(unsatisfiable(ty, exact, hi)),
				None => {}
			}
		}
		if let Some(exact) = params.integer_max() {
			match T::from_exact(exact) {
				Some(exact) if exact < hi => hi = exact,
				Some(_) => {}
				None if exact < 0 => return Err(unsatisfiable(ty, lo, exact)),
				None => {}
			}
		}
		if lo > hi {
			return Err(unsatisfiable(ty, lo, hi));
		}
		Ok((lo, hi))
	}
}

impl<T: Integer> Default for IntegerGenerator<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T: Integer> ParametrizedGenerator for IntegerGenerator<T> {
	type Params = NumberGenerationParameters;

	fn priority(&self) -> Priority {
		Priority::NATIVE_GENERATORS
	}

	fn supports(&self, ty: &Type) -> bool {
		ty.is_raw::<T>()
	}

	fn default_value(&self, ty: &Type, params: &NumberGenerationParameters, _: &Generators) -> Result<Value> {
		let (lo, hi) = Self::range(ty, params)?;
		Ok(Box::new(clamp(T::ZERO, lo, hi)))
	}

	fn random_value(&self, ty: &Type, params: &NumberGenerationParameters, _: &Generators) -> Result<Value> {
		let (lo, hi) = Self::range(ty, params)?;
		Ok(Box::new(rand::thread_rng().gen_range(lo..=hi)))
	}
}

/// Generator for one floating point width. Random values are finite.
pub struct FloatGenerator<T>(PhantomData<fn() -> T>);

impl<T: Float> FloatGenerator<T> {
	pub const fn new() -> Self {
		Self(PhantomData)
	}

	fn range(ty: &Type, params: &NumberGenerationParameters) -> Result<(f64, f64)> {
		checked_bounds(ty, params)?;
		let mut lo = params.float_min().max(T::LOWEST);
		let mut hi = params.float_max().min(T::HIGHEST);
		if lo > 0.0 {
			lo = lo.max(T::MIN_POSITIVE);
		}
		if hi < 0.0 {
			hi = hi.min(-T::MIN_POSITIVE);
		}
		if lo > hi {
			return Err(unsatisfiable(ty, params.float_min(), params.float_max()));
		}
		Ok((lo, hi))
	}

	fn value_in(ty: &Type, value: f64, (lo, hi): (f64, f64)) -> Result<Value> {
		let value = narrow::<T>(clamp(value, lo, hi), lo, hi).ok_or_else(|| unsatisfiable(ty, lo, hi))?;
		Ok(Box::new(value))
	}
}

impl<T: Float> Default for FloatGenerator<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T: Float> ParametrizedGenerator for FloatGenerator<T> {
	type Params = NumberGenerationParameters;

	fn priority(&self) -> Priority {
		Priority::NATIVE_GENERATORS
	}

	fn supports(&self, ty: &Type) -> bool {
		ty.is_raw::<T>()
	}

	fn default_value(&self, ty: &Type, params: &NumberGenerationParameters, _: &Generators) -> Result<Value> {
		Self::value_in(ty, 0.0, Self::range(ty, params)?)
	}

	fn random_value(&self, ty: &Type, params: &NumberGenerationParameters, _: &Generators) -> Result<Value> {
		let (lo, hi) = Self::range(ty, params)?;
		let u: f64 = rand::thread_rng().r#gen();
		// Interpolating keeps each term finite even across the full range.
		Self::value_in(ty, lo * (1.0 - u) + hi * u, (lo, hi))
	}
}

macro_rules! integers {
	($($ty:ty => $name:literal),+ $(,)?) => {
		$(
			impl Integer for $ty {
				const ZERO: Self = 0;
				const LOWEST: f64 = <$ty>::MIN as f64;
				const HIGHEST: f64 = <$ty>::MAX as f64;

				fn saturating_from(value: f64) -> Self {
					value as $ty
				}

				fn from_exact(value: i128) -> Option<Self> {
					<$ty>::try_from(value).ok()
				}
			}

			fixgen_core::submit_generator!($name, Parametrized::new(IntegerGenerator::<$ty>::new()));
		)+
	};
}

integers!(
	i8 => "fixgen::i8",
	i16 => "fixgen::i16",
	i32 => "fixgen::i32",
	i64 => "fixgen::i64",
	i128 => "fixgen::i128",
	isize => "fixgen::isize",
	u8 => "fixgen::u8",
	u16 => "fixgen::u16",
	u32 => "fixgen::u32",
	u64 => "fixgen::u64",
	u128 => "fixgen::u128",
	usize => "fixgen::usize",
);

impl Float for f32 {
	const LOWEST: f64 = f32::MIN as f64;
	const HIGHEST: f64 = f32::MAX as f64;
	const MIN_POSITIVE: f64 = f32::MIN_POSITIVE as f64;

	fn from_f64(value: f64) -> Self {
		value as f32
	}

	fn to_f64(self) -> f64 {
		f64::from(self)
	}

	fn step_up(self) -> Self {
		self.next_up()
	}

	fn step_down(self) -> Self {
		self.next_down()
	}
}

impl Float for f64 {
	const LOWEST: f64 = f64::MIN;
	const HIGHEST: f64 = f64::MAX;
	const MIN_POSITIVE: f64 = f64::MIN_POSITIVE;

	fn from_f64(value: f64) -> Self {
		value
	}

	fn to_f64(self) -> f64 {
		self
	}

	fn step_up(self) -> Self {
		self.next_up()
	}

	fn step_down(self) -> Self {
		self.next_down()
	}
}

fixgen_core::submit_generator!("fixgen::f32", Parametrized::new(FloatGenerator::<f32>::new()));
fixgen_core::submit_generator!("fixgen::f64", Parametrized::new(FloatGenerator::<f64>::new()));

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn test_integer_bounds_round_inwards() {
		let ty = Type::of::<i32>();
		let params = NumberGenerationParameters::new().with_min(-2.5).with_max(7.9);
		assert_eq!(IntegerGenerator::<i32>::range(&ty, &params).unwrap(), (-2, 7));

		let params = NumberGenerationParameters::new().with_min(f64::MIN_POSITIVE);
		assert_eq!(IntegerGenerator::<u8>::range(&ty, &params).unwrap(), (1, u8::MAX));
	}

	#[test]
	fn test_unbounded_parameters_cover_the_width() {
		let ty = Type::of::<i64>();
		let params = NumberGenerationParameters::new();
		assert_eq!(IntegerGenerator::<i64>::range(&ty, &params).unwrap(), (i64::MIN, i64::MAX));
		assert_eq!(IntegerGenerator::<u128>::range(&ty, &params).unwrap(), (0, u128::MAX));
		assert_eq!(FloatGenerator::<f32>::range(&ty, &params).unwrap(), (f32::MIN as f64, f32::MAX as f64));
	}

	/// Bounds with no integer between them are rejected.
	#[test]
	fn test_empty_integer_range() {
		let ty = Type::of::<i32>();
		let params = NumberGenerationParameters::new().with_min(0.2).with_max(0.8);
		assert!(matches!(
			IntegerGenerator::<i32>::range(&ty, &params),
			Err(Error::InvalidParameters { .. })
		));
		let params = NumberGenerationParameters::new().with_min(300.0);
		assert!(IntegerGenerator::<u8>::range(&ty, &params).is_err());
	}

	/// Exact integer bounds win over their rounded `f64` shadows.
	#[test]
	fn test_exact_integer_bounds() {
		let ty = Type::of::<i64>();
		let above = (1_i128 << 53) + 1;
		let params = NumberGenerationParameters::new().with_integer_min(above);
		assert_eq!(params.min(), (1_u64 << 53) as f64);
		assert_eq!(IntegerGenerator::<i64>::range(&ty, &params).unwrap(), (above as i64, i64::MAX));
		assert_eq!(IntegerGenerator::<u64>::range(&ty, &params).unwrap(), (above as u64, u64::MAX));

		let params = params.with_integer_max(above);
		assert_eq!(IntegerGenerator::<i64>::range(&ty, &params).unwrap(), (above as i64, above as i64));
		assert!(IntegerGenerator::<i32>::range(&ty, &params).is_err());
		assert!(params.float_min() >= above as f64);
	}

	/// A strictly positive or negative bound stays strict in `f32`.
	#[test]
	fn test_strict_sign_bounds_survive_narrowing() {
		let generators = Generators::with_config(fixgen_core::GeneratorsConfig::without_discovery());
		let ty = Type::of::<f32>();
		let positive = NumberGenerationParameters::new().with_min(f64::MIN_POSITIVE);
		assert_eq!(
			FloatGenerator::<f32>::range(&ty, &positive).unwrap().0,
			f64::from(f32::MIN_POSITIVE)
		);
		let value = FloatGenerator::<f32>::new()
			.default_value(&ty, &positive, &generators)
			.unwrap();
		assert!(fixgen_core::downcast::<f32>(value).unwrap() > 0.0);

		let negative = NumberGenerationParameters::new().with_max(-f64::MIN_POSITIVE);
		for _ in 0..100 {
			let value = FloatGenerator::<f32>::new()
				.random_value(&ty, &negative, &generators)
				.unwrap();
			assert!(fixgen_core::downcast::<f32>(value).unwrap() < 0.0);
		}
	}

	#[test]
	fn test_narrowing_stays_within_bounds() {
		assert!(narrow::<f32>(0.1, 0.1, 1.0).is_some_and(|value| f64::from(value) >= 0.1));
		assert!(narrow::<f32>(0.1, 0.0, 0.1).is_some_and(|value| f64::from(value) <= 0.1));
		// No `f32` lies exactly on 0.1.
		assert_eq!(narrow::<f32>(0.1, 0.1, 0.1), None);
	}

	#[test]
	fn test_inverted_bounds() {
		let ty = Type::of::<f64>();
		let params = NumberGenerationParameters::new().with_min(1.0).with_max(-1.0);
		assert!(FloatGenerator::<f64>::range(&ty, &params).is_err());
	}

	#[test]
	fn test_defaults_move_into_range() {
		let generators = Generators::with_config(fixgen_core::GeneratorsConfig::without_discovery());
		let ty = Type::of::<i16>();
		let params = NumberGenerationParameters::new().with_min(5.0);
		let value = IntegerGenerator::<i16>::new()
			.default_value(&ty, &params, &generators)
			.unwrap();
		assert_eq!(fixgen_core::downcast::<i16>(value).unwrap(), 5);

		let ty = Type::of::<f64>();
		let params = NumberGenerationParameters::new().with_max(-0.5);
		let value = FloatGenerator::<f64>::new()
			.default_value(&ty, &params, &generators)
			.unwrap();
		assert_eq!(fixgen_core::downcast::<f64>(value).unwrap(), -0.5);
	}
}
