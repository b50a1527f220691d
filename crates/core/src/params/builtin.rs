//! Parameters types used by the built-in generators.

use super::{
	DEFAULT_NULLABLE, DescribeParameters, GenericsParameters, KeyValueGenericParameters,
	NumberParameters, Parameters, ParametersType, SimpleGenericParameters, SizeParameters,
};
use crate::types::{Type, TypeDeclaration};

macro_rules! nullable_parameters {
	($ty:ty) => {
		impl Parameters for $ty {
			fn is_nullable(&self) -> bool {
				self.nullable
			}

			fn set_nullable(&mut self, nullable: bool) {
				self.nullable = nullable;
			}

			fn parameters_type(&self) -> ParametersType {
				<$ty as DescribeParameters>::describe()
			}
		}
	};
}

macro_rules! size_parameters {
	($ty:ty) => {
		impl SizeParameters for $ty {
			fn min_size(&self) -> usize {
				self.min_size
			}

			fn set_min_size(&mut self, min: usize) {
				self.min_size = min;
			}

			fn max_size(&self) -> usize {
				self.max_size
			}

			fn set_max_size(&mut self, max: usize) {
				self.max_size = max;
			}
		}
	};
}

/// Parameters with only the `nullable` flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationParameters {
	nullable: bool,
}

impl GenerationParameters {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_nullable(mut self, nullable: bool) -> Self {
		self.nullable = nullable;
		self
	}
}

impl Default for GenerationParameters {
	fn default() -> Self {
		Self {
			nullable: DEFAULT_NULLABLE,
		}
	}
}

nullable_parameters!(GenerationParameters);
crate::parameters!(GenerationParameters);

/// Numeric bounds, unbounded by default.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberGenerationParameters {
	nullable: bool,
	min: f64,
	max: f64,
	integer_min: Option<i128>,
	integer_max: Option<i128>,
}

impl NumberGenerationParameters {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_nullable(mut self, nullable: bool) -> Self {
		self.nullable = nullable;
		self
	}

	pub fn with_min(mut self, min: f64) -> Self {
		self.min = min;
		self
	}

	pub fn with_max(mut self, max: f64) -> Self {
		self.max = max;
		self
	}

	/// Exact integer lower bound; the `f64` minimum is raised to match.
	pub fn with_integer_min(mut self, min: i128) -> Self {
		self.integer_min = Some(min);
		self.min = self.min.max(f64_at_most(min));
		self
	}

	/// Exact integer upper bound; the `f64` maximum is lowered to match.
	pub fn with_integer_max(mut self, max: i128) -> Self {
		self.integer_max = Some(max);
		self.max = self.max.min(f64_at_least(max));
		self
	}

	/// Lower bound for floating point values, tightened by the exact integer
	/// bound.
	pub fn float_min(&self) -> f64 {
		match self.integer_min {
			Some(exact) => self.min.max(f64_at_least(exact)),
			None => self.min,
		}
	}

	pub fn float_max(&self) -> f64 {
		match self.integer_max {
			Some(exact) => self.max.min(f64_at_most(exact)),
			None => self.max,
		}
	}
}

impl Default for NumberGenerationParameters {
	fn default() -> Self {
		Self {
			nullable: DEFAULT_NULLABLE,
			min: f64::NEG_INFINITY,
			max: f64::INFINITY,
			integer_min: None,
			integer_max: None,
		}
	}
}

impl NumberParameters for NumberGenerationParameters {
	fn min(&self) -> f64 {
		self.min
	}

	fn set_min(&mut self, min: f64) {
		self.min = min;
	}

	fn max(&self) -> f64 {
		self.max
	}

	fn set_max(&mut self, max: f64) {
		self.max = max;
	}

	fn integer_min(&self) -> Option<i128> {
		self.integer_min
	}

	fn set_integer_min(&mut self, min: i128) {
		self.integer_min = Some(min);
	}

	fn integer_max(&self) -> Option<i128> {
		self.integer_max
	}

	fn set_integer_max(&mut self, max: i128) {
		self.integer_max = Some(max);
	}
}

/// Smallest `f64` that is not below `value`.
pub(crate) fn f64_at_least(value: i128) -> f64 {
	let rounded = value as f64;
	if (rounded as i128) < value {
		rounded.next_up()
	} else {
		rounded
	}
}

/// Largest `f64` that is not above `value`.
pub(crate) fn f64_at_most(value: i128) -> f64 {
	let rounded = value as f64;
	// 2^127 saturates back to i128::MAX, hiding that it rounded up.
	if rounded == i128::MAX as f64 || (rounded as i128) > value {
		rounded.next_down()
	} else {
		rounded
	}
}

nullable_parameters!(NumberGenerationParameters);
crate::parameters!(NumberGenerationParameters: NumberParameters);

/// Size bounds for generated strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringGenerationParameters {
	nullable: bool,
	min_size: usize,
	max_size: usize,
}

impl StringGenerationParameters {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_nullable(mut self, nullable: bool) -> Self {
		self.nullable = nullable;
		self
	}

	pub fn with_sizes(mut self, min: usize, max: usize) -> Self {
		self.min_size = min;
		self.max_size = max;
		self
	}
}

impl Default for StringGenerationParameters {
	fn default() -> Self {
		Self {
			nullable: DEFAULT_NULLABLE,
			min_size: 0,
			max_size: usize::MAX,
		}
	}
}

nullable_parameters!(StringGenerationParameters);
size_parameters!(StringGenerationParameters);
crate::parameters!(StringGenerationParameters: SizeParameters);

/// Element type and size bounds for list-like and set-like containers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionGenerationParameters {
	nullable: bool,
	element_type: Option<Type>,
	min_size: usize,
	max_size: usize,
}

impl CollectionGenerationParameters {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_nullable(mut self, nullable: bool) -> Self {
		self.nullable = nullable;
		self
	}

	pub fn with_element_type(mut self, ty: Type) -> Self {
		self.element_type = Some(ty);
		self
	}

	pub fn with_sizes(mut self, min: usize, max: usize) -> Self {
		self.min_size = min;
		self.max_size = max;
		self
	}
}

impl Default for CollectionGenerationParameters {
	fn default() -> Self {
		Self {
			nullable: DEFAULT_NULLABLE,
			element_type: None,
			min_size: 0,
			max_size: usize::MAX,
		}
	}
}

impl SimpleGenericParameters for CollectionGenerationParameters {
	fn element_type(&self) -> Option<&Type> {
		self.element_type.as_ref()
	}

	fn set_element_type(&mut self, ty: Type) {
		self.element_type = Some(ty);
	}
}

nullable_parameters!(CollectionGenerationParameters);
size_parameters!(CollectionGenerationParameters);
crate::parameters!(CollectionGenerationParameters: SimpleGenericParameters, SizeParameters);

/// Key type, value type and size bounds for maps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapGenerationParameters {
	nullable: bool,
	keys_type: Option<Type>,
	values_type: Option<Type>,
	min_size: usize,
	max_size: usize,
}

impl MapGenerationParameters {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_nullable(mut self, nullable: bool) -> Self {
		self.nullable = nullable;
		self
	}

	pub fn with_types(mut self, keys: Type, values: Type) -> Self {
		self.keys_type = Some(keys);
		self.values_type = Some(values);
		self
	}

	pub fn with_sizes(mut self, min: usize, max: usize) -> Self {
		self.min_size = min;
		self.max_size = max;
		self
	}
}

impl Default for MapGenerationParameters {
	fn default() -> Self {
		Self {
			nullable: DEFAULT_NULLABLE,
			keys_type: None,
			values_type: None,
			min_size: 0,
			max_size: usize::MAX,
		}
	}
}

impl KeyValueGenericParameters for MapGenerationParameters {
	fn keys_type(&self) -> Option<&Type> {
		self.keys_type.as_ref()
	}

	fn set_keys_type(&mut self, ty: Type) {
		self.keys_type = Some(ty);
	}

	fn values_type(&self) -> Option<&Type> {
		self.values_type.as_ref()
	}

	fn set_values_type(&mut self, ty: Type) {
		self.values_type = Some(ty);
	}
}

nullable_parameters!(MapGenerationParameters);
size_parameters!(MapGenerationParameters);
crate::parameters!(MapGenerationParameters: KeyValueGenericParameters, SizeParameters);

/// Full declaration of an arbitrary generic type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericsGenerationParameters {
	nullable: bool,
	declaration: Option<TypeDeclaration>,
}

impl GenericsGenerationParameters {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_declaration(mut self, declaration: TypeDeclaration) -> Self {
		self.declaration = Some(declaration);
		self
	}
}

impl Default for GenericsGenerationParameters {
	fn default() -> Self {
		Self {
			nullable: DEFAULT_NULLABLE,
			declaration: None,
		}
	}
}

impl GenericsParameters for GenericsGenerationParameters {
	fn type_declaration(&self) -> Option<&TypeDeclaration> {
		self.declaration.as_ref()
	}

	fn set_type_declaration(&mut self, declaration: TypeDeclaration) {
		self.declaration = Some(declaration);
	}
}

nullable_parameters!(GenericsGenerationParameters);
crate::parameters!(GenericsGenerationParameters: GenericsParameters);
