use std::any::type_name;

use super::{Generator, NullProbability, ParametrizableGenerator};
use crate::error::{Error, Result};
use crate::params::{DescribeParameters, Parameters, ParametersType};
use crate::priority::Priority;
use crate::registry::Generators;
use crate::types::{Type, Value};

/// Typed authoring interface for parameter-aware generators.
///
/// Wrap an implementation in [`Parametrized`] to register it. The wrapper
/// supplies parameters (empty ones when the caller gives no sources), applies
/// the nullable policy and checks support before delegating here.
pub trait ParametrizedGenerator: Send + Sync + 'static {
	type Params: DescribeParameters;

	fn priority(&self) -> Priority {
		Priority::DEFAULT
	}

	fn supports(&self, ty: &Type) -> bool;

	fn default_value(&self, ty: &Type, params: &Self::Params, generators: &Generators) -> Result<Value>;

	fn random_value(&self, ty: &Type, params: &Self::Params, generators: &Generators) -> Result<Value>;

	/// Random value whose nested components may be null.
	///
	/// Used for nullable requests that did not roll null. Containers override
	/// it to generate nullable elements.
	fn random_value_with_nulls(
		&self,
		ty: &Type,
		params: &Self::Params,
		generators: &Generators,
	) -> Result<Value> {
		self.random_value(ty, params, generators)
	}
}

/// Adapts a [`ParametrizedGenerator`] to the registry contract.
///
/// A nullable call yields null only when the parameters allow it *and* the
/// requested type can hold it, and then with this instance's null
/// probability.
pub struct Parametrized<G> {
	inner: G,
	nulls: NullProbability,
}

impl<G: ParametrizedGenerator> Parametrized<G> {
	pub fn new(inner: G) -> Self {
		Self {
			inner,
			nulls: NullProbability::default(),
		}
	}

	pub fn inner(&self) -> &G {
		&self.inner
	}

	fn typed<'a>(&self, params: &'a dyn Parameters) -> Result<&'a G::Params> {
		params.downcast_ref::<G::Params>().ok_or_else(|| {
			Error::invalid_parameters(format!(
				"{} expects {} parameters, got {}",
				self.name(),
				G::Params::describe(),
				params.parameters_type()
			))
		})
	}

	fn rolls_null(&self, ty: &Type, params: &G::Params) -> bool {
		params.is_nullable() && ty.is_nullable() && self.nulls.roll()
	}

	fn empty_parameters(&self, ty: &Type, generators: &Generators) -> Result<Box<dyn Parameters>> {
		generators.parameters_for(&G::Params::describe(), ty, &[])
	}
}

impl<G: ParametrizedGenerator> Generator for Parametrized<G> {
	fn name(&self) -> &str {
		type_name::<G>()
	}

	fn priority(&self) -> Priority {
		self.inner.priority()
	}

	fn supports(&self, ty: &Type) -> bool {
		self.inner.supports(ty)
	}

	fn default_value(&self, ty: &Type, generators: &Generators) -> Result<Value> {
		let params = self.empty_parameters(ty, generators)?;
		self.default_value_with(ty, &*params, generators)
	}

	fn nullable_default_value(&self, ty: &Type, generators: &Generators) -> Result<Option<Value>> {
		let params = self.empty_parameters(ty, generators)?;
		self.nullable_default_value_with(ty, &*params, generators)
	}

	fn random_value(&self, ty: &Type, generators: &Generators) -> Result<Value> {
		let params = self.empty_parameters(ty, generators)?;
		self.random_value_with(ty, &*params, generators)
	}

	fn nullable_random_value(&self, ty: &Type, generators: &Generators) -> Result<Option<Value>> {
		let params = self.empty_parameters(ty, generators)?;
		self.nullable_random_value_with(ty, &*params, generators)
	}

	fn null_probability(&self) -> Option<&NullProbability> {
		Some(&self.nulls)
	}

	fn as_parametrizable(&self) -> Option<&dyn ParametrizableGenerator> {
		Some(self)
	}
}

impl<G: ParametrizedGenerator> ParametrizableGenerator for Parametrized<G> {
	fn parameters_type(&self) -> ParametersType {
		G::Params::describe()
	}

	fn default_value_with(
		&self,
		ty: &Type,
		params: &dyn Parameters,
		generators: &Generators,
	) -> Result<Value> {
		self.assert_supported(ty)?;
		self.inner.default_value(ty, self.typed(params)?, generators)
	}

	/// Null when the parameters and the type allow it, since null is the
	/// default of every nullable type.
	fn nullable_default_value_with(
		&self,
		ty: &Type,
		params: &dyn Parameters,
		generators: &Generators,
	) -> Result<Option<Value>> {
		self.assert_supported(ty)?;
		let params = self.typed(params)?;
		if params.is_nullable() && ty.is_nullable() {
			Ok(None)
		} else {
			self.inner.default_value(ty, params, generators).map(Some)
		}
	}

	fn random_value_with(
		&self,
		ty: &Type,
		params: &dyn Parameters,
		generators: &Generators,
	) -> Result<Value> {
		self.assert_supported(ty)?;
		self.inner.random_value(ty, self.typed(params)?, generators)
	}

	fn nullable_random_value_with(
		&self,
		ty: &Type,
		params: &dyn Parameters,
		generators: &Generators,
	) -> Result<Option<Value>> {
		self.assert_supported(ty)?;
		let params = self.typed(params)?;
		if self.rolls_null(ty, params) {
			Ok(None)
		} else {
			self.inner
				.random_value_with_nulls(ty, params, generators)
				.map(Some)
		}
	}
}
