//! Generation targeted at a declared member, such as a struct field.
//!
//! A [`Member`] pairs a declaration site with its [`Type`]. A
//! [`ConstraintSource`] reports the validation constraints attached to that
//! site for a set of [`Group`]s. [`TargetedGenerator`] resolves the member's
//! generator once and merges `[declaration, constraints...]` into parameters
//! on every call.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::generator::Generator;
use crate::params::Source;
use crate::registry::{Generators, Mode};
use crate::types::{Declare, Type, TypeKey, Value, downcast};

/// A constraint group. Constraints outside the requested groups are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Group(&'static str);

impl Group {
	/// Group used when none is requested.
	pub const DEFAULT: Self = Self("default");

	pub const fn new(name: &'static str) -> Self {
		Self(name)
	}

	pub fn name(&self) -> &'static str {
		self.0
	}
}

/// A typed declaration site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Member {
	owner: TypeKey,
	name: Cow<'static, str>,
	ty: Type,
}

impl Member {
	pub fn new(owner: TypeKey, name: impl Into<Cow<'static, str>>, ty: Type) -> Self {
		Self {
			owner,
			name: name.into(),
			ty,
		}
	}

	/// Member `name` of type `T` declared on `O`.
	pub fn of<O: Any, T: Declare>(name: impl Into<Cow<'static, str>>) -> Self {
		Self::new(TypeKey::of::<O>(), name, T::declare())
	}

	pub fn owner(&self) -> TypeKey {
		self.owner
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn ty(&self) -> &Type {
		&self.ty
	}
}

impl fmt::Display for Member {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}::{}: {}", self.owner, self.name, self.ty)
	}
}

/// Reports the constraints declared on a member.
pub trait ConstraintSource: Send + Sync {
	/// Constraints of `member` active in any of `groups`. An empty `groups`
	/// means [`Group::DEFAULT`].
	fn constraints(&self, member: &Member, groups: &[Group]) -> Vec<Arc<dyn Source>>;
}

/// A member with no constraints.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoConstraints;

impl ConstraintSource for NoConstraints {
	fn constraints(&self, _member: &Member, _groups: &[Group]) -> Vec<Arc<dyn Source>> {
		Vec::new()
	}
}

struct Declared {
	owner: TypeKey,
	member: Cow<'static, str>,
	group: Group,
	constraint: Arc<dyn Source>,
}

/// In-memory constraint declarations, kept in insertion order.
#[derive(Default)]
pub struct ConstraintTable {
	declared: Vec<Declared>,
}

impl ConstraintTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Declares `constraint` on `owner::member` in the default group.
	pub fn with(
		self,
		owner: TypeKey,
		member: impl Into<Cow<'static, str>>,
		constraint: impl Source,
	) -> Self {
		self.with_group(owner, member, Group::DEFAULT, constraint)
	}

	pub fn with_group(
		mut self,
		owner: TypeKey,
		member: impl Into<Cow<'static, str>>,
		group: Group,
		constraint: impl Source,
	) -> Self {
		self.declared.push(Declared {
			owner,
			member: member.into(),
			group,
			constraint: Arc::new(constraint),
		});
		self
	}
}

impl ConstraintSource for ConstraintTable {
	fn constraints(&self, member: &Member, groups: &[Group]) -> Vec<Arc<dyn Source>> {
		let groups = if groups.is_empty() {
			&[Group::DEFAULT][..]
		} else {
			groups
		};
		self.declared
			.iter()
			.filter(|d| d.owner == member.owner && d.member == member.name && groups.contains(&d.group))
			.map(|d| d.constraint.clone())
			.collect()
	}
}

/// Generator bound to one member and its constraints.
pub struct TargetedGenerator {
	member: Member,
	generator: Arc<dyn Generator>,
	constraints: Arc<dyn ConstraintSource>,
}

impl TargetedGenerator {
	/// Binds `member` to the registry's generator for its type.
	pub fn targeting(
		generators: &Generators,
		member: Member,
		constraints: Arc<dyn ConstraintSource>,
	) -> Result<Self> {
		let generator = generators.get_generator(member.ty())?;
		Ok(Self {
			member,
			generator,
			constraints,
		})
	}

	/// Binds `member` to a specific generator.
	pub fn with_generator(
		member: Member,
		generator: Arc<dyn Generator>,
		constraints: Arc<dyn ConstraintSource>,
	) -> Result<Self> {
		generator.assert_supported(member.ty())?;
		Ok(Self {
			member,
			generator,
			constraints,
		})
	}

	pub fn member(&self) -> &Member {
		&self.member
	}

	pub fn generator(&self) -> &Arc<dyn Generator> {
		&self.generator
	}

	/// The member's declaration, when generic, followed by its constraints.
	pub fn parameter_sources(&self, groups: &[Group]) -> Vec<Arc<dyn Source>> {
		let mut sources: Vec<Arc<dyn Source>> = Vec::new();
		if let Some(declaration) = self.member.ty().declaration() {
			sources.push(Arc::new(declaration.clone()));
		}
		sources.extend(self.constraints.constraints(&self.member, groups));
		sources
	}

	fn generate(&self, generators: &Generators, groups: &[Group], mode: Mode) -> Result<Value> {
		let ty = self.member.ty();
		let produced = match self.generator.as_parametrizable() {
			Some(generator) => {
				let sources = self.parameter_sources(groups);
				let sources: Vec<&dyn Source> = sources.iter().map(|s| &**s).collect();
				let params = generators
					.extractors()
					.create_parameters(&generator.parameters_type(), &sources)?;
				mode.run_with(generator, ty, &*params, generators)?
			}
			None => {
				let constrained = !self.constraints.constraints(&self.member, groups).is_empty();
				if constrained {
					return Err(Error::UnsupportedParameters {
						generator: self.generator.name().to_owned(),
					});
				}
				mode.run(&*self.generator, ty, generators)?
			}
		};
		ty.finish(produced)
	}

	/// Default value in the member's representation.
	pub fn default_value(&self, generators: &Generators, groups: &[Group]) -> Result<Value> {
		self.generate(generators, groups, Mode::Default)
	}

	pub fn nullable_default_value(&self, generators: &Generators, groups: &[Group]) -> Result<Value> {
		self.generate(generators, groups, Mode::NullableDefault)
	}

	pub fn random_value(&self, generators: &Generators, groups: &[Group]) -> Result<Value> {
		self.generate(generators, groups, Mode::Random)
	}

	pub fn nullable_random_value(&self, generators: &Generators, groups: &[Group]) -> Result<Value> {
		self.generate(generators, groups, Mode::NullableRandom)
	}

	/// Typed form of [`Self::nullable_random_value`].
	pub fn nullable_random<T: Declare>(&self, generators: &Generators, groups: &[Group]) -> Result<T> {
		downcast(self.nullable_random_value(generators, groups)?)
	}

	pub fn random<T: Declare>(&self, generators: &Generators, groups: &[Group]) -> Result<T> {
		downcast(self.random_value(generators, groups)?)
	}
}

impl fmt::Debug for TargetedGenerator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TargetedGenerator")
			.field("member", &self.member)
			.field("generator", &self.generator.name())
			.finish()
	}
}

#[cfg(test)]
mod tests;
