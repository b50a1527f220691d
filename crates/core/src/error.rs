//! Error types shared by the registries and generators.

use crate::types::Type;

/// Boxed cause attached to [`Error::GenerationFailed`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while resolving generators or producing values.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// No registered generator supports the requested type.
	#[error("no generator supports values of type {ty}")]
	GeneratorNotFound { ty: String },

	/// A generator was invoked for a type it does not support.
	#[error("generator {generator} does not support values of type {ty}")]
	UnsupportedType { generator: String, ty: String },

	/// Parameter sources were given to a generator that takes no parameters.
	#[error("generator {generator} does not accept generation parameters")]
	UnsupportedParameters { generator: String },

	/// Parameters were of the wrong kind or held contradictory values.
	#[error("invalid generation parameters: {reason}")]
	InvalidParameters { reason: String },

	/// A parameters type cannot be instantiated empty.
	#[error("parameters type {parameters} has no zero-argument constructor")]
	MissingDefaultParameters { parameters: String },

	#[error("invalid type declaration: {reason}")]
	InvalidTypeDeclaration { reason: String },

	#[error("null probability {0} is outside [0, 1]")]
	InvalidProbability(f32),

	/// A discovered plugin could not be built.
	#[error("plugin {plugin} is misconfigured: {reason}")]
	Misconfigured { plugin: String, reason: String },

	#[error("invalid configuration: {reason}")]
	InvalidConfig { reason: String },

	/// A null value was produced for a type that cannot hold null.
	#[error("null produced for {ty}, which cannot hold null")]
	UnexpectedNull { ty: String },

	/// A generated value did not have the requested static type.
	#[error("generated value is not a {expected}")]
	TypeMismatch { expected: String },

	/// Construction of a value failed in the underlying generator.
	#[error("failed to generate a value of type {ty}")]
	GenerationFailed {
		ty: String,
		#[source]
		source: BoxError,
	},
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
	pub fn invalid_parameters(reason: impl Into<String>) -> Self {
		Self::InvalidParameters {
			reason: reason.into(),
		}
	}

	pub fn unsupported_type(generator: &str, ty: &Type) -> Self {
		Self::UnsupportedType {
			generator: generator.to_owned(),
			ty: ty.to_string(),
		}
	}

	/// Wraps a construction failure for `ty`.
	pub fn generation_failed(ty: &Type, source: impl Into<BoxError>) -> Self {
		Self::GenerationFailed {
			ty: ty.to_string(),
			source: source.into(),
		}
	}
}
