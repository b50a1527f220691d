//! Registry configuration.
//!
//! ```toml
//! discover = true
//! null_probability = 0.3
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::generator::{self, DEFAULT_NULL_PROBABILITY};

/// Settings applied when a [`Generators`](crate::Generators) registry seeds
/// itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorsConfig {
	/// Load generators and extractors submitted through plugin discovery.
	pub discover: bool,
	/// Null probability given to every discovered generator that keeps one.
	pub null_probability: f32,
}

impl Default for GeneratorsConfig {
	fn default() -> Self {
		Self {
			discover: true,
			null_probability: DEFAULT_NULL_PROBABILITY,
		}
	}
}

impl GeneratorsConfig {
	/// Configuration that registers nothing automatically.
	pub fn without_discovery() -> Self {
		Self {
			discover: false,
			..Self::default()
		}
	}

	pub fn with_null_probability(mut self, probability: f32) -> Self {
		self.null_probability = probability;
		self
	}

	/// Parses and validates a TOML document.
	pub fn from_toml_str(input: &str) -> Result<Self> {
		let config: Self = toml::from_str(input).map_err(|e| Error::InvalidConfig {
			reason: e.to_string(),
		})?;
		config.validate()?;
		Ok(config)
	}

	/// Renders the configuration as a TOML document.
	pub fn to_toml_string(&self) -> Result<String> {
		toml::to_string(self).map_err(|e| Error::InvalidConfig {
			reason: e.to_string(),
		})
	}

	pub fn validate(&self) -> Result<()> {
		generator::validate(self.null_probability).map(drop)
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn test_defaults() {
		let config = GeneratorsConfig::default();
		assert!(config.discover);
		assert_eq!(config.null_probability, 0.3);
		assert_eq!(GeneratorsConfig::from_toml_str("").unwrap(), config);
	}

	#[test]
	fn test_parse_overrides() {
		let config = GeneratorsConfig::from_toml_str("discover = false\nnull_probability = 0.5\n").unwrap();
		assert_eq!(
			config,
			GeneratorsConfig {
				discover: false,
				null_probability: 0.5,
			}
		);
	}

	/// A rendered configuration parses back unchanged.
	#[test]
	fn test_rendered_config_parses_back() {
		let config = GeneratorsConfig::without_discovery().with_null_probability(0.5);
		let rendered = config.to_toml_string().unwrap();
		assert!(rendered.contains("discover = false"), "{rendered}");
		assert_eq!(GeneratorsConfig::from_toml_str(&rendered).unwrap(), config);
	}

	#[test]
	fn test_rejects_unknown_keys() {
		assert!(matches!(
			GeneratorsConfig::from_toml_str("nullable = true"),
			Err(Error::InvalidConfig { .. })
		));
		assert!(matches!(
			GeneratorsConfig::from_toml_str("null_probability = \"high\""),
			Err(Error::InvalidConfig { .. })
		));
	}

	#[rstest::rstest]
	#[case("0.0", true)]
	#[case("1.0", true)]
	#[case("0.75", true)]
	#[case("1.5", false)]
	#[case("-0.25", false)]
	fn test_probability_bounds(#[case] probability: &str, #[case] accepted: bool) {
		let parsed = GeneratorsConfig::from_toml_str(&format!("null_probability = {probability}"));
		assert_eq!(parsed.is_ok(), accepted, "{probability}");
		if !accepted {
			assert!(matches!(parsed, Err(Error::InvalidProbability(_))));
		}
	}
}
