use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;

use super::*;
use crate::generator::{NullProbability, Parametrized, ParametrizedGenerator};
use crate::params::GenerationParameters;
use crate::params::constraints::NotNull;
use crate::priority::Priority;

#[derive(Debug, Clone, PartialEq)]
struct Widget(&'static str);

crate::declare_concrete!(Widget);

struct Missing;

crate::declare_concrete!(Missing);

/// Widget generator that counts how often it is asked for support.
struct Labelled {
	label: &'static str,
	priority: i32,
	probes: AtomicUsize,
}

impl Labelled {
	fn new(label: &'static str, priority: i32) -> Arc<Self> {
		Arc::new(Self {
			label,
			priority,
			probes: AtomicUsize::new(0),
		})
	}

	fn probes(&self) -> usize {
		self.probes.load(Ordering::Relaxed)
	}
}

impl Generator for Labelled {
	fn name(&self) -> &str {
		self.label
	}

	fn priority(&self) -> Priority {
		Priority(self.priority)
	}

	fn supports(&self, ty: &Type) -> bool {
		self.probes.fetch_add(1, Ordering::Relaxed);
		ty.is_raw::<Widget>()
	}

	fn default_value(&self, _: &Type, _: &Generators) -> Result<Value> {
		Ok(Box::new(Widget(self.label)))
	}

	fn random_value(&self, _: &Type, _: &Generators) -> Result<Value> {
		Ok(Box::new(Widget(self.label)))
	}
}

struct Stamped;

impl ParametrizedGenerator for Stamped {
	type Params = GenerationParameters;

	fn priority(&self) -> Priority {
		Priority(100)
	}

	fn supports(&self, ty: &Type) -> bool {
		ty.is_raw::<Widget>()
	}

	fn default_value(&self, _: &Type, _: &GenerationParameters, _: &Generators) -> Result<Value> {
		Ok(Box::new(Widget("stamped")))
	}

	fn random_value(&self, _: &Type, _: &GenerationParameters, _: &Generators) -> Result<Value> {
		Ok(Box::new(Widget("stamped")))
	}
}

fn empty() -> Generators {
	Generators::with_config(GeneratorsConfig::without_discovery())
}

fn erased(generator: Arc<Labelled>) -> Arc<dyn Generator> {
	generator
}

#[test]
fn test_highest_priority_wins() {
	let generators = empty();
	let low = Labelled::new("low", 0);
	let high = Labelled::new("high", 10);
	generators.register([erased(low.clone()), erased(high.clone())]);

	assert_eq!(generators.random::<Widget>().unwrap(), Widget("high"));

	generators.unregister(&[erased(high)]);
	assert_eq!(generators.random::<Widget>().unwrap(), Widget("low"));
}

/// Equal priorities keep registration order.
#[test]
fn test_ties_keep_registration_order() {
	let generators = empty();
	generators.register([erased(Labelled::new("first", 5))]);
	generators.register([erased(Labelled::new("second", 5))]);
	assert_eq!(generators.default::<Widget>().unwrap(), Widget("first"));

	let names: Vec<_> = generators.registered().iter().map(|g| g.name().to_owned()).collect();
	assert_eq!(names, ["first", "second"]);
}

/// Repeated lookups are served from the cache; mutations drop it.
#[test]
fn test_lookup_cache() {
	let generators = empty();
	let widget = Labelled::new("widget", 0);
	generators.register([erased(widget.clone())]);

	let ty = Type::of::<Widget>();
	for _ in 0..10 {
		assert!(generators.supports(&ty));
	}
	assert_eq!(widget.probes(), 1);
	assert_eq!(generators.cached_lookups(), 1);

	generators.register([erased(Labelled::new("other", -1))]);
	assert_eq!(generators.cached_lookups(), 0);
	assert!(generators.supports(&ty));
	assert_eq!(widget.probes(), 2);
}

/// Misses are cached too, and a registration that covers the type is seen.
#[test]
fn test_missing_generator() {
	let generators = empty();
	let ty = Type::of::<Missing>();
	assert!(!generators.supports(&ty));
	assert!(matches!(
		generators.get_generator(&ty),
		Err(Error::GeneratorNotFound { ref ty }) if ty == "Missing"
	));
	assert!(matches!(generators.random::<Missing>(), Err(Error::GeneratorNotFound { .. })));
	assert_eq!(generators.cached_lookups(), 1);

	generators.register([erased(Labelled::new("widget", 0))]);
	assert!(!generators.supports(&ty));
	assert!(generators.supports(&Type::of::<Widget>()));
}

#[test]
fn test_reset_without_discovery_empties() {
	let generators = empty();
	generators.register([erased(Labelled::new("widget", 0))]);
	assert_eq!(generators.registered().len(), 1);
	generators.reset();
	assert!(generators.registered().is_empty());
	assert!(!generators.supports(&Type::of::<Widget>()));
}

#[test]
fn test_reset_reseeds_discovered_generators() {
	let generators = Generators::new();
	let discovered = generators.registered().len();
	generators.register([erased(Labelled::new("widget", 0))]);
	assert_eq!(generators.registered().len(), discovered + 1);
	generators.reset();
	assert_eq!(generators.registered().len(), discovered);
}

#[test]
fn test_configured_null_probability_reaches_discovered_generators() {
	let generators = Generators::with_config(GeneratorsConfig::default().with_null_probability(0.0));
	let probabilities: Vec<f32> = generators
		.registered()
		.iter()
		.filter_map(|g| g.null_probability().map(NullProbability::get))
		.collect();
	assert!(!probabilities.is_empty());
	assert!(probabilities.iter().all(|p| *p == 0.0));
}

/// An out-of-range configured probability is logged and ignored.
#[test]
fn test_invalid_configured_probability_is_ignored() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
	let generators = Generators::with_config(GeneratorsConfig::default().with_null_probability(4.0));
	assert!(
		generators
			.registered()
			.iter()
			.filter_map(|g| g.null_probability())
			.all(|p| p.get() == crate::DEFAULT_NULL_PROBABILITY)
	);
}

#[test]
fn test_sources_require_a_parametrizable_generator() {
	let generators = empty();
	generators.register([erased(Labelled::new("widget", 0))]);
	let err = generators.random_with::<Widget>(&[&NotNull]).unwrap_err();
	assert!(matches!(err, Error::UnsupportedParameters { ref generator } if generator == "widget"));
	assert_eq!(generators.random_with::<Widget>(&[]).unwrap(), Widget("widget"));
}

#[test]
fn test_sources_reach_parametrizable_generators() {
	let generators = Generators::new();
	generators.register([Arc::new(Parametrized::new(Stamped)) as Arc<dyn Generator>]);
	for _ in 0..200 {
		let value = generators.nullable_random_with::<Option<Widget>>(&[&NotNull]).unwrap();
		assert_eq!(value, Some(Widget("stamped")));
	}
}

/// The typed facade finishes values into the requested representation.
#[test]
fn test_typed_facade_wraps_options() {
	let generators = empty();
	generators.register([erased(Labelled::new("widget", 0))]);

	assert_eq!(generators.default::<Option<Widget>>().unwrap(), Some(Widget("widget")));
	assert_eq!(generators.nullable_default::<Option<Widget>>().unwrap(), None);
	assert_eq!(generators.nullable_default::<Widget>().unwrap(), Widget("widget"));

	let ty = Type::declare::<Option<Widget>>();
	assert!(generators.nullable_default_value(&ty).unwrap().is_none());
	let raw = generators.random_value(&ty).unwrap();
	assert_eq!(crate::types::downcast::<Widget>(raw).unwrap(), Widget("widget"));
}

/// Concurrent registrations are never lost and readers keep working.
#[test]
fn test_concurrent_registration() {
	const LABELS: [&str; 8] = ["a", "b", "c", "d", "e", "f", "g", "h"];
	let generators = empty();
	generators.register([erased(Labelled::new("base", 0))]);

	std::thread::scope(|scope| {
		for label in LABELS {
			let generators = &generators;
			scope.spawn(move || generators.register([erased(Labelled::new(label, 1))]));
		}
		for _ in 0..4 {
			let generators = &generators;
			scope.spawn(move || {
				for _ in 0..200 {
					assert!(generators.random::<Widget>().is_ok());
				}
			});
		}
	});

	assert_eq!(generators.registered().len(), LABELS.len() + 1);
	let winner = generators.random::<Widget>().unwrap();
	assert!(LABELS.contains(&winner.0));
}
