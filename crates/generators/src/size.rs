use std::ops::RangeInclusive;

use fixgen_core::Result;
use fixgen_core::error::Error;
use fixgen_core::params::SizeParameters;
use rand::Rng;

/// Sizes to draw from: the requested bounds narrowed to `[floor, ceiling]`
/// where they overlap it. Requested bounds always win over the defaults, so
/// `min = 50` with a ceiling of 40 yields exactly 50.
pub(crate) fn size_range(
	params: &dyn SizeParameters,
	floor: usize,
	ceiling: usize,
) -> Result<RangeInclusive<usize>> {
	let (min, max) = (params.min_size(), params.max_size());
	if min > max {
		return Err(Error::invalid_parameters(format!(
			"minimum size {min} exceeds maximum size {max}"
		)));
	}
	let lo = floor.max(min).min(max);
	let hi = ceiling.min(max).max(lo);
	Ok(lo..=hi)
}

pub(crate) fn random_size(params: &dyn SizeParameters, floor: usize, ceiling: usize) -> Result<usize> {
	let range = size_range(params, floor, ceiling)?;
	Ok(rand::thread_rng().gen_range(range))
}

#[cfg(test)]
mod tests {
	use fixgen_core::params::StringGenerationParameters;
	use pretty_assertions::assert_eq;

	use super::*;

	#[rstest::rstest]
	#[case(0, usize::MAX, 1..=40)]
	#[case(2, 8, 2..=8)]
	#[case(0, 0, 0..=0)]
	#[case(50, usize::MAX, 50..=50)]
	#[case(0, 3, 1..=3)]
	#[case(30, 60, 30..=40)]
	fn test_size_range(#[case] min: usize, #[case] max: usize, #[case] expected: RangeInclusive<usize>) {
		let params = StringGenerationParameters::new().with_sizes(min, max);
		assert_eq!(size_range(&params, 1, 40).unwrap(), expected);
	}

	#[test]
	fn test_inverted_bounds_are_rejected() {
		let params = StringGenerationParameters::new().with_sizes(5, 4);
		assert!(matches!(size_range(&params, 1, 40), Err(Error::InvalidParameters { .. })));
	}
}
