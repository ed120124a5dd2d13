//! Numeric value generators.
//!
//! Both generators add a fixed bias of 100 so fixture values usually sit
//! away from zero. The integer bias wraps on overflow, so values near
//! `i32::MAX` come out negative.

use fixture_core::GeneratedValue;
use rand::Rng;

/// Bias added to every generated number.
pub const NUMERIC_BIAS: i32 = 100;

/// Generate a uniformly random `i32` plus [`NUMERIC_BIAS`], wrapping.
pub fn generate_biased_int<R: Rng>(rng: &mut R) -> GeneratedValue {
    GeneratedValue::Int32(rng.gen::<i32>().wrapping_add(NUMERIC_BIAS))
}

/// Generate a uniformly random fraction in `[0, 1)` plus [`NUMERIC_BIAS`].
pub fn generate_biased_double<R: Rng>(rng: &mut R) -> GeneratedValue {
    GeneratedValue::Float64(rng.gen::<f64>() + f64::from(NUMERIC_BIAS))
}
