//! Shared clamping, quantising and summary statistics.
//!
//! Every score, activation, adjustment and probability produced by the core
//! passes through these helpers so the unit-interval invariants hold in one
//! place rather than at each call site. `NaN` is treated as the lower bound.

/// Clamp a value into `[0.0, 1.0]`.
pub fn clamp_unit(value: f64) -> f64 {
    clamp_range(value, 0.0, 1.0)
}

/// Clamp a value into `[min, max]`. `NaN` maps to `min`.
pub fn clamp_range(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.max(min).min(max)
}

/// Quantise a unit value into one of `buckets` equal-width buckets.
///
/// The value is clamped first, so the result is always in `0..buckets`.
/// A value of exactly `1.0` lands in the last bucket.
pub fn quantize(value: f64, buckets: u8) -> u8 {
    if buckets == 0 {
        return 0;
    }
    let width = 1.0 / f64::from(buckets);
    let index = (clamp_unit(value) / width).floor() as u8;
    index.min(buckets - 1)
}

/// Arithmetic mean; `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance; `0.0` for an empty slice.
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}
