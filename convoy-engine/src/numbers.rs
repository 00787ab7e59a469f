//! Numeric conversion helpers centralizing safe numeric casts.
//!
//! Every statistic formula finishes with exactly one rounding step; these
//! helpers own that step so the formulas stay free of `as` casts.

use num_traits::cast::cast;

/// Round a f64 half away from zero and clamp it to the u32 range.
/// Non-finite and negative values collapse to 0.
#[must_use]
pub fn round_f64_to_u32(value: f64) -> u32 {
    if value.is_nan() {
        return 0;
    }
    let max = cast::<u32, f64>(u32::MAX).unwrap_or(f64::MAX);
    let clamped = value.round().clamp(0.0, max);
    cast::<f64, u32>(clamped).unwrap_or(0)
}

/// Ceil a f64 and clamp it to the u32 range, returning 0 for non-finite values.
#[must_use]
pub fn ceil_f64_to_u32(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    let max = cast::<u32, f64>(u32::MAX).unwrap_or(f64::MAX);
    let clamped = value.ceil().clamp(0.0, max);
    cast::<f64, u32>(clamped).unwrap_or(0)
}

/// Convert a count into f64 while allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Round to a fixed number of decimal places (used for reported ratios).
#[must_use]
pub fn round_to_places(value: f64, places: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(round_f64_to_u32(12.5), 13);
        assert_eq!(round_f64_to_u32(12.49), 12);
        assert_eq!(round_f64_to_u32(-3.0), 0);
        assert_eq!(round_f64_to_u32(f64::NAN), 0);
        assert_eq!(round_f64_to_u32(f64::INFINITY), u32::MAX);
    }

    #[test]
    fn ceil_handles_non_finite() {
        assert_eq!(ceil_f64_to_u32(1.2), 2);
        assert_eq!(ceil_f64_to_u32(f64::NAN), 0);
        assert_eq!(ceil_f64_to_u32(f64::INFINITY), 0);
        assert_eq!(ceil_f64_to_u32(-0.5), 0);
    }

    #[test]
    fn decimal_rounding_keeps_two_places() {
        assert!((round_to_places(1.23456, 2) - 1.23).abs() < 1e-9);
        assert!((round_to_places(0.125, 2) - 0.13).abs() < 1e-9);
    }
}
