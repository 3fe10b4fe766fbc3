//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Round a f64 half away from zero to two decimal places, returning 0.0 for non-finite values.
///
/// Values too large to scale are already whole and come back unchanged.
#[must_use]
pub fn round_to_hundredths(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let hundredths = value * 100.0;
    if !hundredths.is_finite() {
        return value;
    }
    let scaled = hundredths.round() / 100.0;
    // Avoid rendering "-0.00" for tiny negative inputs.
    if scaled == 0.0 { 0.0 } else { scaled }
}

/// Round a f64 and clamp it to the i64 range, returning 0 for non-finite values.
#[must_use]
pub fn round_f64_to_i64(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    let min = cast::<i64, f64>(i64::MIN).unwrap_or(f64::MIN);
    let max = cast::<i64, f64>(i64::MAX).unwrap_or(f64::MAX);
    // i64::MAX is not representable as f64; the nearest float lies above it.
    if value >= max {
        return i64::MAX;
    }
    let clamped = value.max(min).round();
    cast::<f64, i64>(clamped).unwrap_or(0)
}

/// Convert i64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn i64_to_f64(value: i64) -> f64 {
    cast::<i64, f64>(value).unwrap_or(0.0)
}

/// Convert a collection length to f64 for averaging.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Safe ratio that yields 0.0 when the denominator is zero.
#[must_use]
pub fn ratio(numerator: f64, denominator: u32) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator / f64::from(denominator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hundredths_round_half_away_from_zero() {
        assert!((round_to_hundredths(2.5) - 2.5).abs() < f64::EPSILON);
        assert!((round_to_hundredths(10.333_333) - 10.33).abs() < f64::EPSILON);
        assert!((round_to_hundredths(2.675_1) - 2.68).abs() < f64::EPSILON);
        assert!((round_to_hundredths(f64::NAN) - 0.0).abs() < f64::EPSILON);
        assert!(round_to_hundredths(-0.001).is_sign_positive());
    }

    #[test]
    fn hundredths_keep_values_too_large_to_scale() {
        assert_eq!(round_to_hundredths(1e307).to_bits(), 1e307_f64.to_bits());
        assert_eq!(round_to_hundredths(-f64::MAX).to_bits(), (-f64::MAX).to_bits());
    }

    #[test]
    fn rounders_cover_ranges() {
        assert_eq!(round_f64_to_i64(1.6), 2);
        assert_eq!(round_f64_to_i64(-1.5), -2);
        assert_eq!(round_f64_to_i64(f64::NAN), 0);
        assert_eq!(round_f64_to_i64(f64::MAX), i64::MAX);
    }

    #[test]
    fn ratio_handles_zero_denominator() {
        assert!((ratio(5.0, 0) - 0.0).abs() < f64::EPSILON);
        assert!((ratio(5.0, 2) - 2.5).abs() < f64::EPSILON);
        assert!((usize_to_f64(3) - 3.0).abs() < f64::EPSILON);
        assert!((i64_to_f64(-4) + 4.0).abs() < f64::EPSILON);
    }
}
