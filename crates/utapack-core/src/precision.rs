//! Fixed three-decimal precision used for every millisecond value.
//!
//! OTO tables store timings as decimal text. All values that pass through the
//! codec or the composer are snapped to three decimal places so that a table
//! written by this crate parses back to exactly the same numbers.

/// Number of decimal places kept for timing values.
pub const DECIMALS: usize = 3;

/// Rounds a value to three decimal places.
///
/// Rounding is performed on the exact binary value with ties going to even,
/// which is what `format!("{:.3}")` does. Negative zero becomes positive zero.
///
/// # Example
/// ```
/// use utapack_core::precision::canonical;
///
/// assert_eq!(canonical(12.34567), 12.346);
/// assert_eq!(canonical(-0.0).to_bits(), 0.0f64.to_bits());
/// ```
pub fn canonical(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let text = format!("{:.*}", DECIMALS, value);
    // Formatting a finite f64 always yields a parseable decimal.
    let snapped: f64 = text.parse().unwrap_or(value);
    snapped + 0.0
}

/// Formats a value with exactly three decimal places.
pub fn format_fixed(value: f64) -> String {
    format!("{:.*}", DECIMALS, canonical(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_rounds_to_three_places() {
        assert_eq!(canonical(1.0), 1.0);
        assert_eq!(canonical(1.0004), 1.0);
        assert_eq!(canonical(1.0006), 1.001);
        assert_eq!(canonical(-25.12345), -25.123);
    }

    #[test]
    fn test_canonical_is_idempotent() {
        for value in [0.1, 2.675, 1234.5678, -99.9995, 1e-7] {
            let once = canonical(value);
            assert_eq!(canonical(once), once);
        }
    }

    #[test]
    fn test_negative_zero_is_normalized() {
        assert_eq!(format_fixed(-0.0), "0.000");
        assert_eq!(format_fixed(-0.0001), "0.000");
    }

    #[test]
    fn test_format_fixed() {
        assert_eq!(format_fixed(100.0), "100.000");
        assert_eq!(format_fixed(-50.5), "-50.500");
        assert_eq!(format_fixed(0.12349), "0.123");
    }
}
