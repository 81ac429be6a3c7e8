//! Dimension snapping.
//!
//! CAD converters hand back noisy floats (2.4999963"); manufacturing wants
//! friendly fractional-inch dimensions. Every physical dimension passes
//! through `snap_inches` after unit conversion. The tolerances are
//! business-tuned constants.

/// Snap grid: nearest 1/16".
pub const SNAP_GRID_IN: f64 = 1.0 / 16.0;

/// A 1/16"-rounded value this close to a whole number becomes the whole
/// number.
pub const WHOLE_EPSILON_IN: f64 = 0.01;

/// An original value this close to a preferred fraction uses that fraction.
pub const FRACTION_EPSILON_IN: f64 = 0.005;

/// Preferred fractional increments, checked in this order.
pub const PREFERRED_FRACTIONS_IN: [f64; 3] = [1.0 / 8.0, 1.0 / 4.0, 1.0 / 2.0];

/// Snap a dimension in inches to a manufacturable fraction.
///
/// Rounds to the nearest 1/16", prefers whole numbers within
/// [`WHOLE_EPSILON_IN`], then 1/8", 1/4", 1/2" increments of the original
/// value within [`FRACTION_EPSILON_IN`]. Idempotent: snapping a snapped
/// value returns it unchanged.
pub fn snap_inches(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }

    let sixteenth = (value / SNAP_GRID_IN).round() * SNAP_GRID_IN;

    let whole = sixteenth.round();
    if (sixteenth - whole).abs() <= WHOLE_EPSILON_IN {
        return whole;
    }

    for increment in PREFERRED_FRACTIONS_IN {
        let snapped = (value / increment).round() * increment;
        if (value - snapped).abs() <= FRACTION_EPSILON_IN {
            return snapped;
        }
    }

    sixteenth
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noisy_whole_number() {
        assert_eq!(snap_inches(2.4999963), 2.5);
        assert_eq!(snap_inches(6.001), 6.0);
        assert_eq!(snap_inches(5.9982), 6.0);
    }

    #[test]
    fn test_sixteenth_rounding() {
        assert_eq!(snap_inches(1.313), 1.3125); // 1 5/16
        assert_eq!(snap_inches(0.0624), 0.0625);
    }

    #[test]
    fn test_preferred_fractions() {
        assert_eq!(snap_inches(1.2505), 1.25);
        assert_eq!(snap_inches(3.3751), 3.375); // 3 3/8
        assert_eq!(snap_inches(0.4996), 0.5);
    }

    #[test]
    fn test_idempotent() {
        for v in [0.0625, 0.125, 0.25, 0.5, 1.3125, 2.5, 6.0, 10.875] {
            assert_eq!(snap_inches(v), v);
            assert_eq!(snap_inches(snap_inches(v)), snap_inches(v));
        }
        // And for arbitrary noisy inputs.
        for v in [2.4999963, 1.313, 7.5551] {
            let once = snap_inches(v);
            assert_eq!(snap_inches(once), once);
        }
    }

    #[test]
    fn test_non_finite_collapses_to_zero() {
        assert_eq!(snap_inches(f64::NAN), 0.0);
        assert_eq!(snap_inches(f64::INFINITY), 0.0);
    }
}
