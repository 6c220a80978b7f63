/// Rounds to two decimals, the precision distances are published at.
#[inline]
pub fn round2(val: f64) -> f64 {
    (val * 100.0).round() / 100.0
}

/// Signed percent offset of `target` from `reference`.
/// Returns None when the reference can't be divided by.
#[inline]
pub fn calculate_percent_diff(target: f64, reference: f64) -> Option<f64> {
    if reference == 0.0 || !reference.is_finite() || !target.is_finite() {
        return None;
    }
    Some((target - reference) / reference * 100.0)
}

#[inline]
pub fn remap(val: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    if (in_max - in_min).abs() <= f64::EPSILON {
        return out_min;
    }
    out_min + (val - in_min) * (out_max - out_min) / (in_max - in_min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round2_matches_two_decimal_publishing() {
        assert_eq!(round2(3.004_999), 3.0);
        assert_eq!(round2(-5.0), -5.0);
        assert_eq!(round2(1.236), 1.24);
    }

    #[test]
    fn percent_diff_guards_zero_reference() {
        assert_eq!(calculate_percent_diff(103.0, 0.0), None);
        assert_eq!(calculate_percent_diff(f64::NAN, 100.0), None);
        let d = calculate_percent_diff(95.0, 100.0).unwrap();
        assert!((d + 5.0).abs() < 1e-9);
    }

    #[test]
    fn remap_flat_input_range() {
        assert_eq!(remap(5.0, 1.0, 1.0, 0.0, 10.0), 0.0);
        assert_eq!(remap(5.0, 0.0, 10.0, 0.0, 100.0), 50.0);
    }
}
