//! Numeric helpers shared by the measurement and aggregation code.

/// Round to one decimal place (0.1 mm / 0.1°)
#[must_use]
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Arithmetic mean of the values produced by `field` over `records`.
/// Returns `None` for an empty slice.
#[allow(clippy::cast_precision_loss)] // record counts are far below 2^52
pub fn mean_of<T>(records: &[T], field: impl Fn(&T) -> f64) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    Some(records.iter().map(field).sum::<f64>() / records.len() as f64)
}

/// `round(len / capacity * 100)`, clamped to `0..=100`
#[must_use]
#[allow(clippy::cast_precision_loss)] // buffer sizes are small
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to 0..=100 first
pub fn percent(len: usize, capacity: usize) -> u8 {
    if capacity == 0 {
        return 100;
    }
    let value = (len as f64 / capacity as f64 * 100.0).round();
    value.clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_tenth() {
        assert_eq!(round_tenth(31.449), 31.4);
        assert_eq!(round_tenth(31.46), 31.5);
        assert_eq!(round_tenth(-2.04), -2.0);
        assert_eq!(round_tenth(170.0), 170.0);
    }

    #[test]
    fn test_mean_of() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(mean_of(&data, |v| *v), Some(3.0));
        assert_eq!(mean_of::<f64>(&[], |v| *v), None);
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(0, 90), 0);
        assert_eq!(percent(1, 90), 1);
        assert_eq!(percent(45, 90), 50);
        assert_eq!(percent(89, 90), 99);
        assert_eq!(percent(90, 90), 100);
        assert_eq!(percent(120, 90), 100);
        assert_eq!(percent(3, 0), 100);
    }
}
