//! Numeric helpers shared by extractors

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Largest value, `None` for an empty slice
pub fn max_value(values: &[f64]) -> Option<f64> {
    values.iter().cloned().reduce(f64::max)
}

/// Fold a histogram onto `period` bins by summing bins `i`, `i + period`, ...
pub fn wrap_histogram(histogram: &[f64], period: usize) -> Vec<f64> {
    let mut wrapped = vec![0.0; period];
    if period == 0 {
        return wrapped;
    }
    for (i, &v) in histogram.iter().enumerate() {
        wrapped[i % period] += v;
    }
    wrapped
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), Some(3.0));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_max_value() {
        assert_eq!(max_value(&[0.2, 0.7, 0.1]), Some(0.7));
        assert_eq!(max_value(&[]), None);
    }

    #[test]
    fn test_wrap_histogram() {
        let histogram = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(wrap_histogram(&histogram, 2), vec![9.0, 6.0]);
        assert!(wrap_histogram(&histogram, 0).is_empty());
    }

    proptest! {
        #[test]
        fn wrapping_preserves_total(values in prop::collection::vec(0.0f64..10.0, 0..64), period in 1usize..16) {
            let total: f64 = values.iter().sum();
            let wrapped: f64 = wrap_histogram(&values, period).iter().sum();
            prop_assert!((total - wrapped).abs() < 1e-9);
        }

        #[test]
        fn max_bounds_every_value(values in prop::collection::vec(-100.0f64..100.0, 1..32)) {
            let max = max_value(&values).unwrap();
            prop_assert!(values.iter().all(|&v| v <= max));
            prop_assert!(values.contains(&max));
        }
    }
}
