//! Trailing window averages
//!
//! Contains the two averages used by the moving-average forecasts:
//! - Simple mean of a window
//! - Linearly weighted mean (oldest weight 1, newest weight `n`)

use crate::{MathError, Result};

/// The last `size` values of `values`, or all of them when fewer exist
pub fn trailing_window(values: &[f64], size: usize) -> &[f64] {
    &values[values.len().saturating_sub(size)..]
}

/// Arithmetic mean of a window
pub fn simple_mean(window: &[f64]) -> Result<f64> {
    if window.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot average an empty window".to_string(),
        ));
    }

    Ok(window.iter().sum::<f64>() / window.len() as f64)
}

/// Weighted mean with weights `1..=n`, so the most recent value weighs most
pub fn weighted_mean(window: &[f64]) -> Result<f64> {
    if window.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot average an empty window".to_string(),
        ));
    }

    let (weighted_sum, weight_sum) = window
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(sum, weights), (i, &value)| {
            let weight = (i + 1) as f64;
            (sum + weight * value, weights + weight)
        });

    Ok(weighted_sum / weight_sum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_window() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        assert_eq!(trailing_window(&values, 6), &[3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        assert_eq!(trailing_window(&values[..3], 6), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_simple_mean() {
        assert!((simple_mean(&[10.0, 20.0, 30.0]).unwrap() - 20.0).abs() < 1e-12);
        assert!(simple_mean(&[]).is_err());
    }

    #[test]
    fn test_weighted_mean_favours_recent() {
        // (1*10 + 2*20 + 3*30) / 6
        let wma = weighted_mean(&[10.0, 20.0, 30.0]).unwrap();
        assert!((wma - 140.0 / 6.0).abs() < 1e-12);
        assert!(wma > simple_mean(&[10.0, 20.0, 30.0]).unwrap());
    }
}
