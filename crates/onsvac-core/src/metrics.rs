//! Forecast accuracy metrics.

use crate::error::{CoreError, Result};

fn check_lengths(predicted: &[f64], actual: &[f64]) -> Result<()> {
    if predicted.is_empty() || predicted.len() != actual.len() {
        return Err(CoreError::InsufficientData {
            required: actual.len().max(1),
            actual: predicted.len(),
        });
    }
    Ok(())
}

/// Mean squared error.
pub fn mse(predicted: &[f64], actual: &[f64]) -> Result<f64> {
    check_lengths(predicted, actual)?;
    let sum: f64 = predicted
        .iter()
        .zip(actual)
        .map(|(p, a)| (p - a) * (p - a))
        .sum();
    Ok(sum / predicted.len() as f64)
}

/// Mean absolute error.
pub fn mae(predicted: &[f64], actual: &[f64]) -> Result<f64> {
    check_lengths(predicted, actual)?;
    let sum: f64 = predicted.iter().zip(actual).map(|(p, a)| (p - a).abs()).sum();
    Ok(sum / predicted.len() as f64)
}

/// Mean absolute percentage error, in percent. Zero actuals are skipped.
pub fn mape(predicted: &[f64], actual: &[f64]) -> Result<f64> {
    check_lengths(predicted, actual)?;
    let mut sum = 0.0;
    let mut count = 0usize;
    for (p, a) in predicted.iter().zip(actual) {
        if a.abs() > f64::EPSILON {
            sum += ((p - a) / a).abs();
            count += 1;
        }
    }
    if count == 0 {
        return Err(CoreError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }
    Ok(sum / count as f64 * 100.0)
}
