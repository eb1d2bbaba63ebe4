//! Confidence bands for point forecasts.

use serde::{Deserialize, Serialize};

/// A point forecast with lower/upper confidence bounds.
///
/// Bounds come from the standard deviation of the model's in-sample
/// one-step residuals, widened with the square root of the horizon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastBand {
    pub forecast: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    /// Confidence level, e.g. 0.95.
    pub level: f64,
}

/// Approximate two-sided z-score for the common confidence levels.
fn z_score(level: f64) -> f64 {
    match level {
        x if x >= 0.99 => 2.576,
        x if x >= 0.95 => 1.96,
        x if x >= 0.90 => 1.645,
        x if x >= 0.80 => 1.282,
        _ => 1.96,
    }
}

impl ForecastBand {
    /// Build a band around `forecast` from fit residuals.
    pub fn from_residuals(forecast: Vec<f64>, residuals: &[f64], level: f64) -> ForecastBand {
        let n = residuals.len() as f64;
        let sd = if residuals.is_empty() {
            0.0
        } else {
            let mean = residuals.iter().sum::<f64>() / n;
            (residuals.iter().map(|r| (r - mean) * (r - mean)).sum::<f64>() / n).sqrt()
        };

        let z = z_score(level);
        let mut lower = Vec::with_capacity(forecast.len());
        let mut upper = Vec::with_capacity(forecast.len());
        for (h, &point) in forecast.iter().enumerate() {
            let margin = z * sd * ((h + 1) as f64).sqrt();
            lower.push(point - margin);
            upper.push(point + margin);
        }

        ForecastBand {
            forecast,
            lower,
            upper,
            level,
        }
    }

    /// Number of forecast steps.
    pub fn horizon(&self) -> usize {
        self.forecast.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_brackets_the_forecast() {
        let band = ForecastBand::from_residuals(
            vec![10.0, 11.0, 12.0],
            &[0.5, -0.4, 0.3, -0.2, 0.6, -0.5],
            0.95,
        );
        assert_eq!(band.horizon(), 3);
        for ((l, f), u) in band.lower.iter().zip(&band.forecast).zip(&band.upper) {
            assert!(l < f && f < u);
        }
    }

    #[test]
    fn band_widens_with_horizon() {
        let band = ForecastBand::from_residuals(
            vec![10.0; 4],
            &[1.0, -1.0, 0.5, -0.5, 0.8, -0.8],
            0.95,
        );
        let widths: Vec<f64> = band
            .upper
            .iter()
            .zip(&band.lower)
            .map(|(u, l)| u - l)
            .collect();
        assert!(widths[1] > widths[0]);
        assert!(widths[3] > widths[2]);
    }

    #[test]
    fn zero_residuals_collapse_the_band() {
        let band = ForecastBand::from_residuals(vec![5.0, 6.0], &[], 0.95);
        assert_eq!(band.lower, band.forecast);
        assert_eq!(band.upper, band.forecast);
    }
}
