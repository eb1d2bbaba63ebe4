//! Forecasting algorithms.
//!
//! The pipeline's baseline forecast is Holt–Winters triple exponential
//! smoothing; the simpler single and double variants are kept for
//! comparison runs and as fallbacks for short series.

pub mod smoothing;

/// Common interface for the forecasting models.
pub trait Predictor {
    /// Fit the model to historical data, oldest first.
    fn fit(&mut self, data: &[f64]) -> crate::Result<()>;

    /// Forecast the next `steps` values after the fitted sample.
    fn predict(&self, steps: usize) -> crate::Result<Vec<f64>>;

    /// Whether `fit` has completed successfully.
    fn is_fitted(&self) -> bool;
}
