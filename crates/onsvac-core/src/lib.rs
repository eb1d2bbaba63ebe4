//! # onsvac-core
//!
//! Series model and forecasting algorithms for the ONS vacancy pipeline.
//!
//! The crate owns the domain types — monthly periods, dated observations,
//! and the consolidated [`series::MonthlySeries`] — plus the exponential
//! smoothing family used for the baseline forecast:
//!
//! - **Single** exponential smoothing for level-only series
//! - **Holt** linear-trend smoothing
//! - **Holt–Winters** triple smoothing, the pipeline's forecasting model
//!
//! ## Example
//!
//! ```rust
//! use onsvac_core::prelude::*;
//!
//! let data: Vec<f64> = (0..48)
//!     .map(|i| 700.0 + i as f64 + 30.0 * (i as f64 * std::f64::consts::PI / 6.0).sin())
//!     .collect();
//! let mut model = HoltWinters::new(0.3, 0.1, 0.2, 12, Seasonal::Additive).unwrap();
//! model.fit(&data).unwrap();
//! let forecast = model.predict(24).unwrap();
//! assert_eq!(forecast.len(), 24);
//! ```

pub mod algorithms;
pub mod confidence;
pub mod metrics;
pub mod seasonality;
pub mod series;
mod error;

pub use error::{CoreError, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algorithms::smoothing::{
        HoltLinear, HoltWinters, Seasonal, SingleExponential,
    };
    pub use crate::algorithms::Predictor;
    pub use crate::confidence::ForecastBand;
    pub use crate::error::{CoreError, Result};
    pub use crate::series::{Month, MonthlySeries, Observation, Period, ReleaseDate};
}
