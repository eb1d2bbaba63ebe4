//! Charts must actually render to non-trivial PNG files.

use onsvac_core::prelude::*;
use onsvac_plot::{forecast_chart, monthly_panels, PlotError};
use std::fs;
use tempfile::TempDir;

/// Nine years of synthetic monthly observations, 2015..=2023.
fn observations() -> Vec<Observation> {
    let mut obs = Vec::new();
    for year in 2015..=2023 {
        for (i, month) in Month::ALL.iter().enumerate() {
            let value = 700.0
                + (year - 2015) as f64 * 10.0
                + 30.0 * (i as f64 * std::f64::consts::PI / 6.0).sin();
            obs.push(Observation {
                period: Period::new(year, *month),
                value,
                release: None,
                vintage: "latest".to_string(),
            });
        }
    }
    obs
}

#[test]
fn monthly_panels_render_a_png() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("monthly_vacancies.png");

    monthly_panels(&observations(), &path).unwrap();

    let len = fs::metadata(&path).unwrap().len();
    assert!(len > 1_000, "suspiciously small PNG: {len} bytes");
}

#[test]
fn forecast_chart_renders_a_png() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("forecasting_plot.png");

    let series = MonthlySeries::from_observations(&observations()).unwrap();
    let mut model = HoltWinters::new(0.3, 0.1, 0.2, 12, Seasonal::Additive).unwrap();
    model.fit(series.values()).unwrap();
    let band = ForecastBand::from_residuals(
        model.predict(24).unwrap(),
        model.residuals(),
        0.95,
    );

    forecast_chart(&series, &band, &path).unwrap();

    let len = fs::metadata(&path).unwrap().len();
    assert!(len > 1_000, "suspiciously small PNG: {len} bytes");
}

#[test]
fn empty_input_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.png");
    let err = monthly_panels(&[], &path).unwrap_err();
    assert!(matches!(err, PlotError::InvalidData(_)));
    assert!(!path.exists());
}
