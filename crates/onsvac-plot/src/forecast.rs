//! The history-plus-forecast chart.

use crate::error::{PlotError, Result};
use onsvac_core::confidence::ForecastBand;
use onsvac_core::series::{MonthlySeries, Period};
use plotters::prelude::*;
use std::path::Path;

const WIDTH: u32 = 1200;
const HEIGHT: u32 = 800;

/// Render the historical series and a forecast continuation to a
/// 1200×800 PNG: history as a solid line, forecast dashed, with the
/// confidence band shaded behind it.
pub fn forecast_chart(
    series: &MonthlySeries,
    band: &ForecastBand,
    output_path: &Path,
) -> Result<()> {
    if series.is_empty() {
        return Err(PlotError::InvalidData("history is empty".to_string()));
    }
    if band.horizon() == 0 {
        return Err(PlotError::InvalidData("forecast is empty".to_string()));
    }

    let n = series.len();
    let total = n + band.horizon();

    // X is the month offset from the series start; the label formatter
    // maps offsets back to `YYYY MON`.
    let history: Vec<(f64, f64)> = series
        .values()
        .iter()
        .enumerate()
        .map(|(i, &v)| (i as f64, v))
        .collect();
    let forecast: Vec<(f64, f64)> = band
        .forecast
        .iter()
        .enumerate()
        .map(|(h, &v)| ((n + h) as f64, v))
        .collect();

    let y_min = series
        .values()
        .iter()
        .chain(&band.lower)
        .cloned()
        .fold(f64::INFINITY, f64::min);
    let y_max = series
        .values()
        .iter()
        .chain(&band.upper)
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max);
    let pad = (y_max - y_min).max(1.0) * 0.05;

    let start = series.start();
    let root = BitMapBackend::new(output_path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Holt-Winters Forecast of Monthly Vacancies",
            ("sans-serif", 32),
        )
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..(total - 1) as f64, (y_min - pad)..(y_max + pad))
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Vacancies (thousands)")
        .x_label_formatter(&|x| period_label(start, *x))
        .label_style(("sans-serif", 16))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    // Confidence band behind the lines.
    let band_polygon: Vec<(f64, f64)> = forecast
        .iter()
        .map(|&(x, _)| x)
        .zip(band.upper.iter().cloned())
        .chain(
            forecast
                .iter()
                .rev()
                .map(|&(x, _)| x)
                .zip(band.lower.iter().rev().cloned()),
        )
        .collect();
    chart
        .draw_series(std::iter::once(Polygon::new(band_polygon, &RED.mix(0.15))))
        .map_err(|e| PlotError::Drawing(e.to_string()))?
        .label(format!("{:.0}% interval", band.level * 100.0))
        .legend(|(x, y)| Rectangle::new([(x, y - 4), (x + 16, y + 4)], RED.mix(0.15).filled()));

    chart
        .draw_series(LineSeries::new(history.iter().cloned(), &BLUE))
        .map_err(|e| PlotError::Drawing(e.to_string()))?
        .label("Historical Data")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], BLUE));

    chart
        .draw_series(DashedLineSeries::new(
            forecast.iter().cloned(),
            6,
            4,
            RED.stroke_width(2),
        ))
        .map_err(|e| PlotError::Drawing(e.to_string()))?
        .label("Forecast (2 Years Ahead)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], RED));

    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .background_style(&WHITE.mix(0.8))
        .position(SeriesLabelPosition::UpperLeft)
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    Ok(())
}

/// Axis label for the month `offset` months after `start`.
fn period_label(start: Period, offset: f64) -> String {
    let mut period = start;
    for _ in 0..offset.round().max(0.0) as usize {
        period = period.succ();
    }
    period.to_string()
}
