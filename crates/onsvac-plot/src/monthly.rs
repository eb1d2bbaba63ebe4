//! The 4×3 monthly panel chart.
//!
//! One panel per calendar month, year on the x-axis, so the seasonal level
//! of each month can be compared across the whole history. Panels share
//! the y-range. Key events in the series are annotated on the rows where
//! they read best: the 2008 financial crisis, the 2020 COVID dip and the
//! 2021 recovery.

use crate::error::{PlotError, Result};
use onsvac_core::series::{Month, Observation};
use plotters::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;

const WIDTH: u32 = 1800;
const HEIGHT: u32 = 1200;

/// An annotation drawn on one panel.
struct EventNote {
    year: i32,
    label: &'static str,
    color: RGBColor,
}

/// Which event annotates which panel row (panels are laid out JAN..DEC,
/// three per row).
fn event_for_row(row: usize) -> Option<EventNote> {
    match row {
        0 => Some(EventNote {
            year: 2008,
            label: "Global Financial Crisis 2008",
            color: RGBColor(255, 140, 0),
        }),
        1 => Some(EventNote {
            year: 2020,
            label: "COVID dip",
            color: RED,
        }),
        2 => Some(EventNote {
            year: 2021,
            label: "Recovery 2021",
            color: RGBColor(0, 128, 0),
        }),
        _ => None,
    }
}

/// Render the monthly panel grid to a 1800×1200 PNG.
///
/// Duplicate observations of the same month (restatements across
/// vintages) are averaged before plotting. Uses the bitmap backend with
/// default font rendering so the chart renders in headless environments.
pub fn monthly_panels(observations: &[Observation], output_path: &Path) -> Result<()> {
    if observations.is_empty() {
        return Err(PlotError::InvalidData(
            "no observations to plot".to_string(),
        ));
    }

    // Collapse to one value per (month, year).
    let mut grouped: BTreeMap<(Month, i32), (f64, u32)> = BTreeMap::new();
    for obs in observations {
        let slot = grouped
            .entry((obs.period.month, obs.period.year))
            .or_insert((0.0, 0));
        slot.0 += obs.value;
        slot.1 += 1;
    }
    let by_month_year: BTreeMap<(Month, i32), f64> = grouped
        .into_iter()
        .map(|(key, (sum, count))| (key, sum / f64::from(count)))
        .collect();

    let year_min = by_month_year.keys().map(|&(_, y)| y).min().unwrap_or(0);
    let year_max = by_month_year.keys().map(|&(_, y)| y).max().unwrap_or(0);
    if year_min == year_max {
        return Err(PlotError::InvalidData(
            "need more than one year of data".to_string(),
        ));
    }

    let value_max = by_month_year.values().cloned().fold(f64::MIN, f64::max);
    let y_range = 0.0..value_max * 1.1;

    let root = BitMapBackend::new(output_path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;
    let titled = root
        .titled("Vacancy Trends by Month Across Years", ("sans-serif", 40))
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let panels = titled.split_evenly((4, 3));
    for (i, month) in Month::ALL.iter().enumerate() {
        let points: Vec<(i32, f64)> = by_month_year
            .iter()
            .filter(|((m, _), _)| m == month)
            .map(|(&(_, year), &value)| (year, value))
            .collect();

        let mut chart = ChartBuilder::on(&panels[i])
            .caption(month.as_abbrev(), ("sans-serif", 24))
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(45)
            .build_cartesian_2d(year_min..year_max + 1, y_range.clone())
            .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

        chart
            .configure_mesh()
            .x_labels(((year_max - year_min) / 2 + 1) as usize)
            .x_label_formatter(&|y| y.to_string())
            .label_style(("sans-serif", 12))
            .draw()
            .map_err(|e| PlotError::Drawing(e.to_string()))?;

        chart
            .draw_series(LineSeries::new(points.iter().cloned(), &BLUE).point_size(2))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;

        // Mark the row's event year with a filled point and a label.
        if let Some(event) = event_for_row(i / 3) {
            if let Some(&(year, value)) =
                points.iter().find(|(y, _)| *y == event.year)
            {
                chart
                    .draw_series(std::iter::once(Circle::new(
                        (year, value),
                        4,
                        event.color.filled(),
                    )))
                    .map_err(|e| PlotError::Drawing(e.to_string()))?;
                chart
                    .draw_series(std::iter::once(Text::new(
                        event.label,
                        (year - 4, value * 1.05),
                        ("sans-serif", 13).into_font().color(&event.color),
                    )))
                    .map_err(|e| PlotError::Drawing(e.to_string()))?;
            }
        }

        // The last row notes the series settling back toward its long-run
        // level after the post-COVID spike.
        if i / 3 == 3 {
            if let Some(&(year, value)) = points.last() {
                chart
                    .draw_series(std::iter::once(Text::new(
                        "Back to average",
                        (year - 3, value * 1.05),
                        ("sans-serif", 13).into_font().color(&BLUE),
                    )))
                    .map_err(|e| PlotError::Drawing(e.to_string()))?;
            }
        }
    }

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    Ok(())
}
