//! Consolidation of vintage files into the cleaned long-format table,
//! plus the derived revision summary and forecast output.

use crate::error::{DataError, Result};
use crate::vintage::Vintage;
use onsvac_core::series::{MonthlySeries, Observation, Period, ReleaseDate};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// File name of the consolidated table.
pub const CLEANED_FILE: &str = "cleaned_monthly_series.csv";
/// File name of the forecast output.
pub const FORECAST_FILE: &str = "forecasting.csv";
/// File name of the revision summary.
pub const REVISIONS_FILE: &str = "revisions.csv";

/// Files the pipeline writes itself, never to be read back as vintages.
const OUTPUT_FILES: [&str; 3] = [CLEANED_FILE, FORECAST_FILE, REVISIONS_FILE];

/// Parse every vintage CSV in `dir` and flatten into one observation
/// table, sorted by period then release date.
///
/// Unparseable files and vintages without monthly rows are skipped with a
/// warning; the cleaned/forecast outputs living in the same directory are
/// ignored by name.
pub fn consolidate_dir(dir: &Path) -> Result<Vec<Observation>> {
    let mut paths: Vec<_> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "csv"))
        .filter(|p| {
            let name = p.file_name().and_then(|n| n.to_str()).unwrap_or("");
            !OUTPUT_FILES.contains(&name)
        })
        .collect();
    paths.sort();

    info!("processing {} vintage files", paths.len());
    let mut observations = Vec::new();
    for path in &paths {
        match Vintage::parse(path) {
            Ok(vintage) if vintage.is_empty() => {
                warn!("{}: no monthly rows, skipping", path.display());
            }
            Ok(vintage) => {
                if let Some(cdid) = &vintage.cdid {
                    if cdid != "AP2Y" {
                        warn!("{}: series {cdid}, not AP2Y", path.display());
                    }
                }
                observations.extend(vintage.observations());
            }
            Err(err) => {
                warn!("{}: {err}, skipping", path.display());
            }
        }
    }

    if observations.is_empty() {
        return Err(DataError::NoData(dir.to_path_buf()));
    }

    observations.sort_by(|a, b| {
        (a.period, a.release, &a.vintage).cmp(&(b.period, b.release, &b.vintage))
    });
    Ok(observations)
}

/// Write the consolidated table with the
/// `Period,Vacancies,ReleaseDate,VintageFile` header.
pub fn write_cleaned(path: &Path, observations: &[Observation]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["Period", "Vacancies", "ReleaseDate", "VintageFile"])?;
    for obs in observations {
        writer.write_record([
            obs.period.to_string(),
            format_value(obs.value),
            obs.release.map(|r| r.to_string()).unwrap_or_default(),
            obs.vintage.clone(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a consolidated table back into observations.
pub fn read_cleaned(path: &Path) -> Result<Vec<Observation>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut observations = Vec::new();
    for record in reader.records() {
        let record = record?;
        let period: Period = record.get(0).unwrap_or("").trim().parse()?;
        let raw_value = record.get(1).unwrap_or("").trim();
        let value: f64 = raw_value.parse().map_err(|_| DataError::BadRecord {
            path: path.to_path_buf(),
            detail: format!("`{raw_value}` is not a number"),
        })?;
        let release = match record.get(2).map(str::trim) {
            Some("") | None => None,
            Some(s) => Some(ReleaseDate::parse(s)?),
        };
        observations.push(Observation {
            period,
            value,
            release,
            vintage: record.get(3).unwrap_or("").trim().to_string(),
        });
    }
    if observations.is_empty() {
        return Err(DataError::NoData(path.to_path_buf()));
    }
    Ok(observations)
}

/// Load a consolidated table and collapse it to one value per month.
pub fn load_series(path: &Path) -> Result<MonthlySeries> {
    let observations = read_cleaned(path)?;
    Ok(MonthlySeries::from_observations(&observations)?)
}

/// How a period's published value changed across vintages.
#[derive(Debug, Clone, PartialEq)]
pub struct Revision {
    pub period: Period,
    /// Value in the earliest vintage carrying the period.
    pub first: f64,
    /// Value in the latest vintage carrying the period.
    pub latest: f64,
    /// `latest - first`.
    pub revision: f64,
    /// Number of vintages that state the period.
    pub vintages: usize,
}

/// Summarise the revisions each period went through.
///
/// "Earliest" and "latest" order by release date, falling back to the
/// vintage stem for files whose preamble carried no date.
pub fn revision_summary(observations: &[Observation]) -> Vec<Revision> {
    let mut by_period: BTreeMap<Period, Vec<&Observation>> = BTreeMap::new();
    for obs in observations {
        by_period.entry(obs.period).or_default().push(obs);
    }

    by_period
        .into_iter()
        .map(|(period, mut group)| {
            group.sort_by(|a, b| (a.release, &a.vintage).cmp(&(b.release, &b.vintage)));
            let first = group[0].value;
            let latest = group[group.len() - 1].value;
            Revision {
                period,
                first,
                latest,
                revision: latest - first,
                vintages: group.len(),
            }
        })
        .collect()
}

/// Write the revision summary table.
pub fn write_revisions(path: &Path, revisions: &[Revision]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "Period",
        "FirstEstimate",
        "LatestEstimate",
        "Revision",
        "Vintages",
    ])?;
    for rev in revisions {
        writer.write_record([
            rev.period.to_string(),
            format_value(rev.first),
            format_value(rev.latest),
            format_value(rev.revision),
            rev.vintages.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the forecast table (`Period,Predicted Vacancies`), values rounded
/// to whole thousands as the series itself is published.
pub fn write_forecast(path: &Path, rows: &[(Period, i64)]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["Period", "Predicted Vacancies"])?;
    for (period, value) in rows {
        writer.write_record([period.to_string(), value.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Trim a trailing `.0` so integral values round-trip the way the source
/// files state them.
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(period: &str, value: f64, release: &str, vintage: &str) -> Observation {
        Observation {
            period: period.parse().unwrap(),
            value,
            release: Some(ReleaseDate::parse(release).unwrap()),
            vintage: vintage.to_string(),
        }
    }

    #[test]
    fn revision_summary_orders_by_release() {
        let observations = vec![
            obs("2020 JAN", 818.0, "2020-03-17", "v118"),
            obs("2020 JAN", 812.0, "2020-02-18", "v117"),
            obs("2020 FEB", 795.0, "2020-03-17", "v118"),
        ];
        let revisions = revision_summary(&observations);
        assert_eq!(revisions.len(), 2);

        let jan = &revisions[0];
        assert_eq!(jan.period.to_string(), "2020 JAN");
        assert_eq!(jan.first, 812.0);
        assert_eq!(jan.latest, 818.0);
        assert_eq!(jan.revision, 6.0);
        assert_eq!(jan.vintages, 2);

        assert_eq!(revisions[1].vintages, 1);
    }

    #[test]
    fn integral_values_are_written_without_fraction() {
        assert_eq!(format_value(812.0), "812");
        assert_eq!(format_value(812.5), "812.5");
        assert_eq!(format_value(-3.0), "-3");
    }
}
