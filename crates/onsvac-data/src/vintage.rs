//! Parsing of a single vintage CSV.
//!
//! A generator CSV is a two-column file: a preamble of `"key","value"`
//! metadata records (title, CDID, release date, ...) followed by
//! observation records whose first field is a period label. The same
//! series is stated at annual, quarterly and monthly granularity; only
//! the monthly rows (`YYYY MON`) are of interest here.

use crate::error::Result;
use onsvac_core::series::{Observation, Period, ReleaseDate};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::warn;

/// One parsed vintage file.
#[derive(Debug, Clone, PartialEq)]
pub struct Vintage {
    /// File stem, e.g. `v140` or `latest`.
    pub source: String,
    /// Series identifier from the preamble (`AP2Y` for the vacancy series).
    pub cdid: Option<String>,
    /// Release date from the preamble.
    pub release: Option<ReleaseDate>,
    /// Monthly observations, in file order.
    pub rows: Vec<(Period, f64)>,
}

impl Vintage {
    /// Parse a vintage file. The file stem becomes [`Vintage::source`].
    pub fn parse(path: &Path) -> Result<Vintage> {
        let source = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();
        Vintage::parse_reader(File::open(path)?, source)
    }

    /// Parse vintage CSV content from any reader.
    pub fn parse_reader<R: Read>(reader: R, source: String) -> Result<Vintage> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut cdid = None;
        let mut release = None;
        let mut rows = Vec::new();

        for record in csv.records() {
            let record = record?;
            let first = record.get(0).unwrap_or("").trim();
            let second = record.get(1).unwrap_or("").trim();

            match first.to_ascii_lowercase().as_str() {
                "cdid" => {
                    cdid = Some(second.to_string());
                    continue;
                }
                "release date" => {
                    match ReleaseDate::parse(second) {
                        Ok(date) => release = Some(date),
                        Err(err) => warn!("{source}: {err}"),
                    }
                    continue;
                }
                _ => {}
            }

            // Annual and quarterly period labels fail the parse and fall
            // through, as do the remaining preamble keys.
            if let Ok(period) = first.parse::<Period>() {
                if let Ok(value) = second.parse::<f64>() {
                    rows.push((period, value));
                }
            }
        }

        Ok(Vintage {
            source,
            cdid,
            release,
            rows,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The vintage's rows as long-format observations.
    pub fn observations(&self) -> impl Iterator<Item = Observation> + '_ {
        self.rows.iter().map(move |&(period, value)| Observation {
            period,
            value,
            release: self.release,
            vintage: self.source.clone(),
        })
    }
}
