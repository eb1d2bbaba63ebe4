//! Monthly time series model for a revised official statistic.
//!
//! The ONS publishes the vacancy series as a sequence of *vintages*: each
//! release re-states the whole history and may revise earlier values. The
//! types here model a single monthly period, a dated observation taken from
//! one vintage, and a consolidated contiguous series ready for model
//! fitting.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Calendar month, ordered January through December.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    /// All months in calendar order.
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    /// The three-letter uppercase abbreviation the ONS uses (`JAN` .. `DEC`).
    pub fn as_abbrev(self) -> &'static str {
        match self {
            Month::Jan => "JAN",
            Month::Feb => "FEB",
            Month::Mar => "MAR",
            Month::Apr => "APR",
            Month::May => "MAY",
            Month::Jun => "JUN",
            Month::Jul => "JUL",
            Month::Aug => "AUG",
            Month::Sep => "SEP",
            Month::Oct => "OCT",
            Month::Nov => "NOV",
            Month::Dec => "DEC",
        }
    }

    /// Parse an ONS month abbreviation.
    pub fn from_abbrev(s: &str) -> Option<Month> {
        Month::ALL.iter().copied().find(|m| m.as_abbrev() == s)
    }

    /// Month number, 1-based (January = 1).
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    /// Inverse of [`Month::number`].
    pub fn from_number(n: u32) -> Option<Month> {
        Month::ALL.get(n.checked_sub(1)? as usize).copied()
    }

    fn succ(self) -> (Month, bool) {
        match self {
            Month::Dec => (Month::Jan, true),
            other => (Month::ALL[other as usize + 1], false),
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_abbrev())
    }
}

/// One monthly period, e.g. `2024 JAN`.
///
/// Ordering is chronological (year first, then month).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Period {
    pub year: i32,
    pub month: Month,
}

impl Period {
    pub fn new(year: i32, month: Month) -> Period {
        Period { year, month }
    }

    /// The following month.
    pub fn succ(self) -> Period {
        let (month, wrapped) = self.month.succ();
        Period {
            year: if wrapped { self.year + 1 } else { self.year },
            month,
        }
    }

    /// Number of months from `start` to `self` (zero when equal, negative
    /// when `self` precedes `start`).
    pub fn months_since(self, start: Period) -> i64 {
        let a = self.year as i64 * 12 + self.month as i64;
        let b = start.year as i64 * 12 + start.month as i64;
        a - b
    }
}

impl FromStr for Period {
    type Err = CoreError;

    /// Parse the `YYYY MON` layout used in ONS time series CSVs.
    ///
    /// Annual (`1971`) and quarterly (`1971 Q2`) period strings are
    /// rejected, which is how the cleaner filters vintage rows down to the
    /// monthly series.
    fn from_str(s: &str) -> Result<Period> {
        let bad = || CoreError::BadPeriod(s.to_string());
        let mut parts = s.split_whitespace();
        let year = parts
            .next()
            .filter(|y| y.len() == 4)
            .and_then(|y| y.parse::<i32>().ok())
            .ok_or_else(bad)?;
        let month = parts
            .next()
            .and_then(Month::from_abbrev)
            .ok_or_else(bad)?;
        if parts.next().is_some() {
            return Err(bad());
        }
        Ok(Period { year, month })
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.year, self.month)
    }
}

/// Release date of a vintage, at day precision.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ReleaseDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl ReleaseDate {
    pub fn new(year: i32, month: u32, day: u32) -> Result<ReleaseDate> {
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return Err(CoreError::BadDate(format!("{year}-{month}-{day}")));
        }
        Ok(ReleaseDate { year, month, day })
    }

    /// Parse a release date.
    ///
    /// The ONS preamble carries day-first dates (`12/11/2024` or
    /// `12-11-2024`); the consolidated table written by this pipeline uses
    /// ISO `2024-11-12`. A leading 4-digit component selects the ISO
    /// reading.
    pub fn parse(s: &str) -> Result<ReleaseDate> {
        let bad = || CoreError::BadDate(s.to_string());
        let parts: Vec<&str> = s.trim().split(['/', '-']).collect();
        if parts.len() != 3 {
            return Err(bad());
        }
        let nums: Vec<u32> = parts
            .iter()
            .map(|p| p.trim().parse::<u32>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| bad())?;
        let (year, month, day) = if parts[0].len() == 4 {
            (nums[0] as i32, nums[1], nums[2])
        } else {
            (nums[2] as i32, nums[1], nums[0])
        };
        ReleaseDate::new(year, month, day)
    }
}

impl fmt::Display for ReleaseDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// One row of the consolidated long-format table: a monthly value as
/// published in one particular vintage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub period: Period,
    pub value: f64,
    /// Release date of the vintage this value came from, when the vintage
    /// preamble carried one.
    pub release: Option<ReleaseDate>,
    /// File stem of the source vintage, e.g. `v140` or `latest`.
    pub vintage: String,
}

/// A contiguous monthly series, one value per period.
///
/// Built by collapsing the long-format observation table: duplicate
/// periods (the same month restated across vintages) are averaged, and
/// interior months absent from every vintage are filled by linear
/// interpolation so the smoothing models see an unbroken series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySeries {
    start: Period,
    values: Vec<f64>,
}

impl MonthlySeries {
    /// Collapse a long-format observation table into one value per month.
    pub fn from_observations(observations: &[Observation]) -> Result<MonthlySeries> {
        MonthlySeries::from_pairs(
            observations.iter().map(|o| (o.period, o.value)).collect(),
        )
    }

    /// Build a series from `(period, value)` pairs in any order.
    ///
    /// Values sharing a period are averaged; non-finite values are dropped
    /// before averaging.
    pub fn from_pairs(pairs: Vec<(Period, f64)>) -> Result<MonthlySeries> {
        let mut grouped: BTreeMap<Period, (f64, u32)> = BTreeMap::new();
        for (period, value) in pairs {
            if !value.is_finite() {
                continue;
            }
            let slot = grouped.entry(period).or_insert((0.0, 0));
            slot.0 += value;
            slot.1 += 1;
        }
        let (&start, _) = grouped.iter().next().ok_or(CoreError::EmptySeries)?;
        let (&end, _) = grouped.iter().next_back().ok_or(CoreError::EmptySeries)?;

        let len = end.months_since(start) as usize + 1;
        let mut values = vec![f64::NAN; len];
        for (period, (sum, count)) in &grouped {
            values[period.months_since(start) as usize] = sum / f64::from(*count);
        }
        interpolate_gaps(&mut values);

        Ok(MonthlySeries { start, values })
    }

    /// First period in the series.
    pub fn start(&self) -> Period {
        self.start
    }

    /// Last period in the series.
    pub fn end(&self) -> Period {
        self.period_at(self.values.len() - 1)
    }

    /// Period at a 0-based offset from the start.
    pub fn period_at(&self, index: usize) -> Period {
        let mut p = self.start;
        for _ in 0..index {
            p = p.succ();
        }
        p
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The values as a plain slice, oldest first, for model fitting.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterate `(period, value)` pairs in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (Period, f64)> + '_ {
        let mut p = self.start;
        self.values.iter().map(move |&v| {
            let current = p;
            p = p.succ();
            (current, v)
        })
    }
}

/// Linear interpolation of interior `NaN` runs. The first and last slots
/// are always observed (the series spans min..=max observed period), so
/// every gap has a value on both sides.
fn interpolate_gaps(values: &mut [f64]) {
    let n = values.len();
    let mut i = 0;
    while i < n {
        if values[i].is_nan() {
            let prev = i - 1;
            let mut next = i;
            while values[next].is_nan() {
                next += 1;
            }
            let step = (values[next] - values[prev]) / (next - prev) as f64;
            for j in (prev + 1)..next {
                values[j] = values[prev] + step * (j - prev) as f64;
            }
            i = next;
        }
        i += 1;
    }
}
