//! End-to-end consolidation over vintage files on disk.

use onsvac_data::consolidate::{
    consolidate_dir, load_series, read_cleaned, write_cleaned, CLEANED_FILE,
};
use onsvac_data::DataError;
use std::fs;
use tempfile::TempDir;

const V117: &str = r#""Title","Vacancies (thousands) - Total"
"CDID","AP2Y"
"Release date","18/02/2020"
"2019","810"
"2019 Q4","805"
"2019 NOV","804"
"2019 DEC","808"
"2020 JAN","812"
"#;

const V118: &str = r#""Title","Vacancies (thousands) - Total"
"CDID","AP2Y"
"Release date","17/03/2020"
"2019 NOV","804"
"2019 DEC","806"
"2020 JAN","818"
"2020 FEB","795"
"#;

fn vintage_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("v117.csv"), V117).unwrap();
    fs::write(dir.path().join("v118.csv"), V118).unwrap();
    // A stray non-CSV file must be ignored.
    fs::write(dir.path().join("notes.txt"), "scratch").unwrap();
    dir
}

#[test]
fn consolidates_two_vintages() {
    let dir = vintage_dir();
    let observations = consolidate_dir(dir.path()).unwrap();

    // 3 monthly rows in v117 (annual + quarterly dropped) + 4 in v118.
    assert_eq!(observations.len(), 7);

    // Sorted by period first: both NOV rows lead.
    assert_eq!(observations[0].period.to_string(), "2019 NOV");
    assert_eq!(observations[1].period.to_string(), "2019 NOV");
    // Within a period, the earlier release sorts first.
    assert_eq!(observations[2].vintage, "v117");
    assert_eq!(observations[2].value, 808.0);
    assert_eq!(observations[3].vintage, "v118");
    assert_eq!(observations[3].value, 806.0);
}

#[test]
fn cleaned_table_round_trips() {
    let dir = vintage_dir();
    let observations = consolidate_dir(dir.path()).unwrap();

    let output = dir.path().join(CLEANED_FILE);
    write_cleaned(&output, &observations).unwrap();

    let header = fs::read_to_string(&output).unwrap();
    assert!(header.starts_with("Period,Vacancies,ReleaseDate,VintageFile"));

    let restored = read_cleaned(&output).unwrap();
    assert_eq!(restored, observations);
}

#[test]
fn cleaned_output_is_not_treated_as_a_vintage() {
    let dir = vintage_dir();
    let observations = consolidate_dir(dir.path()).unwrap();
    write_cleaned(&dir.path().join(CLEANED_FILE), &observations).unwrap();

    // Re-running over the same directory must not pick up its own output.
    let again = consolidate_dir(dir.path()).unwrap();
    assert_eq!(again.len(), observations.len());
}

#[test]
fn series_collapses_revised_months_by_mean() {
    let dir = vintage_dir();
    let observations = consolidate_dir(dir.path()).unwrap();
    let output = dir.path().join(CLEANED_FILE);
    write_cleaned(&output, &observations).unwrap();

    let series = load_series(&output).unwrap();
    assert_eq!(series.start().to_string(), "2019 NOV");
    assert_eq!(series.end().to_string(), "2020 FEB");
    // 2019 DEC was published as 808 then revised to 806.
    assert_eq!(series.values()[1], 807.0);
    // 2020 FEB only appears in v118.
    assert_eq!(series.values()[3], 795.0);
}

#[test]
fn directory_without_monthly_data_is_an_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("v1.csv"), "\"Title\",\"x\"\n\"1971\",\"12\"\n").unwrap();
    assert!(matches!(
        consolidate_dir(dir.path()),
        Err(DataError::NoData(_))
    ));
}
