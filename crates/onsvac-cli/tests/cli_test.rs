//! Smoke tests for the `onsvac` binary. Nothing here touches the network:
//! the clean/plot/forecast stages run against fixture files on disk.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn onsvac() -> Command {
    Command::cargo_bin("onsvac").unwrap()
}

/// Write a pair of small vintage files into `dir`.
fn write_vintages(dir: &Path) {
    let v117 = "\"Title\",\"Vacancies (thousands) - Total\"\n\
                \"CDID\",\"AP2Y\"\n\
                \"Release date\",\"18/02/2020\"\n\
                \"2019 NOV\",\"804\"\n\
                \"2019 DEC\",\"808\"\n\
                \"2020 JAN\",\"812\"\n";
    let v118 = "\"Title\",\"Vacancies (thousands) - Total\"\n\
                \"CDID\",\"AP2Y\"\n\
                \"Release date\",\"17/03/2020\"\n\
                \"2019 DEC\",\"806\"\n\
                \"2020 JAN\",\"818\"\n\
                \"2020 FEB\",\"795\"\n";
    fs::write(dir.join("v117.csv"), v117).unwrap();
    fs::write(dir.join("v118.csv"), v118).unwrap();
}

/// Write a cleaned table with `months` months of trended seasonal data.
fn write_cleaned_fixture(path: &Path, months: usize) {
    let mut content = String::from("Period,Vacancies,ReleaseDate,VintageFile\n");
    let month_names = [
        "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
    ];
    for i in 0..months {
        let year = 2015 + i / 12;
        let month = month_names[i % 12];
        let value = 700.0
            + i as f64 * 1.5
            + 40.0 * (i as f64 * std::f64::consts::PI / 6.0).sin();
        content.push_str(&format!("{year} {month},{value:.1},2024-11-12,latest\n"));
    }
    fs::write(path, content).unwrap();
}

#[test]
fn help_lists_the_pipeline_stages() {
    onsvac()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("fetch"))
        .stdout(predicate::str::contains("clean"))
        .stdout(predicate::str::contains("plot"))
        .stdout(predicate::str::contains("forecast"));
}

#[test]
fn clean_writes_the_consolidated_table() {
    let dir = TempDir::new().unwrap();
    write_vintages(dir.path());

    onsvac()
        .args(["clean", "--data-dir"])
        .arg(dir.path())
        .arg("--revisions")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleaned monthly data"));

    let cleaned = fs::read_to_string(dir.path().join("cleaned_monthly_series.csv")).unwrap();
    assert!(cleaned.starts_with("Period,Vacancies,ReleaseDate,VintageFile"));
    assert!(cleaned.contains("2020 JAN,812,2020-02-18,v117"));
    assert!(dir.path().join("revisions.csv").exists());
}

#[test]
fn clean_fails_on_an_empty_directory() {
    let dir = TempDir::new().unwrap();
    onsvac()
        .args(["clean", "--data-dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn forecast_writes_table_and_chart() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("cleaned_monthly_series.csv");
    write_cleaned_fixture(&input, 48);
    let plots = dir.path().join("plots");

    onsvac()
        .arg("forecast")
        .arg("--input")
        .arg(&input)
        .args(["--steps", "6"])
        .arg("--data-dir")
        .arg(dir.path())
        .arg("--plots-dir")
        .arg(&plots)
        .assert()
        .success()
        .stdout(predicate::str::contains("Forecast (6 months ahead)"));

    let table = fs::read_to_string(dir.path().join("forecasting.csv")).unwrap();
    let mut lines = table.lines();
    assert_eq!(lines.next(), Some("Period,Predicted Vacancies"));
    assert_eq!(lines.clone().count(), 6);
    // The fixture ends at 2018 DEC, so the forecast starts at 2019 JAN.
    assert!(lines.next().unwrap().starts_with("2019 JAN,"));

    assert!(plots.join("forecasting_plot.png").exists());
}

#[test]
fn forecast_fails_on_a_short_series() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("cleaned_monthly_series.csv");
    write_cleaned_fixture(&input, 10);

    onsvac()
        .arg("forecast")
        .arg("--input")
        .arg(&input)
        .arg("--data-dir")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("insufficient data"));
}

#[test]
fn plot_writes_the_panel_chart() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("cleaned_monthly_series.csv");
    write_cleaned_fixture(&input, 48);
    let plots = dir.path().join("plots");

    onsvac()
        .arg("plot")
        .arg("--input")
        .arg(&input)
        .arg("--plots-dir")
        .arg(&plots)
        .assert()
        .success();

    assert!(plots.join("monthly_vacancies.png").exists());
}
