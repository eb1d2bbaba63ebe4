//! # onsvac
//!
//! Command-line driver for the ONS vacancy pipeline: download vintages,
//! consolidate them into a cleaned table, render charts, and produce a
//! Holt–Winters baseline forecast.

use clap::{Parser, Subcommand};
use onsvac_core::prelude::*;
use onsvac_core::seasonality::detect_seasonality;
use onsvac_data::consolidate::{
    consolidate_dir, read_cleaned, revision_summary, write_cleaned, write_forecast,
    write_revisions, CLEANED_FILE, FORECAST_FILE, REVISIONS_FILE,
};
use onsvac_data::OnsClient;
use onsvac_plot::{forecast_chart, monthly_panels};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

type CliResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "onsvac")]
#[command(about = "ONS vacancy series pipeline: fetch, clean, plot, forecast", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the latest vintages of the vacancy series
    Fetch {
        /// Directory the vintage CSVs are written to
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// How many vintages to download before the latest one
        #[arg(long, default_value_t = 24)]
        vintages: u32,

        /// Highest vintage number to probe when detecting the latest
        #[arg(long, default_value_t = 200)]
        probe_from: u32,
    },

    /// Consolidate downloaded vintages into one cleaned table
    Clean {
        /// Directory holding the vintage CSVs
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Output file (default: <data-dir>/cleaned_monthly_series.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write a per-period revision summary
        #[arg(long)]
        revisions: bool,
    },

    /// Render the monthly panel chart from a cleaned table
    Plot {
        /// Cleaned table to plot
        #[arg(short, long, default_value = "data/cleaned_monthly_series.csv")]
        input: PathBuf,

        /// Directory the chart is written to
        #[arg(long, default_value = "plots")]
        plots_dir: PathBuf,
    },

    /// Fit Holt-Winters and forecast future vacancies
    Forecast {
        /// Cleaned table to fit on
        #[arg(short, long, default_value = "data/cleaned_monthly_series.csv")]
        input: PathBuf,

        /// Number of months to forecast
        #[arg(short, long, default_value_t = 24)]
        steps: usize,

        /// Seasonal cycle length in months
        #[arg(long, default_value_t = 12)]
        period: usize,

        /// Directory the forecast table is written to
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Directory the forecast chart is written to
        #[arg(long, default_value = "plots")]
        plots_dir: PathBuf,
    },

    /// Run the whole pipeline: fetch, clean, plot, forecast
    Run {
        /// Directory for downloads and tables
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Directory for charts
        #[arg(long, default_value = "plots")]
        plots_dir: PathBuf,

        /// How many vintages to download before the latest one
        #[arg(long, default_value_t = 24)]
        vintages: u32,

        /// Number of months to forecast
        #[arg(long, default_value_t = 24)]
        steps: usize,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "onsvac=info,onsvac_data=info".into()),
        )
        .init();

    let cli = Cli::parse();
    match dispatch(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn dispatch(command: Commands) -> CliResult<()> {
    match command {
        Commands::Fetch {
            data_dir,
            vintages,
            probe_from,
        } => run_fetch(&data_dir, vintages, probe_from),
        Commands::Clean {
            data_dir,
            output,
            revisions,
        } => run_clean(&data_dir, output, revisions),
        Commands::Plot { input, plots_dir } => run_plot(&input, &plots_dir),
        Commands::Forecast {
            input,
            steps,
            period,
            data_dir,
            plots_dir,
        } => run_forecast(&input, steps, period, &data_dir, &plots_dir),
        Commands::Run {
            data_dir,
            plots_dir,
            vintages,
            steps,
        } => run_all(&data_dir, &plots_dir, vintages, steps),
    }
}

fn run_fetch(data_dir: &Path, vintages: u32, probe_from: u32) -> CliResult<()> {
    let client = OnsClient::new()?;
    let written = client.fetch_vintages(data_dir, vintages, probe_from)?;
    println!(
        "Fetched {} file(s) into {}",
        written.len(),
        data_dir.display()
    );
    Ok(())
}

fn run_clean(data_dir: &Path, output: Option<PathBuf>, revisions: bool) -> CliResult<()> {
    let observations = consolidate_dir(data_dir)?;
    let output = output.unwrap_or_else(|| data_dir.join(CLEANED_FILE));
    write_cleaned(&output, &observations)?;
    println!(
        "Cleaned monthly data ({} rows) saved to {}",
        observations.len(),
        output.display()
    );

    if revisions {
        let summary = revision_summary(&observations);
        let path = data_dir.join(REVISIONS_FILE);
        write_revisions(&path, &summary)?;
        println!(
            "Revision summary ({} periods) saved to {}",
            summary.len(),
            path.display()
        );
    }
    Ok(())
}

fn run_plot(input: &Path, plots_dir: &Path) -> CliResult<()> {
    let observations = read_cleaned(input)?;
    fs::create_dir_all(plots_dir)?;
    let path = plots_dir.join("monthly_vacancies.png");
    monthly_panels(&observations, &path)?;
    println!("Monthly panel chart saved to {}", path.display());
    Ok(())
}

fn run_forecast(
    input: &Path,
    steps: usize,
    period: usize,
    data_dir: &Path,
    plots_dir: &Path,
) -> CliResult<()> {
    let observations = read_cleaned(input)?;
    let series = MonthlySeries::from_observations(&observations)?;
    info!(
        "fitting on {} months ({} .. {})",
        series.len(),
        series.start(),
        series.end()
    );

    if let Some(detected) = detect_seasonality(series.values(), period * 2) {
        if detected != period {
            warn!("autocorrelation suggests a {detected}-month cycle, fitting {period}");
        }
    }

    let model = HoltWinters::auto(series.values(), period, Seasonal::Additive)?;
    let (alpha, beta, gamma) = model.parameters();
    info!("selected alpha={alpha:.2} beta={beta:.2} gamma={gamma:.2}");

    let band = ForecastBand::from_residuals(model.predict(steps)?, model.residuals(), 0.95);

    // Forecast periods continue from the last observed month; values are
    // published in whole thousands.
    let mut period_cursor = series.end();
    let rows: Vec<(Period, i64)> = band
        .forecast
        .iter()
        .map(|&value| {
            period_cursor = period_cursor.succ();
            (period_cursor, value.round() as i64)
        })
        .collect();

    fs::create_dir_all(data_dir)?;
    let table_path = data_dir.join(FORECAST_FILE);
    write_forecast(&table_path, &rows)?;

    fs::create_dir_all(plots_dir)?;
    let chart_path = plots_dir.join("forecasting_plot.png");
    forecast_chart(&series, &band, &chart_path)?;

    println!("Forecast ({steps} months ahead):");
    for (period, value) in &rows {
        println!("  {period}: {value}");
    }
    println!("Forecast table saved to {}", table_path.display());
    println!("Forecast chart saved to {}", chart_path.display());
    Ok(())
}

/// The full pipeline, with the step banners of a batch run.
fn run_all(data_dir: &Path, plots_dir: &Path, vintages: u32, steps: usize) -> CliResult<()> {
    let banner = "=".repeat(75);
    println!("{banner}");
    println!("ONS Vacancy Series - Full Run");
    println!("{banner}");

    println!("\n[STEP 1] Fetching data from the ONS website...");
    run_fetch(data_dir, vintages, 200)?;

    println!("\n[STEP 2] Cleaning and structuring data...");
    run_clean(data_dir, None, true)?;

    println!("\n[STEP 3] Generating monthly vacancy plots...");
    run_plot(&data_dir.join(CLEANED_FILE), plots_dir)?;

    println!("\n[STEP 4] Running forecasting model...");
    run_forecast(&data_dir.join(CLEANED_FILE), steps, 12, data_dir, plots_dir)?;

    println!("\n{banner}");
    println!("Analysis completed successfully.");
    println!(
        "Check {} for tables and {} for charts.",
        data_dir.display(),
        plots_dir.display()
    );
    println!("{banner}");
    Ok(())
}
