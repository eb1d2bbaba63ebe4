//! Error type for fetching and consolidating vintages.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Core(#[from] onsvac_core::CoreError),

    #[error("no monthly observations found under {}", .0.display())]
    NoData(PathBuf),

    #[error("{}: malformed record: {detail}", .path.display())]
    BadRecord { path: PathBuf, detail: String },
}

pub type Result<T> = std::result::Result<T, DataError>;
