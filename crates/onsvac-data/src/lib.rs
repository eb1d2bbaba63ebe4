//! # onsvac-data
//!
//! Download, parsing and consolidation of ONS vacancy-series vintages.
//!
//! The ONS re-publishes the whole vacancy series with every labour market
//! release; each published snapshot is a *vintage*. This crate fetches a
//! window of recent vintages from the generator endpoint, parses their
//! CSV layout, and consolidates them into one long-format table keyed by
//! period and release date — the input to plotting and forecasting.

pub mod client;
pub mod consolidate;
pub mod vintage;
mod error;

pub use client::OnsClient;
pub use error::{DataError, Result};
pub use vintage::Vintage;
