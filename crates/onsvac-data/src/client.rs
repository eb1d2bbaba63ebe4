//! HTTP client for the ONS time series generator endpoint.
//!
//! The generator serves a CSV rendition of a series at
//! `/generator?format=csv&uri=<series-uri>`; appending `/previous/v{n}` to
//! the series URI selects a historical vintage. There is no index of
//! vintages, so the latest one is found by probing version numbers
//! downwards until a request succeeds.

use crate::error::{DataError, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Series URI for "Vacancies (thousands), UK, seasonally adjusted" (AP2Y)
/// in the labour market statistics dataset.
pub const AP2Y_SERIES_URI: &str = "/employmentandlabourmarket/peopleinwork/employmentandemployeetypes/timeseries/ap2y/lms";

const DEFAULT_BASE_URL: &str = "https://www.ons.gov.uk";

/// The endpoint rejects requests without a browser user agent.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/116.0.0.0 Safari/537.36";

/// Vintages older than this predate the current CSV layout.
pub const SAFE_MIN_VINTAGE: u32 = 117;

const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const PROBE_PACING: Duration = Duration::from_millis(200);
const DOWNLOAD_PACING: Duration = Duration::from_millis(500);

/// Blocking client for one ONS series.
#[derive(Debug)]
pub struct OnsClient {
    http: reqwest::blocking::Client,
    base_url: String,
    series_uri: String,
}

impl OnsClient {
    /// Client for the AP2Y vacancy series on the public ONS site.
    pub fn new() -> Result<OnsClient> {
        OnsClient::with_series(DEFAULT_BASE_URL, AP2Y_SERIES_URI)
    }

    /// Client for an arbitrary series, or a non-default host (tests point
    /// this at a local server).
    pub fn with_series(base_url: &str, series_uri: &str) -> Result<OnsClient> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(OnsClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            series_uri: series_uri.to_string(),
        })
    }

    /// URL of the current (latest) vintage.
    pub fn latest_url(&self) -> String {
        format!(
            "{}/generator?format=csv&uri={}",
            self.base_url, self.series_uri
        )
    }

    /// URL of numbered vintage `v`.
    pub fn vintage_url(&self, v: u32) -> String {
        format!(
            "{}/generator?format=csv&uri={}/previous/v{}",
            self.base_url, self.series_uri, v
        )
    }

    /// Probe vintage numbers from `start` downwards and return the highest
    /// one that exists, clamped to [`SAFE_MIN_VINTAGE`].
    pub fn find_latest_vintage(&self, start: u32) -> u32 {
        info!("probing for the latest vintage from v{start}");
        let mut detected = None;

        for v in (1..=start).rev() {
            match self.http.get(self.vintage_url(v)).send() {
                Ok(response) if response.status().is_success() => {
                    detected = Some(v);
                    break;
                }
                Ok(response) => {
                    debug!("v{v}: HTTP {}", response.status());
                }
                Err(err) => {
                    debug!("v{v}: {err}");
                }
            }
            thread::sleep(PROBE_PACING);
        }

        match detected {
            Some(v) if v >= SAFE_MIN_VINTAGE => {
                info!("latest vintage: v{v}");
                v
            }
            other => {
                warn!(
                    "detected {:?}, falling back to safe floor v{SAFE_MIN_VINTAGE}",
                    other
                );
                SAFE_MIN_VINTAGE
            }
        }
    }

    /// Download `url` to `path`, retrying transient failures with
    /// exponential backoff. Returns `false` without touching the network
    /// when `path` already exists, so re-runs only fetch what is missing.
    ///
    /// The body lands in a sibling temp file first and is renamed into
    /// place, so an interrupted download never leaves a truncated CSV.
    pub fn download_to(&self, url: &str, path: &Path) -> Result<bool> {
        if path.exists() {
            debug!("already exists: {}", path.display());
            return Ok(false);
        }

        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut delay = INITIAL_BACKOFF;
        let mut attempt = 1;

        loop {
            match self.fetch_bytes(url) {
                Ok(body) => {
                    let mut tmp = NamedTempFile::new_in(dir)?;
                    tmp.write_all(&body)?;
                    tmp.persist(path).map_err(|e| e.error)?;
                    return Ok(true);
                }
                Err(err) if attempt < MAX_RETRIES => {
                    warn!(
                        "retry {attempt}/{MAX_RETRIES} for {url} in {}s ({err})",
                        delay.as_secs()
                    );
                    thread::sleep(delay);
                    delay *= 2;
                    attempt += 1;
                }
                Err(err) => {
                    warn!("giving up on {url}");
                    return Err(err);
                }
            }
        }
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.http.get(url).send()?;
        if !response.status().is_success() {
            return Err(DataError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(response.bytes()?.to_vec())
    }

    /// Download the latest vintage plus the preceding `count` numbered
    /// vintages into `dir`. Returns the paths actually written (existing
    /// files are left alone).
    pub fn fetch_vintages(
        &self,
        dir: &Path,
        count: u32,
        probe_from: u32,
    ) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)?;

        let latest = self.find_latest_vintage(probe_from);
        let first = latest.saturating_sub(count).max(1);
        info!("downloading vintages v{first}..=v{latest} into {}", dir.display());

        let mut written = Vec::new();
        for v in first..=latest {
            let path = dir.join(format!("v{v}.csv"));
            // A single missing vintage is survivable; the cleaner works
            // with whatever subset landed on disk.
            match self.download_to(&self.vintage_url(v), &path) {
                Ok(true) => {
                    info!("fetched v{v}.csv");
                    written.push(path);
                }
                Ok(false) => {}
                Err(err) => warn!("skipping v{v}: {err}"),
            }
            thread::sleep(DOWNLOAD_PACING);
        }

        let latest_path = dir.join("latest.csv");
        if self.download_to(&self.latest_url(), &latest_path)? {
            info!("fetched latest.csv");
            written.push(latest_path);
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_target_the_generator_endpoint() {
        let client = OnsClient::new().unwrap();
        assert_eq!(
            client.latest_url(),
            format!("https://www.ons.gov.uk/generator?format=csv&uri={AP2Y_SERIES_URI}")
        );
        assert!(client.vintage_url(117).ends_with("/previous/v117"));
    }

    #[test]
    fn custom_series_and_host() {
        let client =
            OnsClient::with_series("http://localhost:9000/", "/some/timeseries/x4y7/lms")
                .unwrap();
        assert_eq!(
            client.latest_url(),
            "http://localhost:9000/generator?format=csv&uri=/some/timeseries/x4y7/lms"
        );
    }

    #[test]
    fn existing_files_are_not_refetched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("v117.csv");
        fs::write(&path, "stub").unwrap();

        let client = OnsClient::new().unwrap();
        // No request is made for an existing path, so this cannot hit the
        // network even with an unreachable URL.
        let fetched = client
            .download_to("http://127.0.0.1:1/unreachable", &path)
            .unwrap();
        assert!(!fetched);
        assert_eq!(fs::read_to_string(&path).unwrap(), "stub");
    }
}
