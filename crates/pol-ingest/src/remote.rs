//! Election results download.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use tracing::{debug, info};

use pol_model::{Dataset, PipelineError, Result};

use crate::csv_table::read_csv_str;

/// Published 2016/2020 county results.
pub const ELECTION_URL: &str = "https://datawrapper.dwcdn.net/UI9i0/2/dataset.csv";

/// HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// GET a CSV document and parse it. Non-2xx responses fail; there is no retry.
pub fn fetch_csv(url: &str) -> Result<Dataset> {
    let client = Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|error| PipelineError::http(url, error))?;
    debug!(url, "requesting csv");
    let response = client
        .get(url)
        .header(USER_AGENT, concat!("pol-pipeline/", env!("CARGO_PKG_VERSION")))
        .send()
        .and_then(reqwest::blocking::Response::error_for_status)
        .map_err(|error| PipelineError::http(url, error))?;
    let body = response
        .text()
        .map_err(|error| PipelineError::http(url, error))?;
    let dataset = read_csv_str(&body, url)?;
    info!(
        url,
        rows = dataset.height(),
        columns = dataset.width(),
        "downloaded csv"
    );
    Ok(dataset)
}
