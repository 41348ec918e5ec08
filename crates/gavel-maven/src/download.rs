//! Raw descriptor retrieval over HTTP or from a `file://` repository.

use std::path::Path;
use std::time::Duration;

use gavel_util::errors::GavelError;
use reqwest::Client;

use crate::auth;
use crate::repository::Repository;

/// Build the shared HTTP client; `timeout` bounds each request.
pub fn build_client(timeout: Duration) -> Result<Client, GavelError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("gavel/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| GavelError::Generic {
            message: format!("Failed to create HTTP client: {e}"),
        })
}

/// GET `url` and return the body.
///
/// Anything other than a successful response, including a timeout, is a
/// [`GavelError::FetchFailed`]. There are no retries.
pub async fn download_bytes(
    client: &Client,
    repo: &Repository,
    url: &str,
) -> Result<Vec<u8>, GavelError> {
    let fetch_failed = |message: String| GavelError::FetchFailed {
        url: url.to_string(),
        message,
    };

    let req = auth::apply_auth(client.get(url), repo);
    let resp = req.send().await.map_err(|e| {
        if e.is_timeout() {
            fetch_failed("request timed out".to_string())
        } else {
            fetch_failed(format!("request failed: {e}"))
        }
    })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(fetch_failed(format!("HTTP {status}")));
    }

    let bytes = resp
        .bytes()
        .await
        .map_err(|e| fetch_failed(format!("failed to read response: {e}")))?;
    Ok(bytes.to_vec())
}

/// Read a descriptor from a local repository.
pub async fn read_local(path: &Path, url: &str) -> Result<Vec<u8>, GavelError> {
    tokio::fs::read(path)
        .await
        .map_err(|e| GavelError::FetchFailed {
            url: url.to_string(),
            message: e.to_string(),
        })
}
