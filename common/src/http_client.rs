use crate::errors::AppError;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;

/// Outbound HTTP client with a bounded total request time.
///
/// Single attempt per call: failed upstream requests surface to the caller
/// instead of being retried.
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Issue a GET with query parameters and return the raw response.
    ///
    /// Network-level failures (connect errors, timeouts) are converted via
    /// [`AppError`]; non-2xx statuses are not treated as errors here because
    /// callers need the error body.
    pub async fn get(&self, url: &str, params: &[(&str, &str)]) -> Result<Response, AppError> {
        debug!(url = %url, "Outbound GET");
        let response = self.client.get(url).query(params).send().await?;
        Ok(response)
    }
}
