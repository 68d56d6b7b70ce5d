//! Thin HTTP client wrapper used by the release provider.

use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;
use reqwest::header::{CONTENT_LENGTH, HeaderMap};
use serde::de::DeserializeOwned;

use super::status::check_status;

/// HTTP client that classifies unsuccessful responses. Requests are never retried.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Returns a reference to the underlying reqwest Client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Performs a GET request and deserializes the JSON response.
    #[tracing::instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET JSON from {}...", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        let response = check_status(response)?;

        response
            .json::<T>()
            .await
            .context("Failed to parse JSON response")
    }

    /// Performs a HEAD request and returns the advertised `Content-Length`, if any.
    #[tracing::instrument(skip(self))]
    pub async fn content_length(&self, url: &str) -> Result<Option<u64>> {
        debug!("HEAD {}...", url);

        let response = self
            .client
            .head(url)
            .send()
            .await
            .context("Failed to send HEAD request")?;

        let response = check_status(response)?;
        Ok(parse_content_length(response.headers()))
    }
}

fn parse_content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}
