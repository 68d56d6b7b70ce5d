use anyhow::Result;
use log::debug;
use reqwest::Client;

use crate::{
    http::HttpClient,
    provider::{DEFAULT_API_URL, GitHubProvider, Provider},
    runtime::Runtime,
};

/// User agent sent with every request; the GitHub API rejects requests without one.
pub const USER_AGENT: &str = concat!("catalog-sync/", env!("CATALOG_SYNC_VERSION"));

pub struct Config<R: Runtime, P: Provider> {
    pub runtime: R,
    pub provider: P,
}

impl<R: Runtime> Config<R, GitHubProvider> {
    pub fn new(runtime: R, api_url: Option<String>) -> Result<Self> {
        let api_url = api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        debug!("Using API at {}", api_url);

        let client = Client::builder().user_agent(USER_AGENT).build()?;
        let provider = GitHubProvider::from_http_client(HttpClient::new(client), &api_url);

        Ok(Self { runtime, provider })
    }
}
