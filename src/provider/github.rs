//! GitHub provider implementation.

use anyhow::Result;
use async_trait::async_trait;
use log::debug;

use crate::http::HttpClient;

use super::{Provider, Release, ReleaseAsset, RepoId};

/// Default GitHub REST API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// GitHub API response types (internal).
mod api {
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    pub struct Release {
        pub tag_name: String,
        pub published_at: Option<String>,
        pub body: Option<String>,
        #[serde(default)]
        pub assets: Vec<Asset>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Asset {
        pub name: String,
        #[serde(default)]
        pub size: u64,
        pub browser_download_url: String,
    }
}

/// GitHub provider implementation.
pub struct GitHubProvider {
    http_client: HttpClient,
    api_url: String,
}

impl GitHubProvider {
    /// Create from an existing HttpClient.
    pub fn from_http_client(http_client: HttpClient, api_url: &str) -> Self {
        Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn http_client(&self) -> &HttpClient {
        &self.http_client
    }

    /// Only the API's default first page is requested.
    async fn fetch_releases(&self, repo: &RepoId) -> Result<Vec<api::Release>> {
        let url = format!("{}/repos/{}/{}/releases", self.api_url, repo.owner, repo.repo);
        debug!("Fetching releases from {}...", url);
        self.http_client.get_json(&url).await
    }
}

#[async_trait]
impl Provider for GitHubProvider {
    fn api_url(&self) -> &str {
        &self.api_url
    }

    #[tracing::instrument(skip(self))]
    async fn get_releases(&self, repo: &RepoId) -> Result<Vec<Release>> {
        let releases = self.fetch_releases(repo).await?;
        debug!("Received {} release(s) for {}", releases.len(), repo);
        Ok(releases.into_iter().map(|r| r.into()).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn asset_size(&self, download_url: &str) -> Result<Option<u64>> {
        self.http_client.content_length(download_url).await
    }
}

impl From<api::Release> for Release {
    fn from(r: api::Release) -> Self {
        Release {
            tag: r.tag_name,
            published_at: r.published_at,
            body: r.body,
            assets: r.assets.into_iter().map(|a| a.into()).collect(),
        }
    }
}

impl From<api::Asset> for ReleaseAsset {
    fn from(a: api::Asset) -> Self {
        ReleaseAsset {
            name: a.name,
            size: a.size,
            download_url: a.browser_download_url,
        }
    }
}
