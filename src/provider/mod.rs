//! Release provider abstraction.
//!
//! The catalog is fed from the release listing of a single upstream
//! repository. The [`Provider`] trait is the seam between the sync use case
//! and the hosting platform's API, so the use case can be tested without
//! network access.

mod github;

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

pub use github::{DEFAULT_API_URL, GitHubProvider};

/// Repository identifier (owner/repo format).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    pub owner: String,
    pub repo: String,
}

impl RepoId {
    /// Public web page of the release with the given tag.
    pub fn release_page_url(&self, tag: &str) -> String {
        format!(
            "https://github.com/{}/{}/releases/tag/{}",
            self.owner, self.repo, tag
        )
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for RepoId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            anyhow::bail!("Invalid repository format. Expected 'owner/repo'.")
        } else {
            Ok(RepoId {
                owner: parts[0].to_string(),
                repo: parts[1].to_string(),
            })
        }
    }
}

/// A downloadable asset from a release.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReleaseAsset {
    pub name: String,
    pub size: u64,
    pub download_url: String,
}

/// A release from the provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Release {
    /// Version tag (e.g., "v1.0.0")
    pub tag: String,
    /// Publication date (ISO 8601, e.g. "2024-03-01T12:00:00Z")
    pub published_at: Option<String>,
    /// Release notes, usually markdown
    pub body: Option<String>,
    /// Downloadable assets, in the order the provider lists them
    pub assets: Vec<ReleaseAsset>,
}

/// Trait for release providers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Provider: Send + Sync {
    /// Get the API base URL.
    fn api_url(&self) -> &str;

    /// Fetch the releases of a repository, newest first.
    async fn get_releases(&self, repo: &RepoId) -> Result<Vec<Release>>;

    /// Look up the byte size of a downloadable file.
    async fn asset_size(&self, download_url: &str) -> Result<Option<u64>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_id_parse() {
        let repo: RepoId = "owner/repo".parse().unwrap();
        assert_eq!(repo.owner, "owner");
        assert_eq!(repo.repo, "repo");
    }

    #[test]
    fn test_repo_id_display() {
        let repo = RepoId {
            owner: "owner".into(),
            repo: "repo".into(),
        };
        assert_eq!(repo.to_string(), "owner/repo");
    }

    #[test]
    fn test_repo_id_invalid() {
        assert!("invalid".parse::<RepoId>().is_err());
        assert!("".parse::<RepoId>().is_err());
        assert!("/repo".parse::<RepoId>().is_err());
        assert!("owner/".parse::<RepoId>().is_err());
        assert!("a/b/c".parse::<RepoId>().is_err());
    }

    #[test]
    fn test_release_page_url() {
        let repo: RepoId = "0-Blu/StikJIT".parse().unwrap();
        assert_eq!(
            repo.release_page_url("v1.1.0"),
            "https://github.com/0-Blu/StikJIT/releases/tag/v1.1.0"
        );
    }
}
