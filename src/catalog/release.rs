//! Turning an upstream release into the values written to the catalog.

use anyhow::Result;
use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::LazyLock;

use crate::description;
use crate::provider::{Release, ReleaseAsset};

use super::CatalogError;

static VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+.\d+.\d+").expect("valid regex"));

/// File extension of the installable app bundle.
pub const IPA_EXTENSION: &str = ".ipa";

const PUBLISHED_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Pulls the first `major.minor.patch` out of a release tag ("v1.2.3-beta" -> "1.2.3").
///
/// Any single character separates the components, so "v1-2-3" yields "1-2-3".
pub fn extract_version(tag: &str) -> Option<&str> {
    VERSION.find(tag).map(|m| m.as_str())
}

/// First asset whose name ends in `.ipa`, in listing order.
pub fn find_ipa(assets: &[ReleaseAsset]) -> Option<&ReleaseAsset> {
    assets.iter().find(|a| a.name.ends_with(IPA_EXTENSION))
}

/// Publication timestamp of a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishedDate(NaiveDateTime);

impl PublishedDate {
    pub fn parse(raw: &str) -> Result<Self, CatalogError> {
        NaiveDateTime::parse_from_str(raw, PUBLISHED_FORMAT)
            .map(PublishedDate)
            .map_err(|_| CatalogError::InvalidTimestamp(raw.to_string()))
    }

    /// `YYYY-MM-DD`, as stored in `versionDate` and version entries.
    pub fn iso_date(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }

    /// `DD/MM/YY`, as shown in news titles.
    pub fn short_date(&self) -> String {
        self.0.format("%d/%m/%y").to_string()
    }
}

/// Everything the catalog needs to know about a new release.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseUpdate {
    pub tag: String,
    pub version: String,
    pub published: PublishedDate,
    pub description: String,
    pub download_url: String,
    pub size: u64,
}

impl ReleaseUpdate {
    /// Validates `release` and derives the catalog values from it.
    ///
    /// `version` is the value already extracted from the tag with
    /// [`extract_version`].
    pub fn prepare(release: &Release, version: &str) -> Result<Self> {
        let published_at = release
            .published_at
            .as_deref()
            .ok_or_else(|| CatalogError::InvalidTimestamp("<missing>".to_string()))?;
        let published = PublishedDate::parse(published_at)?;

        let description = description::describe(release.body.as_deref());

        let asset = find_ipa(&release.assets).ok_or_else(|| CatalogError::MissingAsset {
            tag: release.tag.clone(),
        })?;

        Ok(ReleaseUpdate {
            tag: release.tag.clone(),
            version: version.to_string(),
            published,
            description,
            download_url: asset.download_url.clone(),
            size: asset.size,
        })
    }
}
