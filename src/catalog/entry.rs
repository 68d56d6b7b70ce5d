//! Records inserted into the catalog document.

use serde::Serialize;

use super::release::ReleaseUpdate;

/// Per-app constants used when building catalog entries.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogProfile {
    /// Display name used in news captions and titles
    pub app_name: String,
    /// Bundle identifier referenced by news entries
    pub app_id: String,
    /// Banner shown with news entries
    pub image_url: String,
    /// Accent color of news entries
    pub tint_color: String,
    /// Minimum OS version recorded on new version entries
    pub min_os_version: String,
}

impl Default for CatalogProfile {
    fn default() -> Self {
        Self {
            app_name: "StikJIT".to_string(),
            app_id: "com.stik.sj".to_string(),
            image_url: "https://github.com/0-Blu/StikJIT/blob/main/assets/StikJIT_Banner.png?raw=true"
                .to_string(),
            tint_color: "#3F72AF".to_string(),
            min_os_version: "17.4".to_string(),
        }
    }
}

/// One element of `apps[0].versions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionEntry {
    pub version: String,
    pub date: String,
    pub localized_description: String,
    #[serde(rename = "downloadURL")]
    pub download_url: String,
    pub size: u64,
    #[serde(rename = "minOSVersion")]
    pub min_os_version: String,
}

impl VersionEntry {
    pub fn new(update: &ReleaseUpdate, profile: &CatalogProfile) -> Self {
        Self {
            version: update.version.clone(),
            date: update.published.iso_date(),
            localized_description: update.description.clone(),
            download_url: update.download_url.clone(),
            size: update.size,
            min_os_version: profile.min_os_version.clone(),
        }
    }
}

/// One element of the top-level `news` feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsEntry {
    #[serde(rename = "appID")]
    pub app_id: String,
    pub caption: String,
    pub date: String,
    pub identifier: String,
    #[serde(rename = "imageURL")]
    pub image_url: String,
    pub notify: bool,
    pub tint_color: String,
    pub title: String,
    pub url: String,
}

impl NewsEntry {
    /// Natural key of the news entry announcing `tag`.
    pub fn identifier_for(tag: &str) -> String {
        format!("release-{}", tag)
    }

    pub fn new(update: &ReleaseUpdate, profile: &CatalogProfile, release_url: String) -> Self {
        Self {
            app_id: profile.app_id.clone(),
            caption: format!("Update of {} just got released!", profile.app_name),
            date: update.published.iso_date(),
            identifier: Self::identifier_for(&update.tag),
            image_url: profile.image_url.clone(),
            notify: true,
            tint_color: profile.tint_color.clone(),
            title: format!(
                "{} - {}  {}",
                update.version,
                profile.app_name,
                update.published.short_date()
            ),
            url: release_url,
        }
    }
}
