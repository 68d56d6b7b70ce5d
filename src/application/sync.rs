//! Sync use case - brings the catalog in line with the latest upstream release.
//!
//! This use case coordinates:
//! - Fetching the release list from the provider
//! - Deciding whether the newest release is already recorded
//! - Preparing version and news entries
//! - Writing the updated catalog back

use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{debug, error, info, warn};

use crate::catalog::{
    Catalog, CatalogError, CatalogProfile, NewsEntry, ReleaseUpdate, VersionEntry,
    extract_version,
};
use crate::provider::{Provider, Release, RepoId};
use crate::runtime::Runtime;

/// Options for a sync run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Upstream repository whose releases feed the catalog
    pub repo: RepoId,
    /// Catalog document to update in place
    pub catalog_path: PathBuf,
    /// Constants used for new entries
    pub profile: CatalogProfile,
    /// Compute the update without writing it
    pub dry_run: bool,
}

/// Details of a catalog update.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateSummary {
    pub tag: String,
    pub previous_version: String,
    pub version: String,
    pub size: u64,
    pub news_added: bool,
    /// False when the run was a dry run
    pub written: bool,
}

/// Result of a sync run.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// The newest release is already the catalog's current version
    UpToDate { version: String },
    /// A new version was recorded
    Updated(UpdateSummary),
    /// The catalog could not be updated and was left untouched
    Failed { reason: String },
}

/// Sync use case
pub struct SyncUseCase<'a, R: Runtime, P: Provider + ?Sized> {
    runtime: &'a R,
    provider: &'a P,
}

impl<'a, R: Runtime, P: Provider + ?Sized> SyncUseCase<'a, R, P> {
    pub fn new(runtime: &'a R, provider: &'a P) -> Self {
        Self { runtime, provider }
    }

    /// Fetch the release list and update the catalog from its first element.
    #[tracing::instrument(skip(self, options))]
    pub async fn execute(&self, options: &SyncOptions) -> Result<SyncOutcome> {
        debug!(
            "Fetching releases of {} from {}",
            options.repo,
            self.provider.api_url()
        );
        let releases = self
            .provider
            .get_releases(&options.repo)
            .await
            .with_context(|| format!("Failed to fetch releases of {}", options.repo))?;

        self.apply_releases(&releases, options).await
    }

    /// Update the catalog from an already fetched release list (newest first).
    ///
    /// An empty list is an error. Problems with the catalog or the release
    /// contents are logged and reported as [`SyncOutcome::Failed`].
    pub async fn apply_releases(
        &self,
        releases: &[Release],
        options: &SyncOptions,
    ) -> Result<SyncOutcome> {
        let latest = releases.first().ok_or(CatalogError::EmptyReleaseList)?;
        debug!("Latest release is {}", latest.tag);

        match self.update_catalog(latest, options).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                error!(
                    "Failed to update {:?} from {}: {:#}",
                    options.catalog_path, latest.tag, e
                );
                Ok(SyncOutcome::Failed {
                    reason: format!("{:#}", e),
                })
            }
        }
    }

    async fn update_catalog(
        &self,
        latest: &Release,
        options: &SyncOptions,
    ) -> Result<SyncOutcome> {
        let mut catalog = Catalog::load(self.runtime, &options.catalog_path)?;
        let current = catalog.current_version();

        let version = extract_version(&latest.tag)
            .ok_or_else(|| CatalogError::UnrecognizedTag(latest.tag.clone()))?;

        if catalog.is_up_to_date(version) {
            info!("Catalog already at {}, no update needed", version);
            return Ok(SyncOutcome::UpToDate {
                version: version.to_string(),
            });
        }
        info!("Updating catalog from {} to {}", current, version);

        let mut update = ReleaseUpdate::prepare(latest, version)?;
        if update.size == 0 {
            update.size = self.lookup_size(&update.download_url).await;
        }

        let version_entry = VersionEntry::new(&update, &options.profile);
        let news = NewsEntry::new(
            &update,
            &options.profile,
            options.repo.release_page_url(&update.tag),
        );
        let changes = catalog.apply(&update, version_entry, news)?;

        let written = !options.dry_run;
        if written {
            catalog.save(self.runtime, &options.catalog_path)?;
        } else {
            debug!("Dry run, leaving {:?} untouched", options.catalog_path);
        }

        Ok(SyncOutcome::Updated(UpdateSummary {
            tag: update.tag,
            previous_version: changes.previous_version,
            version: update.version,
            size: update.size,
            news_added: changes.news_added,
            written,
        }))
    }

    /// Asks the provider for the asset size when the release listing reports none.
    async fn lookup_size(&self, download_url: &str) -> u64 {
        match self.provider.asset_size(download_url).await {
            Ok(Some(size)) => size,
            Ok(None) => {
                warn!("No size advertised for {}, recording 0", download_url);
                0
            }
            Err(e) => {
                warn!("Failed to look up size of {}: {:#}", download_url, e);
                0
            }
        }
    }
}
