//! The local app-catalog document.
//!
//! The document is kept as an order-preserving JSON tree rather than a fully
//! typed struct: only `apps[0]` and `news` are interpreted, and every other
//! field is written back exactly where it was.

mod entry;
mod release;

use anyhow::{Context, Result};
use log::debug;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

pub use entry::{CatalogProfile, NewsEntry, VersionEntry};
pub use release::{IPA_EXTENSION, PublishedDate, ReleaseUpdate, extract_version, find_ipa};

/// Version reported when `apps[0].version` is absent.
pub const UNKNOWN_VERSION: &str = "unknown";

/// Failures specific to reading or updating the catalog.
#[derive(Debug, PartialEq)]
pub enum CatalogError {
    /// The provider returned no releases
    EmptyReleaseList,
    /// The release tag has no `major.minor.patch` component
    UnrecognizedTag(String),
    /// `published_at` is missing or not `YYYY-MM-DDTHH:MM:SSZ`
    InvalidTimestamp(String),
    /// No `.ipa` asset is attached to the release
    MissingAsset { tag: String },
    /// The document has no `apps[0]` object
    MissingApp,
    /// The document does not have the expected shape
    MalformedDocument(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::EmptyReleaseList => write!(f, "No releases found"),
            CatalogError::UnrecognizedTag(tag) => {
                write!(f, "Tag format not recognized: {}", tag)
            }
            CatalogError::InvalidTimestamp(raw) => {
                write!(f, "Invalid release timestamp: {}", raw)
            }
            CatalogError::MissingAsset { tag } => {
                write!(f, "No {} asset found in release {}", IPA_EXTENSION, tag)
            }
            CatalogError::MissingApp => write!(f, "Catalog has no apps[0] entry"),
            CatalogError::MalformedDocument(msg) => write!(f, "Malformed catalog: {}", msg),
        }
    }
}

impl std::error::Error for CatalogError {}

/// What [`Catalog::apply`] changed.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedChanges {
    pub previous_version: String,
    pub news_added: bool,
}

/// An app-catalog document.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    root: Map<String, Value>,
}

impl Catalog {
    pub fn parse(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content).context("Failed to parse catalog JSON")?;
        match value {
            Value::Object(root) => Ok(Self { root }),
            _ => Err(CatalogError::MalformedDocument("top level is not an object".into()).into()),
        }
    }

    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime + ?Sized>(runtime: &R, path: &Path) -> Result<Self> {
        debug!("Loading catalog from {:?}", path);
        let content = runtime.read_to_string(path)?;
        Self::parse(&content).with_context(|| format!("Invalid catalog {}", path.display()))
    }

    /// Pretty-printed document with a trailing newline.
    pub fn to_pretty_json(&self) -> Result<String> {
        let mut out = serde_json::to_string_pretty(&self.root)?;
        out.push('\n');
        Ok(out)
    }

    /// Writes the document to `path`, replacing the previous contents.
    ///
    /// The new contents are staged next to the target and renamed over it, so
    /// a failed write leaves the old document in place.
    #[tracing::instrument(skip(self, runtime))]
    pub fn save<R: Runtime + ?Sized>(&self, runtime: &R, path: &Path) -> Result<()> {
        let content = self.to_pretty_json()?;
        let staged = staging_path(path);

        debug!("Writing catalog to {:?} via {:?}", path, staged);
        runtime
            .write(&staged, content.as_bytes())
            .context("Failed to stage catalog")?;

        if let Err(e) = runtime.rename(&staged, path) {
            let _ = runtime.remove_file(&staged);
            return Err(e.context(format!("Failed to replace {}", path.display())));
        }
        Ok(())
    }

    fn app(&self) -> Option<&Map<String, Value>> {
        self.root
            .get("apps")
            .and_then(Value::as_array)
            .and_then(|apps| apps.first())
            .and_then(Value::as_object)
    }

    fn app_mut(&mut self) -> Result<&mut Map<String, Value>, CatalogError> {
        self.root
            .get_mut("apps")
            .and_then(Value::as_array_mut)
            .and_then(|apps| apps.first_mut())
            .and_then(Value::as_object_mut)
            .ok_or(CatalogError::MissingApp)
    }

    /// `apps[0].version`, or [`UNKNOWN_VERSION`].
    pub fn current_version(&self) -> String {
        self.app()
            .and_then(|app| app.get("version"))
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_VERSION)
            .to_string()
    }

    /// Whether `apps[0].versions` already lists `version`.
    pub fn has_version(&self, version: &str) -> bool {
        self.app()
            .and_then(|app| app.get("versions"))
            .and_then(Value::as_array)
            .is_some_and(|versions| {
                versions
                    .iter()
                    .any(|v| v.get("version").and_then(Value::as_str) == Some(version))
            })
    }

    /// True only when `version` is both in the history and the current version.
    ///
    /// A version present in the history but not current still needs an update.
    pub fn is_up_to_date(&self, version: &str) -> bool {
        self.has_version(version) && self.current_version() == version
    }

    pub fn has_news(&self, identifier: &str) -> bool {
        self.root
            .get("news")
            .and_then(Value::as_array)
            .is_some_and(|news| {
                news.iter()
                    .any(|n| n.get("identifier").and_then(Value::as_str) == Some(identifier))
            })
    }

    /// Records `update` in the document: prepends a version entry, refreshes
    /// the top-level fields of `apps[0]` and appends `news` unless an entry
    /// with the same identifier exists.
    pub fn apply(
        &mut self,
        update: &ReleaseUpdate,
        version_entry: VersionEntry,
        news: NewsEntry,
    ) -> Result<AppliedChanges> {
        let previous_version = self.current_version();
        let version_entry = to_json(&version_entry)?;
        let news_entry = to_json(&news)?;

        if self.root.get("news").is_some_and(|n| !n.is_array()) {
            return Err(CatalogError::MalformedDocument("news is not a list".into()).into());
        }

        let app = self.app_mut()?;

        let versions = app
            .entry("versions")
            .or_insert_with(|| Value::Array(Vec::new()))
            .as_array_mut()
            .ok_or_else(|| CatalogError::MalformedDocument("apps[0].versions is not a list".into()))?;
        versions.insert(0, version_entry);

        app.insert("version".into(), Value::from(update.version.clone()));
        app.insert("versionDate".into(), Value::from(update.published.iso_date()));
        app.insert(
            "versionDescription".into(),
            Value::from(update.description.clone()),
        );
        app.insert("downloadURL".into(), Value::from(update.download_url.clone()));
        app.insert("size".into(), Value::from(update.size));

        let news_added = !self.has_news(&news.identifier);
        let feed = self
            .root
            .entry("news")
            .or_insert_with(|| Value::Array(Vec::new()))
            .as_array_mut()
            .ok_or_else(|| CatalogError::MalformedDocument("news is not a list".into()))?;
        if news_added {
            feed.push(news_entry);
        } else {
            debug!("News entry {} already present", news.identifier);
        }

        Ok(AppliedChanges {
            previous_version,
            news_added,
        })
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).context("Failed to serialize catalog entry")
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
