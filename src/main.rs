use anyhow::Result;
use catalog_sync::catalog::CatalogProfile;
use catalog_sync::commands::{self, SyncRequest};
use clap::Parser;
use std::path::PathBuf;

/// catalog-sync - keep an app-catalog JSON file in step with GitHub releases
///
/// Fetches the releases of the upstream repository and, when the newest one
/// is not yet the catalog's current version, records it: a new entry in the
/// app's version history, refreshed top-level version fields and a news item.
///
/// Problems with the catalog itself (missing or malformed file, no .ipa asset,
/// write errors) are reported and leave the file untouched. The exit code is 1
/// only when no releases could be fetched or something unexpected failed.
///
/// Examples:
///   catalog-sync                           # Update ./repo.json from 0-Blu/StikJIT
///   catalog-sync -r owner/repo -c apps.json
///   catalog-sync --dry-run                 # Show what would change
#[derive(Parser, Debug)]
#[command(author, version = env!("CATALOG_SYNC_VERSION"), about)]
struct Cli {
    /// Upstream repository in the format "owner/repo"
    #[arg(
        long,
        short = 'r',
        env = "CATALOG_SYNC_REPO",
        value_name = "OWNER/REPO",
        default_value = "0-Blu/StikJIT"
    )]
    repo: String,

    /// Catalog JSON file to update in place
    #[arg(
        long,
        short = 'c',
        env = "CATALOG_SYNC_CATALOG",
        value_name = "PATH",
        default_value = "repo.json"
    )]
    catalog: PathBuf,

    /// GitHub API URL (defaults to https://api.github.com)
    #[arg(long = "api-url", env = "CATALOG_SYNC_API_URL", value_name = "URL")]
    api_url: Option<String>,

    /// App name used in news captions and titles
    #[arg(long, env = "CATALOG_SYNC_APP_NAME", value_name = "NAME")]
    app_name: Option<String>,

    /// Bundle identifier referenced by news entries
    #[arg(long, env = "CATALOG_SYNC_APP_ID", value_name = "ID")]
    app_id: Option<String>,

    /// Banner image URL for news entries
    #[arg(long, env = "CATALOG_SYNC_IMAGE_URL", value_name = "URL")]
    image_url: Option<String>,

    /// Tint color for news entries
    #[arg(long, env = "CATALOG_SYNC_TINT_COLOR", value_name = "COLOR")]
    tint_color: Option<String>,

    /// Minimum OS version recorded on new version entries
    #[arg(long, env = "CATALOG_SYNC_MIN_OS_VERSION", value_name = "VERSION")]
    min_os_version: Option<String>,

    /// Compute the update without writing the catalog
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn profile(&self) -> CatalogProfile {
        let defaults = CatalogProfile::default();
        CatalogProfile {
            app_name: self.app_name.clone().unwrap_or(defaults.app_name),
            app_id: self.app_id.clone().unwrap_or(defaults.app_id),
            image_url: self.image_url.clone().unwrap_or(defaults.image_url),
            tint_color: self.tint_color.clone().unwrap_or(defaults.tint_color),
            min_os_version: self.min_os_version.clone().unwrap_or(defaults.min_os_version),
        }
    }

    fn into_request(self) -> SyncRequest {
        SyncRequest {
            profile: self.profile(),
            repo: self.repo,
            catalog: self.catalog,
            api_url: self.api_url,
            dry_run: self.dry_run,
        }
    }
}

/// Log filter used when RUST_LOG is unset; keeps the sync progress lines visible.
const DEFAULT_LOG_FILTER: &str = "info";

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER))
        .init();
    let cli = Cli::parse();
    let runtime = catalog_sync::runtime::RealRuntime;

    commands::sync(runtime, cli.into_request()).await?;
    Ok(())
}
