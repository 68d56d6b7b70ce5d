use anyhow::Result;
use log::debug;
use std::path::PathBuf;

use crate::{
    application::{SyncOptions, SyncOutcome, SyncUseCase, UpdateSummary},
    catalog::CatalogProfile,
    provider::{Provider, RepoId},
    runtime::Runtime,
};

pub mod config;

use config::Config;

/// Everything the CLI collects for a sync run.
#[derive(Debug, Clone)]
pub struct SyncRequest {
    pub repo: String,
    pub catalog: PathBuf,
    pub api_url: Option<String>,
    pub profile: CatalogProfile,
    pub dry_run: bool,
}

#[tracing::instrument(skip(runtime, request))]
pub async fn sync<R: Runtime>(runtime: R, request: SyncRequest) -> Result<SyncOutcome> {
    let repo = request.repo.parse::<RepoId>()?;
    let config = Config::new(runtime, request.api_url)?;
    let options = SyncOptions {
        repo,
        catalog_path: request.catalog,
        profile: request.profile,
        dry_run: request.dry_run,
    };
    run(&config, &options).await
}

pub async fn run<R: Runtime, P: Provider>(
    config: &Config<R, P>,
    options: &SyncOptions,
) -> Result<SyncOutcome> {
    debug!(
        "Syncing {:?} with releases of {}",
        options.catalog_path, options.repo
    );
    let use_case = SyncUseCase::new(&config.runtime, &config.provider);
    let outcome = use_case.execute(options).await?;
    print_outcome(&options.repo, &outcome);
    Ok(outcome)
}

fn print_outcome(repo: &RepoId, outcome: &SyncOutcome) {
    match outcome {
        SyncOutcome::UpToDate { version } => {
            println!("  up-to-date {} {}", repo, version);
        }
        SyncOutcome::Updated(summary) => {
            println!("{}", describe_update(repo, summary));
        }
        SyncOutcome::Failed { reason } => {
            println!("{}", describe_failure(repo, reason));
        }
    }
}

fn describe_failure(repo: &RepoId, reason: &str) -> String {
    format!("      failed {}: {}", repo, reason)
}

fn describe_update(repo: &RepoId, summary: &UpdateSummary) -> String {
    let verb = if summary.written {
        "     updated"
    } else {
        "would update"
    };
    let news = if summary.news_added {
        ""
    } else {
        " (news entry already present)"
    };
    format!(
        "{} {} {} -> {} ({}, {} bytes){}",
        verb, repo, summary.previous_version, summary.version, summary.tag, summary.size, news
    )
}
