//! Deployment orchestration.
//!
//! One run is a strictly sequential pipeline: version generation, tree copy,
//! URI substitution, publication. Each step blocks until complete and the
//! first failure aborts the run, leaving whatever partial state exists.

use std::fs;
use std::path::PathBuf;

use log::info;

use crate::config::Config;
use crate::copier::copy_tree;
use crate::error::DeployError;
use crate::publisher::publish;
use crate::substituter::replace_in_tree;
use crate::version;

/// Placeholder expanded with the generated version in the target-directory
/// and target-URI templates.
const VERSION_PLACEHOLDER: &str = "{version}";

/// What a completed run produced.
#[derive(Debug)]
pub struct DeployOutcome {
    /// The version stamped on this build
    pub version: String,
    /// Fully expanded target directory
    pub target_dir: PathBuf,
    /// Fully expanded, published target URI
    pub target_uri: String,
    /// Files copied into the target
    pub files_copied: u64,
    /// Files rewritten by URI substitution
    pub files_rewritten: u64,
}

/// Log a step banner the way the run's operators expect to scan for.
fn step(name: &str) {
    info!("{}", "=".repeat(75));
    info!("{name}");
}

/// Execute one full deployment run.
pub fn run(config: &Config) -> Result<DeployOutcome, DeployError> {
    let project = &config.project;

    if !project.source_dir.exists() {
        return Err(DeployError::SourceMissing {
            path: project.source_dir.clone(),
        });
    }

    step("Generating version...");
    info!("generating {} version", config.version.kind());
    let version = version::generate(&config.version, &project.path)?;
    let target_dir = PathBuf::from(
        project
            .target_template
            .replace(VERSION_PLACEHOLDER, &version),
    );
    let target_uri = project
        .target_uri_template
        .replace(VERSION_PLACEHOLDER, &version);

    info!("version = {version}");
    info!("source = {}", project.source_dir.display());
    info!("target = {}", target_dir.display());

    step("Performing file copy...");
    if target_dir.exists() {
        if !project.overwrite {
            return Err(DeployError::TargetExists { path: target_dir });
        }

        info!("Removing existing target: {}", target_dir.display());
        fs::remove_dir_all(&target_dir).map_err(|e| DeployError::RemoveFailed {
            path: target_dir.clone(),
            source: e,
        })?;
    }

    info!("Creating target: {}", target_dir.display());
    let files_copied = copy_tree(&project.source_dir, &target_dir, &project.ignore_files)?;

    step("Substituting URIs in files...");
    let files_rewritten = if project.source_uri != target_uri {
        info!(
            "Replacing instances of {} with {}...",
            project.source_uri, target_uri
        );
        replace_in_tree(
            &target_dir,
            &project.replace_files,
            &project.source_uri,
            &target_uri,
        )?
    } else {
        // source and target URIs match; nothing to rewrite
        0
    };

    step("Writing version and path to output targets...");
    publish(&config.output, &version, &target_uri)?;

    Ok(DeployOutcome {
        version,
        target_dir,
        target_uri,
        files_copied,
        files_rewritten,
    })
}
