//! Version-string generation strategies.
//!
//! A run computes exactly one version, up front, and every later step (target
//! path expansion, URI rewriting, publication) observes that same value.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::debug;
use rand::Rng;

use crate::error::DeployError;

/// Alphabet for the `random` strategy: consonants (both cases) plus digits,
/// vowels excluded.
const RANDOM_ALPHABET: &[u8] = b"BCDFGHJKLMNPQRSTVWXYZbcdfghjklmnpqrstvwxyz0123456789";

/// How a version string is produced, one variant per strategy.
///
/// Each variant carries its own option set; the selection is made once at
/// configuration-load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionStrategy {
    /// Head ref of a branch under `<project path>/.git/refs/heads/`.
    Git {
        branch: String,
        prefix: String,
        max_length: usize,
    },
    /// Fixed-length token drawn from [`RANDOM_ALPHABET`].
    Random { prefix: String, length: usize },
    /// Local time formatted with a strftime string, or Unix epoch seconds
    /// when the format is the literal `ts`.
    Date { prefix: String, format: String },
}

impl VersionStrategy {
    #[inline]
    pub fn kind(&self) -> &'static str {
        match self {
            VersionStrategy::Git { .. } => "git",
            VersionStrategy::Random { .. } => "random",
            VersionStrategy::Date { .. } => "date",
        }
    }
}

/// Generate the version for this run.
///
/// `project_path` is the base directory for the `git` strategy's ref lookup.
#[must_use = "the version namespaces the whole deployment"]
pub fn generate(strategy: &VersionStrategy, project_path: &Path) -> Result<String, DeployError> {
    match strategy {
        VersionStrategy::Git {
            branch,
            prefix,
            max_length,
        } => git_ref_version(project_path, branch, prefix, *max_length),
        VersionStrategy::Random { prefix, length } => Ok(random_version(prefix, *length)),
        VersionStrategy::Date { prefix, format } => Ok(datetime_version(prefix, format)),
    }
}

/// Read the first line of `.git/refs/heads/<branch>`, truncate, prefix.
///
/// A missing ref file is an explicit error rather than an absent value, so
/// a bad branch name can never leak an empty version downstream.
pub fn git_ref_version(
    base_path: &Path,
    branch: &str,
    prefix: &str,
    max_length: usize,
) -> Result<String, DeployError> {
    debug!("checking ref on branch {branch}");
    let ref_path: PathBuf = base_path.join(".git").join("refs").join("heads").join(branch);
    if !ref_path.exists() {
        return Err(DeployError::GitRefMissing {
            branch: branch.to_string(),
            path: ref_path,
        });
    }

    let contents = fs::read_to_string(&ref_path)?;
    let head = contents.lines().next().unwrap_or("").trim();
    let truncated: String = head.chars().take(max_length).collect();
    Ok(format!("{prefix}{truncated}"))
}

/// Random token of exactly `length` characters after the prefix.
pub fn random_version(prefix: &str, length: usize) -> String {
    let mut rng = rand::rng();
    let token: String = (0..length)
        .map(|_| RANDOM_ALPHABET[rng.random_range(0..RANDOM_ALPHABET.len())] as char)
        .collect();
    format!("{prefix}{token}")
}

/// Current local time rendered with `format`, or epoch seconds for `"ts"`.
pub fn datetime_version(prefix: &str, format: &str) -> String {
    datetime_version_at(prefix, format, Local::now())
}

fn datetime_version_at(prefix: &str, format: &str, now: DateTime<Local>) -> String {
    if format == "ts" {
        format!("{prefix}{}", now.timestamp())
    } else {
        format!("{prefix}{}", now.format(format))
    }
}
