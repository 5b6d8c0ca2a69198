//! In-place URI substitution across the deployed tree.

use std::fs;
use std::path::Path;

use log::debug;
use walkdir::WalkDir;

use crate::error::DeployError;
use crate::pattern::PatternSet;

/// Rewrite every literal occurrence of `source_uri` to `target_uri` in all
/// files under `target_dir` whose base name matches `include`.
///
/// Files are rewritten in place with no backup; a failure on any file
/// (unreadable, non-UTF-8, unwritable) aborts the run. Returns the number
/// of files actually rewritten.
pub fn replace_in_tree(
    target_dir: &Path,
    include: &PatternSet,
    source_uri: &str,
    target_uri: &str,
) -> Result<u64, DeployError> {
    let mut files_rewritten = 0u64;

    for entry in WalkDir::new(target_dir).follow_links(false) {
        let entry = entry.map_err(|e| DeployError::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if !include.matches(&entry.file_name().to_string_lossy()) {
            continue;
        }

        let path = entry.path();
        let contents = fs::read_to_string(path).map_err(|e| DeployError::RewriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        if !contents.contains(source_uri) {
            continue;
        }

        debug!("Replacing in {}", path.display());
        let rewritten = contents.replace(source_uri, target_uri);
        fs::write(path, rewritten).map_err(|e| DeployError::RewriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        files_rewritten += 1;
    }

    Ok(files_rewritten)
}
