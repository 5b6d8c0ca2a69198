use std::fs;
use std::path::Path;

use log::debug;
use walkdir::WalkDir;

use crate::error::DeployError;
use crate::pattern::PatternSet;

/// Copy a single file from src to dst, creating parent directories as needed.
pub fn copy_file(src: &Path, dst: &Path) -> Result<u64, DeployError> {
    if let Some(parent) = dst.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                // ENOSPC on Unix
                if e.raw_os_error() == Some(28) {
                    return DeployError::DiskFull {
                        path: parent.to_path_buf(),
                    };
                }
                DeployError::CreateDirFailed {
                    path: parent.to_path_buf(),
                    source: e,
                }
            })?;
        }
    }

    fs::copy(src, dst).map_err(|e| {
        if e.raw_os_error() == Some(28) {
            return DeployError::DiskFull {
                path: dst.to_path_buf(),
            };
        }
        DeployError::CopyFailed {
            src: src.to_path_buf(),
            dst: dst.to_path_buf(),
            source: e,
        }
    })
}

/// Recursively copy `src` into `dst`, skipping entries whose base name
/// matches `ignore`.
///
/// A matched directory is skipped together with its whole subtree. Symbolic
/// links are skipped outright, neither followed nor recreated. Empty
/// directories are preserved. Returns the number of files copied.
pub fn copy_tree(src: &Path, dst: &Path, ignore: &PatternSet) -> Result<u64, DeployError> {
    let mut files_copied = 0u64;

    let walker = WalkDir::new(src)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0 || !ignore.matches(&e.file_name().to_string_lossy())
        });

    for entry in walker {
        let entry = entry.map_err(|e| DeployError::Io(e.into()))?;
        let file_type = entry.file_type();

        if file_type.is_symlink() {
            debug!("Skipping symlink {}", entry.path().display());
            continue;
        }

        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let dst_path = if relative.as_os_str().is_empty() {
            dst.to_path_buf()
        } else {
            dst.join(relative)
        };

        if file_type.is_dir() {
            fs::create_dir_all(&dst_path).map_err(|e| DeployError::CreateDirFailed {
                path: dst_path.clone(),
                source: e,
            })?;
        } else {
            debug!("Copying {}", relative.display());
            copy_file(entry.path(), &dst_path)?;
            files_copied += 1;
        }
    }

    Ok(files_copied)
}
