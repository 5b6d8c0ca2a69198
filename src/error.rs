use std::path::PathBuf;
use thiserror::Error;

/// Deployment error types
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Cannot find configuration file {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Failed to read configuration file {path}")]
    ConfigUnreadable {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    #[error("Missing required option '{option}' in [{section}]")]
    MissingOption {
        section: &'static str,
        option: &'static str,
    },

    #[error("Invalid value '{value}' for option '{option}' in [{section}]")]
    InvalidValue {
        section: &'static str,
        option: &'static str,
        value: String,
    },

    #[error("Unknown version type '{0}' (expected git, random or date)")]
    UnknownVersionType(String),

    #[error("Git ref for branch '{branch}' not found: {path}")]
    GitRefMissing { branch: String, path: PathBuf },

    #[error("Source path does not exist: {path}")]
    SourceMissing { path: PathBuf },

    #[error("Target already exists: {path}")]
    TargetExists { path: PathBuf },

    #[error("Failed to remove existing target {path}")]
    RemoveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No space left on device for {path}")]
    DiskFull { path: PathBuf },

    #[error("Failed to copy {src} to {dst}")]
    CopyFailed {
        src: PathBuf,
        dst: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory: {path}")]
    CreateDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to rewrite {path}")]
    RewriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("memcached at {addr} is unavailable or rejected the write")]
    Memcached {
        addr: String,
        #[source]
        source: memcache::MemcacheError,
    },

    #[error("redis at {addr} is unavailable or rejected the write")]
    Redis {
        addr: String,
        #[source]
        source: redis::RedisError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
