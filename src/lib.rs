//! # Static Deploy
//!
//! Versioned static-asset deployment.
//!
//! One invocation stamps a build with a version string, copies the asset
//! tree to a versioned target directory, rewrites embedded URIs to point at
//! the new version, and publishes the version/URI pair to external stores
//! (memcached, redis, flat files).
//!
//! ## Pipeline
//!
//! The run is a single synchronous sequence driven entirely by an ini
//! configuration file:
//!
//! 1. version generation (git ref, random token, or timestamp)
//! 2. tree copy with glob exclusions
//! 3. in-place URI substitution in glob-selected files
//! 4. publication to the configured sinks
//!
//! ## Usage
//!
//! ```ignore
//! use static_deploy::config::Config;
//! use static_deploy::deployer;
//!
//! let config = Config::load(Path::new("build.ini"))?;
//! let outcome = deployer::run(&config)?;
//! println!("deployed {}", outcome.version);
//! ```

/// CLI surface and ini-file configuration
pub mod config;

/// Tree copy with glob exclusions
pub mod copier;

/// Run orchestration
pub mod deployer;

/// Error types for deployment operations
pub mod error;

/// Glob pattern sets for file selection
pub mod pattern;

/// Version/URI publication sinks
pub mod publisher;

/// In-place URI substitution
pub mod substituter;

/// Version-generation strategies
pub mod version;
