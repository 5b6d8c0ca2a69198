//! Publication of the version/URI pair to the configured sinks.
//!
//! Sinks run in a fixed order (memcached, redis, flat files); the first
//! failure aborts the remaining writes.

use std::fs;

use log::info;
use redis::Commands;

use crate::config::{OutputConfig, StoreTarget};
use crate::error::DeployError;

/// Write the version and target URI to every configured sink.
pub fn publish(output: &OutputConfig, version: &str, target_uri: &str) -> Result<(), DeployError> {
    if let Some(target) = &output.memcached {
        publish_memcached(target, version, target_uri)?;
    }
    if let Some(target) = &output.redis {
        publish_redis(target, version, target_uri)?;
    }
    write_output_files(output, version, target_uri)
}

/// The (key, value) pairs a store sink actually writes: version under the
/// version key, URI under the URI key, each only when configured.
fn configured_keys<'a>(
    target: &'a StoreTarget,
    version: &'a str,
    target_uri: &'a str,
) -> impl Iterator<Item = (&'a str, &'a str)> {
    [
        (target.version_key.as_deref(), version),
        (target.uri_key.as_deref(), target_uri),
    ]
    .into_iter()
    .filter_map(|(key, value)| key.map(|k| (k, value)))
}

fn publish_memcached(
    target: &StoreTarget,
    version: &str,
    target_uri: &str,
) -> Result<(), DeployError> {
    let addr = target.addr();
    let client = memcache::connect(format!("memcache://{addr}")).map_err(|e| {
        DeployError::Memcached {
            addr: addr.clone(),
            source: e,
        }
    })?;

    for (key, value) in configured_keys(target, version, target_uri) {
        info!("Setting memcached key {key} to {value}");
        client.set(key, value, 0).map_err(|e| DeployError::Memcached {
            addr: addr.clone(),
            source: e,
        })?;
    }

    Ok(())
}

fn publish_redis(
    target: &StoreTarget,
    version: &str,
    target_uri: &str,
) -> Result<(), DeployError> {
    let addr = target.addr();
    let client =
        redis::Client::open(format!("redis://{addr}/")).map_err(|e| DeployError::Redis {
            addr: addr.clone(),
            source: e,
        })?;
    let mut con = client.get_connection().map_err(|e| DeployError::Redis {
        addr: addr.clone(),
        source: e,
    })?;

    for (key, value) in configured_keys(target, version, target_uri) {
        info!("Setting redis key {key} to {value}");
        con.set::<_, _, ()>(key, value).map_err(|e| DeployError::Redis {
            addr: addr.clone(),
            source: e,
        })?;
    }

    Ok(())
}

/// Overwrite the flat-file sinks with the literal version / target URI.
fn write_output_files(
    output: &OutputConfig,
    version: &str,
    target_uri: &str,
) -> Result<(), DeployError> {
    for (path, contents) in [
        (&output.version_file, version),
        (&output.uri_file, target_uri),
    ] {
        if let Some(path) = path {
            info!("Writing file {} with {}", path.display(), contents);
            fs::write(path, contents).map_err(|e| DeployError::WriteFailed {
                path: path.clone(),
                source: e,
            })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn store(version_key: Option<&str>, uri_key: Option<&str>) -> StoreTarget {
        StoreTarget {
            host: "127.0.0.1".to_string(),
            port: 1, // nothing listens here
            version_key: version_key.map(str::to_string),
            uri_key: uri_key.map(str::to_string),
        }
    }

    #[test]
    fn test_configured_keys_both() {
        let target = store(Some("ver"), Some("uri"));
        let pairs: Vec<_> = configured_keys(&target, "v-1", "http://cdn/v-1").collect();
        assert_eq!(pairs, vec![("ver", "v-1"), ("uri", "http://cdn/v-1")]);
    }

    #[test]
    fn test_configured_keys_partial() {
        let target = store(None, Some("uri"));
        let pairs: Vec<_> = configured_keys(&target, "v-1", "http://cdn/v-1").collect();
        assert_eq!(pairs, vec![("uri", "http://cdn/v-1")]);

        let target = store(None, None);
        assert_eq!(configured_keys(&target, "v", "u").count(), 0);
    }

    #[test]
    fn test_publish_no_sinks_is_noop() {
        let output = OutputConfig::default();
        publish(&output, "v-1", "http://cdn/v-1").unwrap();
    }

    #[test]
    fn test_publish_writes_output_files() {
        let temp = TempDir::new().unwrap();
        let version_file = temp.path().join("static.version");
        let uri_file = temp.path().join("static.uri");

        let output = OutputConfig {
            version_file: Some(version_file.clone()),
            uri_file: Some(uri_file.clone()),
            ..OutputConfig::default()
        };
        publish(&output, "v-123", "http://cdn/v-123").unwrap();

        assert_eq!(fs::read_to_string(&version_file).unwrap(), "v-123");
        assert_eq!(fs::read_to_string(&uri_file).unwrap(), "http://cdn/v-123");
    }

    #[test]
    fn test_publish_overwrites_existing_files() {
        let temp = TempDir::new().unwrap();
        let version_file = temp.path().join("static.version");
        fs::write(&version_file, "stale-version").unwrap();

        let output = OutputConfig {
            version_file: Some(version_file.clone()),
            ..OutputConfig::default()
        };
        publish(&output, "v-2", "http://cdn/v-2").unwrap();

        assert_eq!(fs::read_to_string(&version_file).unwrap(), "v-2");
    }

    #[test]
    fn test_publish_unreachable_memcached_fails() {
        let output = OutputConfig {
            memcached: Some(store(Some("ver"), None)),
            ..OutputConfig::default()
        };
        let result = publish(&output, "v-1", "http://cdn/v-1");
        assert!(matches!(result, Err(DeployError::Memcached { .. })));
    }

    #[test]
    fn test_publish_unreachable_redis_fails() {
        let output = OutputConfig {
            redis: Some(store(Some("ver"), None)),
            ..OutputConfig::default()
        };
        let result = publish(&output, "v-1", "http://cdn/v-1");
        assert!(matches!(result, Err(DeployError::Redis { .. })));
    }

    #[test]
    fn test_failed_store_sink_aborts_file_writes() {
        let temp = TempDir::new().unwrap();
        let version_file = temp.path().join("static.version");

        let output = OutputConfig {
            redis: Some(store(Some("ver"), None)),
            version_file: Some(version_file.clone()),
            ..OutputConfig::default()
        };
        assert!(publish(&output, "v-1", "http://cdn/v-1").is_err());
        assert!(!version_file.exists());
    }

    #[test]
    fn test_write_failure_names_path() {
        let output = OutputConfig {
            version_file: Some(PathBuf::from("/nonexistent-dir/static.version")),
            ..OutputConfig::default()
        };
        let result = publish(&output, "v-1", "u");
        assert!(matches!(result, Err(DeployError::WriteFailed { .. })));
    }
}
