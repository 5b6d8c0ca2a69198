//! CLI surface and ini-file configuration for static-asset deployment.
//!
//! Everything the run does is read from one ini file at startup and frozen
//! into an immutable [`Config`] that is passed explicitly to each component.

use std::path::{Path, PathBuf};

use clap::Parser;
use ini::{Ini, Properties};

use crate::error::DeployError;
use crate::pattern::PatternSet;
use crate::version::VersionStrategy;

/// Configuration file looked up when `-c` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "build.ini";

/// Versioned static-asset deployment
#[derive(Parser, Debug)]
#[command(name = "static-deploy")]
#[command(version)]
#[command(about = "Builds and publishes versioned static assets")]
pub struct Cli {
    /// Configuration file to read
    #[arg(
        short = 'c',
        long = "config-file",
        value_name = "FILE",
        default_value = DEFAULT_CONFIG_FILE
    )]
    pub config_file: PathBuf,
}

/// The `[project]` section: where assets come from and where they go.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    /// Project root; base for the git ref lookup
    pub path: PathBuf,
    /// Asset tree to deploy, joined under `path`
    pub source_dir: PathBuf,
    /// Target directory template, may contain `{version}`
    pub target_template: String,
    /// Remove a pre-existing target instead of failing
    pub overwrite: bool,
    /// Base names excluded from the copy
    pub ignore_files: PatternSet,
    /// Base names rewritten during URI substitution
    pub replace_files: PatternSet,
    /// Literal URI replaced in matched files
    pub source_uri: String,
    /// Replacement URI template, may contain `{version}`
    pub target_uri_template: String,
}

/// One key-value store sink, present only when its host is configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreTarget {
    pub host: String,
    pub port: u16,
    /// Key receiving the version string, if any
    pub version_key: Option<String>,
    /// Key receiving the target URI, if any
    pub uri_key: Option<String>,
}

impl StoreTarget {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// The `[output]` section: sinks the version/URI pair is published to.
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    pub memcached: Option<StoreTarget>,
    pub redis: Option<StoreTarget>,
    pub version_file: Option<PathBuf>,
    pub uri_file: Option<PathBuf>,
}

/// Immutable runtime configuration for one deployment run.
#[derive(Debug, Clone)]
pub struct Config {
    pub project: ProjectConfig,
    pub version: VersionStrategy,
    pub output: OutputConfig,
}

impl Config {
    /// Load and validate the configuration file.
    pub fn load(path: &Path) -> Result<Self, DeployError> {
        if !path.exists() {
            return Err(DeployError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let ini = Ini::load_from_file(path).map_err(|e| DeployError::ConfigUnreadable {
            path: path.to_path_buf(),
            source: e,
        })?;

        let project_section = SectionView::new(&ini, "project");
        let version_section = SectionView::new(&ini, "version");
        let output_section = SectionView::new(&ini, "output");

        let project = Self::load_project(&project_section)?;
        let version = Self::load_version(&version_section, &project_section)?;
        let output = Self::load_output(&output_section)?;

        Ok(Config {
            project,
            version,
            output,
        })
    }

    fn load_project(section: &SectionView<'_>) -> Result<ProjectConfig, DeployError> {
        let path = expand_user(section.get("path").unwrap_or("."));
        let source_dir = format!(
            "{}/{}",
            path.trim_end_matches('/'),
            section.require("source_dir")?.trim_start_matches('/')
        );
        let target_template = expand_user(section.require("target_dir")?);

        Ok(ProjectConfig {
            path: PathBuf::from(path),
            source_dir: PathBuf::from(source_dir),
            target_template,
            overwrite: section.get_bool("overwrite", false)?,
            ignore_files: PatternSet::parse(
                section.get("ignore_files").unwrap_or(""),
                "project",
                "ignore_files",
            )?,
            replace_files: PatternSet::parse(
                section.get("replace_files").unwrap_or(""),
                "project",
                "replace_files",
            )?,
            source_uri: section.require("source_uri")?.to_string(),
            target_uri_template: section.require("target_uri")?.to_string(),
        })
    }

    fn load_version(
        section: &SectionView<'_>,
        project: &SectionView<'_>,
    ) -> Result<VersionStrategy, DeployError> {
        let prefix = section.get("prefix").unwrap_or("").to_string();

        match section.require("type")? {
            "git" => Ok(VersionStrategy::Git {
                branch: project.get("branch").unwrap_or("master").to_string(),
                prefix,
                max_length: section.get_usize("length", 64)?,
            }),
            "random" => Ok(VersionStrategy::Random {
                prefix,
                length: section.get_usize("length", 8)?,
            }),
            "date" => Ok(VersionStrategy::Date {
                prefix,
                format: section.get("format").unwrap_or("%Y%m%d%H%M%S").to_string(),
            }),
            other => Err(DeployError::UnknownVersionType(other.to_string())),
        }
    }

    fn load_output(section: &SectionView<'_>) -> Result<OutputConfig, DeployError> {
        Ok(OutputConfig {
            memcached: Self::load_store(
                section,
                "memcache_host",
                "memcache_port",
                "memcache_version_key",
                "memcache_uri_key",
            )?,
            redis: Self::load_store(
                section,
                "redis_host",
                "redis_port",
                "redis_version_key",
                "redis_uri_key",
            )?,
            version_file: section
                .get("version_file")
                .map(|p| PathBuf::from(expand_user(p))),
            uri_file: section.get("uri_file").map(|p| PathBuf::from(expand_user(p))),
        })
    }

    /// A store sink exists only when its host is set; the port is then
    /// required, the keys stay optional.
    fn load_store(
        section: &SectionView<'_>,
        host_option: &'static str,
        port_option: &'static str,
        version_key_option: &'static str,
        uri_key_option: &'static str,
    ) -> Result<Option<StoreTarget>, DeployError> {
        let Some(host) = section.get(host_option) else {
            return Ok(None);
        };

        Ok(Some(StoreTarget {
            host: host.to_string(),
            port: section.get_u16(port_option)?,
            version_key: section.get(version_key_option).map(str::to_string),
            uri_key: section.get(uri_key_option).map(str::to_string),
        }))
    }
}

/// Read-only view over one ini section; absent sections read as empty.
struct SectionView<'a> {
    name: &'static str,
    props: Option<&'a Properties>,
}

impl<'a> SectionView<'a> {
    fn new(ini: &'a Ini, name: &'static str) -> Self {
        Self {
            name,
            props: ini.section(Some(name)),
        }
    }

    fn get(&self, option: &str) -> Option<&'a str> {
        self.props.and_then(|p| p.get(option)).map(str::trim)
    }

    fn require(&self, option: &'static str) -> Result<&'a str, DeployError> {
        self.get(option).ok_or(DeployError::MissingOption {
            section: self.name,
            option,
        })
    }

    fn get_bool(&self, option: &'static str, default: bool) -> Result<bool, DeployError> {
        match self.get(option) {
            None => Ok(default),
            Some(raw) => match raw.to_ascii_lowercase().as_str() {
                "1" | "yes" | "true" | "on" => Ok(true),
                "0" | "no" | "false" | "off" => Ok(false),
                _ => Err(DeployError::InvalidValue {
                    section: self.name,
                    option,
                    value: raw.to_string(),
                }),
            },
        }
    }

    fn get_usize(&self, option: &'static str, default: usize) -> Result<usize, DeployError> {
        match self.get(option) {
            None => Ok(default),
            Some(raw) => raw.parse().map_err(|_| DeployError::InvalidValue {
                section: self.name,
                option,
                value: raw.to_string(),
            }),
        }
    }

    fn get_u16(&self, option: &'static str) -> Result<u16, DeployError> {
        let raw = self.require(option)?;
        raw.parse().map_err(|_| DeployError::InvalidValue {
            section: self.name,
            option,
            value: raw.to_string(),
        })
    }
}

/// Expand a leading `~` to the user's home directory.
fn expand_user(raw: &str) -> String {
    if raw == "~" {
        if let Some(home) = dirs::home_dir() {
            return home.to_string_lossy().into_owned();
        }
    } else if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest).to_string_lossy().into_owned();
        }
    }
    raw.to_string()
}
