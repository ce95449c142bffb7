//! Configuration loading and the environment collaborator.
//!
//! Storage location and public URLs come from a `config.toml` in the config
//! directory (the current directory by default). The file is sparse: stock
//! defaults are merged underneath, so a deployment only names what differs.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [paths]
//! upload = "uploads"                # Directory decoded images are written to
//!
//! [urls]
//! base_url = "http://localhost:8080"
//! upload = "/uploads"               # Appended to base_url for asset URLs
//!
//! [processing]
//! max_processes = 4                 # Parallel documents (omit for auto = CPU cores)
//! ```
//!
//! `[paths]` and `[urls]` are open maps: any name may be added and looked up
//! through [`Environment::path`] / [`Environment::url`], which return an
//! empty string for names that are not configured. Unknown top-level keys
//! are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetsConfig {
    /// Named filesystem paths. `upload` is where decoded images are stored.
    pub paths: BTreeMap<String, String>,
    /// Named URLs. Asset URLs are built from `base_url` + `upload`.
    pub urls: BTreeMap<String, String>,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        let paths = BTreeMap::from([("upload".to_string(), "uploads".to_string())]);
        let urls = BTreeMap::from([
            ("base_url".to_string(), "http://localhost:8080".to_string()),
            ("upload".to_string(), "/uploads".to_string()),
        ]);
        Self {
            paths,
            urls,
            processing: ProcessingConfig::default(),
        }
    }
}

impl AssetsConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.paths.get("upload").is_none_or(|p| p.is_empty()) {
            return Err(ConfigError::Validation(
                "paths.upload must not be empty".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// The named paths and URLs as an [`Environment`].
    pub fn environment(&self) -> Environment {
        Environment {
            paths: self.paths.clone(),
            urls: self.urls.clone(),
        }
    }
}

/// How many documents the CLI rewrites at once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Upper bound on worker threads; unset means one per core.
    pub max_processes: Option<usize>,
}

impl ProcessingConfig {
    /// Worker threads for the rayon pool, never more than the machine has.
    pub fn thread_count(&self) -> usize {
        let cores = std::thread::available_parallelism().map_or(1, |n| n.get());
        match self.max_processes {
            Some(limit) => limit.min(cores),
            None => cores,
        }
    }
}

/// Named paths and URLs of the running environment.
///
/// Lookups never fail: an unknown name yields an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    pub paths: BTreeMap<String, String>,
    pub urls: BTreeMap<String, String>,
}

impl Environment {
    /// The path registered under `name`, or `""`.
    pub fn path(&self, name: &str) -> &str {
        self.paths.get(name).map_or("", String::as_str)
    }

    /// The URL registered under `name`, or `""`.
    pub fn url(&self, name: &str) -> &str {
        self.urls.get(name).map_or("", String::as_str)
    }
}

/// Where the asset store writes files and how it addresses them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub storage_dir: PathBuf,
    pub base_url: String,
}

impl StoreConfig {
    pub fn new(storage_dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            storage_dir: storage_dir.into(),
            base_url: base_url.into(),
        }
    }

    /// Storage directory from `paths.upload`; base URL is `urls.base_url`
    /// followed by `urls.upload`.
    pub fn from_environment(env: &Environment) -> Self {
        Self {
            storage_dir: PathBuf::from(env.path("upload")),
            base_url: format!("{}{}", env.url("base_url"), env.url("upload")),
        }
    }
}

/// Read `config.toml` from `dir` and lay it over [`AssetsConfig::default`].
///
/// Within `[paths]` and `[urls]` a file only adds or replaces names; the stock
/// `upload` and `base_url` entries survive unless overridden. A missing file
/// yields the defaults.
pub fn load_config(dir: &Path) -> Result<AssetsConfig, ConfigError> {
    let config_path = dir.join("config.toml");
    let mut config = AssetsConfig::default();
    if config_path.exists() {
        let text = fs::read_to_string(&config_path)?;
        let file: ConfigFile = toml::from_str(&text)?;
        file.apply_to(&mut config);
    }
    config.validate()?;
    Ok(config)
}

/// `config.toml` exactly as written, every section optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    paths: BTreeMap<String, String>,
    urls: BTreeMap<String, String>,
    processing: Option<ProcessingConfig>,
}

impl ConfigFile {
    fn apply_to(self, config: &mut AssetsConfig) {
        config.paths.extend(self.paths);
        config.urls.extend(self.urls);
        if let Some(processing) = self.processing {
            config.processing = processing;
        }
    }
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# inline-assets configuration
# ===========================
# All settings are optional. Values shown below are the defaults.
# Unknown top-level keys will cause an error.

# ---------------------------------------------------------------------------
# Filesystem paths
# ---------------------------------------------------------------------------
[paths]
# Directory decoded images are written to. Must already exist when the
# library is used directly; the CLI creates it on demand.
upload = "uploads"

# ---------------------------------------------------------------------------
# Public URLs
# ---------------------------------------------------------------------------
[urls]
# Asset URLs are "<base_url><upload>/<id>.<ext>".
base_url = "http://localhost:8080"
upload = "/uploads"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum number of HTML documents rewritten in parallel.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
