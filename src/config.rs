//! Engine configuration
//!
//! ```yaml
//! sources:
//!   - kind: http
//!     url: https://example.org/data/languages.csv
//!   - kind: file
//!     path: data/conlangs.csv
//! request_timeout_secs: 30
//! max_ancestry_depth: 256
//! extra_fallbacks:
//!   kur: kmr
//! ```

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::ancestry::DEFAULT_MAX_DEPTH;
use crate::error::ConfigError;
use crate::resolver::MacrolanguageFallbacks;
use crate::taxonomy::{FileSource, HttpSource, TaxonomySource};

/// Points at a YAML config file
pub const CONFIG_ENV: &str = "LINEAGE_CONFIG";
/// Base URL holding `languages.csv` and `conlangs.csv`
pub const BASE_URL_ENV: &str = "LINEAGE_TAXONOMY_BASE_URL";

/// Data files expected under a base URL, in load order
pub const TAXONOMY_FILES: &[&str] = &["languages.csv", "conlangs.csv"];

/// Where one block of taxonomy text lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    Http { url: Url },
    File { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageConfig {
    /// Taxonomy blocks, loaded in order
    pub sources: Vec<SourceConfig>,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_max_ancestry_depth")]
    pub max_ancestry_depth: usize,

    /// Added on top of the built-in macrolanguage fallbacks
    #[serde(default)]
    pub extra_fallbacks: BTreeMap<String, String>,
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_ancestry_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl LineageConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        Self::from_yaml(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: LineageConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// The standard two-file layout under one base URL.
    pub fn for_base_url(base: &str) -> Result<Self, ConfigError> {
        let mut base = Url::parse(base)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let sources = TAXONOMY_FILES
            .iter()
            .map(|file| base.join(file).map(|url| SourceConfig::Http { url }))
            .collect::<Result<Vec<_>, url::ParseError>>()?;

        Ok(Self {
            sources,
            request_timeout_secs: default_request_timeout_secs(),
            max_ancestry_depth: default_max_ancestry_depth(),
            extra_fallbacks: BTreeMap::new(),
        })
    }

    /// Configuration from the environment, after loading `.env` if present.
    ///
    /// `LINEAGE_CONFIG` names a YAML file and wins over
    /// `LINEAGE_TAXONOMY_BASE_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::from_file(path);
        }
        match std::env::var(BASE_URL_ENV) {
            Ok(base) => Self::for_base_url(&base),
            Err(_) => Err(ConfigError::Missing(BASE_URL_ENV)),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Built-in fallbacks with `extra_fallbacks` applied over them
    pub fn fallbacks(&self) -> MacrolanguageFallbacks {
        let mut fallbacks = MacrolanguageFallbacks::default();
        fallbacks.extend(self.extra_fallbacks.clone());
        fallbacks
    }

    /// One source per configured entry; HTTP sources share a client.
    pub fn build_sources(&self) -> Result<Vec<Box<dyn TaxonomySource>>, ConfigError> {
        let client = Client::builder()
            .timeout(self.request_timeout())
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        Ok(self
            .sources
            .iter()
            .map(|source| -> Box<dyn TaxonomySource> {
                match source {
                    SourceConfig::Http { url } => Box::new(HttpSource::new(client.clone(), url.clone())),
                    SourceConfig::File { path } => Box::new(FileSource::new(path.clone())),
                }
            })
            .collect())
    }
}
