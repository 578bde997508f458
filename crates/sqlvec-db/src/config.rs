//! Configuration for sqlvec tools.
//!
//! [`SqlvecConfig`] is read from `~/.sqlvec/config.yaml` unless another path
//! is given. Every field has a default, so a missing file is not an error.
//!
//! # Example YAML
//!
//! ```yaml
//! database: /var/lib/app/vectors.db
//! searchLimit: 20
//! metric: cosine
//! ```

use crate::engine::DistanceMetric;
use crate::error::{DbError, DbResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default number of results for a search.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Searches above this many results scan and sort the whole index for little gain.
const LARGE_SEARCH_LIMIT: usize = 1000;

/// User-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlvecConfig {
    /// Database file opened when none is given on the command line.
    #[serde(default)]
    pub database: Option<PathBuf>,

    /// Default `k` for searches.
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    /// Metric new indexes are created with.
    #[serde(default)]
    pub metric: DistanceMetric,
}

fn default_search_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

impl Default for SqlvecConfig {
    fn default() -> Self {
        Self {
            database: None,
            search_limit: DEFAULT_SEARCH_LIMIT,
            metric: DistanceMetric::default(),
        }
    }
}

impl SqlvecConfig {
    /// Load from `~/.sqlvec/config.yaml`, or defaults if there is no home
    /// directory or no file.
    pub fn load_default() -> DbResult<Self> {
        match Self::default_path() {
            Some(path) => Self::from_path(&path),
            None => {
                tracing::debug!("Could not determine home directory, using default config");
                Ok(Self::default())
            }
        }
    }

    /// Load from `path`. A missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Config`] if the file cannot be read or parsed, or
    /// fails validation.
    pub fn from_path(path: &Path) -> DbResult<Self> {
        if !path.exists() {
            tracing::debug!("Config not found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            DbError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_yaml_str(&content).map_err(|e| match e {
            DbError::Config { message } => {
                DbError::config(format!("{}: {}", path.display(), message))
            }
            other => other,
        })
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(content: &str) -> DbResult<Self> {
        // An empty document parses as null
        let config: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(content)
                .map_err(|e| DbError::config(format!("Failed to parse config: {}", e)))?
        };

        for warning in config.validate()? {
            tracing::warn!("Config warning: {}", warning);
        }
        Ok(config)
    }

    /// Default config directory (`~/.sqlvec`).
    pub fn default_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".sqlvec"))
    }

    /// Default config file (`~/.sqlvec/config.yaml`).
    pub fn default_path() -> Option<PathBuf> {
        Self::default_dir().map(|d| d.join("config.yaml"))
    }

    /// Check values, returning warnings for suspicious but usable settings.
    pub fn validate(&self) -> DbResult<Vec<String>> {
        let mut warnings = Vec::new();

        if self.search_limit == 0 {
            return Err(DbError::config("searchLimit cannot be 0"));
        }

        if self.search_limit > LARGE_SEARCH_LIMIT {
            warnings.push(format!(
                "searchLimit={} is very large (recommended: at most {})",
                self.search_limit, LARGE_SEARCH_LIMIT
            ));
        }

        Ok(warnings)
    }

    /// Set the database path.
    pub fn with_database(mut self, path: impl Into<PathBuf>) -> Self {
        self.database = Some(path.into());
        self
    }

    /// Set the default search limit.
    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit;
        self
    }
}
