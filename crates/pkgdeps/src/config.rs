//! Optional YAML configuration.
//!
//! ```yaml
//! database: /srv/pkgdeps/pkgdeps.db
//! index: /var/lib/eopkg/index/Unstable/eopkg-index.xml
//! ```
//!
//! Both keys are optional. Command-line flags override whatever the file says.

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::Deserialize;

use crate::catalog::DEFAULT_INDEX_PATH;
use crate::error::{Error, Result};

/// Directory under the platform config and cache dirs.
pub const APP_DIR_NAME: &str = "pkgdeps";

/// Configuration file name inside [`APP_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Database file name used when none is configured.
pub const DATABASE_FILE_NAME: &str = "pkgdeps.db";

/// Locations of the store and the repository index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database file
    pub database: Option<PathBuf>,
    /// Repository index XML
    pub index: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and [`Error::Config`]
    /// if it is not valid YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Load `path`, or the default location when `path` is `None`.
    ///
    /// A missing default file yields the default configuration. An explicit
    /// path that does not exist is an error.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Config::load`].
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => {
                tracing::trace!("No configuration file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// `<config dir>/pkgdeps/config.yaml`, if the platform has a config dir.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        BaseDirs::new().map(|dirs| dirs.config_dir().join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Configured database location, falling back to
    /// `<cache dir>/pkgdeps/pkgdeps.db`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if nothing is configured and the platform
    /// has no cache directory.
    pub fn database_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.database {
            return Ok(path.clone());
        }
        BaseDirs::new()
            .map(|dirs| dirs.cache_dir().join(APP_DIR_NAME).join(DATABASE_FILE_NAME))
            .ok_or_else(|| Error::Config("no cache directory; set `database`".to_string()))
    }

    /// Configured index location, or the system eopkg index.
    #[must_use]
    pub fn index_path(&self) -> PathBuf {
        self.index
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INDEX_PATH))
    }
}
