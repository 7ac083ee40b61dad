use super::preprocess::Preprocess;
use super::Error;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Estimator parameters, usually loaded from a JSON file. Every field is
/// optional and falls back to its default.
///
/// ```json
/// {
///   "preprocess": { "exclude": ["CONTAMINANT"], "membership": "First" },
///   "top_n": 3,
///   "cache": { "path": "composition.json", "report_dir": "reports", "concurrency": 100 },
///   "directory": { "base_url": "https://rest.uniprot.org/uniprotkb", "timeout": 30 }
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub preprocess: Preprocess,
    /// Number of most abundant peptides used to quantify a protein
    pub top_n: usize,
    pub cache: CacheOptions,
    pub directory: DirectoryOptions,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheOptions {
    /// Location of the composition store, defaults to [`crate::Store::default_path`]
    pub path: Option<PathBuf>,
    /// Where to write side reports, `None` disables them
    pub report_dir: Option<PathBuf>,
    /// Maximum number of concurrent remote lookups
    pub concurrency: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryOptions {
    pub base_url: String,
    /// Per-request timeout, in seconds
    pub timeout: u64,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            preprocess: Preprocess::default(),
            top_n: 3,
            cache: CacheOptions::default(),
            directory: DirectoryOptions::default(),
        }
    }
}

impl Default for CacheOptions {
    fn default() -> Self {
        CacheOptions {
            path: None,
            report_dir: Some(PathBuf::from(".")),
            concurrency: 100,
        }
    }
}

impl Default for DirectoryOptions {
    fn default() -> Self {
        DirectoryOptions {
            base_url: uniprot::DEFAULT_BASE_URL.into(),
            timeout: 30,
        }
    }
}

impl DirectoryOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Options {
    /// Read options from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Options, Error> {
        let buf = fs::read(path)?;
        let options: Options = serde_json::from_slice(&buf)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.top_n == 0 {
            return Err(Error::Config("`top_n` must be at least 1".into()));
        }
        if self.cache.concurrency == 0 {
            return Err(Error::Config("`cache.concurrency` must be at least 1".into()));
        }
        Ok(())
    }

    /// Configured store location, or the platform default
    pub fn store_path(&self) -> Result<PathBuf, Error> {
        match &self.cache.path {
            Some(path) => Ok(path.clone()),
            None => crate::Store::default_path()
                .ok_or_else(|| Error::Config("unable to determine a data directory for the composition store".into())),
        }
    }
}
