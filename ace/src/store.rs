use super::residue::Counts;
use super::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, prelude::*, BufWriter};
use std::path::{Path, PathBuf};

/// File name of the store inside the default data directory
pub const STORE_FILE: &str = "composition.json";

/// Persistent map of UniProt accession to the residue [`Counts`] of the
/// protein's sequence
///
/// Besides the entries, the store remembers requested accessions that the
/// directory answered under a different, canonical accession, so that they
/// resolve locally afterwards.
///
/// The store is loaded once by [`Store::open`] and only written back by
/// [`Store::persist`].
#[derive(Clone, Debug, PartialEq)]
pub struct Store {
    path: PathBuf,
    document: Document,
}

/// On-disk layout of the store
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct Document {
    entries: BTreeMap<String, Counts>,
    /// requested accession -> canonical accession
    aliases: BTreeMap<String, String>,
}

impl Store {
    /// Load the store at `path`, creating an empty one (and any missing
    /// parent directories) if it doesn't exist yet
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Store, Error> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            log::info!("initializing empty composition store at {}", path.display());
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            let store = Store {
                path,
                document: Document::default(),
            };
            store.persist()?;
            return Ok(store);
        }

        let buf = fs::read(&path)?;
        let document: Document = serde_json::from_slice(&buf)?;
        log::debug!(
            "loaded {} entries and {} aliases from {}",
            document.entries.len(),
            document.aliases.len(),
            path.display()
        );
        Ok(Store { path, document })
    }

    /// Platform-specific data directory location of the store, e.g.
    /// `~/.local/share/ace/composition.json` on Linux
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "ace").map(|dirs| dirs.data_dir().join(STORE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, accession: &str) -> Option<&Counts> {
        self.document.entries.get(accession)
    }

    pub fn contains(&self, accession: &str) -> bool {
        self.document.entries.contains_key(accession)
    }

    /// Accession under which the entry for `accession` is stored: the
    /// accession itself, or the canonical accession it was reconciled to.
    /// `None` if the store has no entry either way.
    pub fn canonical<'a>(&'a self, accession: &'a str) -> Option<&'a str> {
        if self.contains(accession) {
            return Some(accession);
        }
        self.document
            .aliases
            .get(accession)
            .map(String::as_str)
            .filter(|canon| self.contains(canon))
    }

    /// Number of entries, aliases excluded
    pub fn len(&self) -> usize {
        self.document.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.document.entries.is_empty()
    }

    pub(crate) fn insert(&mut self, accession: String, counts: Counts) {
        self.document.entries.insert(accession, counts);
    }

    pub(crate) fn alias(&mut self, requested: String, canonical: String) {
        self.document.aliases.insert(requested, canonical);
    }

    /// Write the whole store back to disk. The map is written to a sibling
    /// temporary file first, which then replaces the store, so a failed
    /// write never leaves a truncated store behind.
    pub fn persist(&self) -> Result<(), Error> {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let mut f = BufWriter::new(fs::File::create(&tmp)?);
        serde_json::to_writer(&mut f, &self.document)?;
        f.flush()?;
        f.into_inner()
            .map_err(io::IntoInnerError::into_error)?
            .sync_all()?;
        fs::rename(&tmp, &self.path)?;
        log::debug!("wrote {} entries to {}", self.len(), self.path.display());
        Ok(())
    }
}
