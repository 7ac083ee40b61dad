//! Accession-keyed amino acid composition lookup, filling the persistent
//! [`Store`] from a remote [`SequenceDirectory`] on a miss
use super::residue::Counts;
use super::store::Store;
use super::Error;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::{self, prelude::*, BufWriter};
use std::path::{Path, PathBuf};
use uniprot::{Record, SequenceDirectory};

/// Side report listing accessions that could not be retrieved
pub const UNRESOLVED_REPORT: &str = "unresolved.txt";

/// Side report listing (requested, canonical) accession pairs
pub const RECONCILED_REPORT: &str = "inconsistence.txt";

/// Residue counts for a list of accessions, in the order they were
/// requested
///
/// Each row is labelled with the canonical accession returned by the
/// directory, and is `None` if the accession could not be resolved.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompositionTable {
    rows: Vec<(String, Option<Counts>)>,
}

impl CompositionTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Canonical accessions, one per row
    pub fn accessions(&self) -> Vec<&str> {
        self.rows.iter().map(|(acc, _)| acc.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Counts>)> {
        self.rows.iter().map(|(acc, c)| (acc.as_str(), c.as_ref()))
    }

    /// Counts of row `idx`, `None` if out of bounds or unresolved
    pub fn row(&self, idx: usize) -> Option<&Counts> {
        self.rows.get(idx)?.1.as_ref()
    }

    /// Strict lookup of a row by canonical accession
    ///
    /// Returns [`Error::MissingEntry`] if the accession is not in the table,
    /// or if it could not be resolved, as opposed to a resolved protein
    /// with no recognized residues.
    pub fn lookup(&self, accession: &str) -> Result<&Counts, Error> {
        self.rows
            .iter()
            .find(|(acc, _)| acc == accession)
            .and_then(|(_, c)| c.as_ref())
            .ok_or_else(|| Error::MissingEntry(accession.to_string()))
    }
}

/// Result of [`CompositionCache::resolve`]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Resolution {
    pub table: CompositionTable,
    /// Accessions that the directory returned nothing for
    pub unresolved: Vec<String>,
    /// (requested, canonical) pairs where the directory returned a record
    /// under a different accession
    pub reconciled: Vec<(String, String)>,
}

/// Accession-keyed residue counts backed by a persistent [`Store`], which
/// is filled from a [`SequenceDirectory`] on a miss
pub struct CompositionCache<D> {
    store: Store,
    directory: D,
    concurrency: usize,
    report_dir: Option<PathBuf>,
}

impl<D: SequenceDirectory> CompositionCache<D> {
    /// By default, up to 100 lookups are in flight at once and side reports
    /// are written to the working directory
    pub fn new(store: Store, directory: D) -> Self {
        CompositionCache {
            store,
            directory,
            concurrency: 100,
            report_dir: Some(PathBuf::from(".")),
        }
    }

    /// Maximum number of concurrent remote lookups
    pub fn concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    /// Directory to write the side reports to, `None` disables them
    pub fn report_dir<P: AsRef<Path>>(mut self, dir: Option<P>) -> Self {
        self.report_dir = dir.map(|d| d.as_ref().to_path_buf());
        self
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn into_store(self) -> Store {
        self.store
    }

    /// Look up the residue counts of every accession, retrieving and
    /// persisting the ones that are not in the store yet.
    ///
    /// A record in an unsupported format aborts the whole call before the
    /// store is modified. Accessions the directory has no record for are
    /// reported, and their row is left empty.
    pub fn resolve<S: AsRef<str>>(&mut self, accessions: &[S]) -> Result<Resolution, Error> {
        let mut seen = HashSet::new();
        let misses = accessions
            .iter()
            .map(|acc| acc.as_ref())
            .filter(|acc| self.store.canonical(acc).is_none() && seen.insert(*acc))
            .collect::<Vec<&str>>();

        // requested accession -> canonical accession, None if unresolved
        let mut canonical: HashMap<String, Option<String>> = HashMap::new();
        let mut unresolved = Vec::new();
        let mut reconciled = Vec::new();

        if !misses.is_empty() {
            log::info!("{} new proteins found, retrieving sequences", misses.len());
            let responses = self.retrieve(&misses)?;

            let mut fresh = Vec::new();
            for (&acc, response) in misses.iter().zip(responses) {
                let body = match response {
                    Some(body) => body,
                    None => {
                        unresolved.push(acc.to_string());
                        canonical.insert(acc.to_string(), None);
                        continue;
                    }
                };
                let record = Record::parse(&body)?;
                if record.accession != acc {
                    reconciled.push((acc.to_string(), record.accession.clone()));
                }
                let counts = Counts::from_sequence(&record.accession, &record.sequence);
                canonical.insert(acc.to_string(), Some(record.accession.clone()));
                fresh.push((record.accession, counts));
            }

            if !fresh.is_empty() {
                log::debug!("adding {} entries to the composition store", fresh.len());
                for (acc, counts) in fresh {
                    self.store.insert(acc, counts);
                }
                for (requested, canon) in &reconciled {
                    self.store.alias(requested.clone(), canon.clone());
                }
                self.store.persist()?;
            }
        }
        self.report(&unresolved, &reconciled)?;

        let rows = accessions
            .iter()
            .map(|acc| {
                let acc = acc.as_ref();
                match canonical.get(acc) {
                    Some(Some(canon)) => (canon.clone(), self.store.get(canon).copied()),
                    Some(None) => (acc.to_string(), None),
                    None => {
                        let canon = self.store.canonical(acc).unwrap_or(acc);
                        (canon.to_string(), self.store.get(canon).copied())
                    }
                }
            })
            .collect();

        Ok(Resolution {
            table: CompositionTable { rows },
            unresolved,
            reconciled,
        })
    }

    /// Query the directory for every accession on a bounded pool of worker
    /// threads. Responses are returned in the order of `accessions`.
    fn retrieve(&self, accessions: &[&str]) -> Result<Vec<Option<String>>, Error> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.concurrency.min(accessions.len()))
            .build()?;
        let directory = &self.directory;
        Ok(pool.install(|| {
            accessions
                .par_iter()
                .map(|acc| directory.retrieve(acc))
                .collect()
        }))
    }

    /// Log this call's unresolved and reconciled accessions and rewrite the
    /// side reports. A report whose list is empty is removed, so that no
    /// report from an earlier call is left behind.
    fn report(&self, unresolved: &[String], reconciled: &[(String, String)]) -> Result<(), Error> {
        if !unresolved.is_empty() {
            log::warn!(
                "{} protein entries were not able to be automatically retrieved, please retrieve them manually",
                unresolved.len()
            );
        }
        if !reconciled.is_empty() {
            log::warn!("{} inconsistent accessions detected", reconciled.len());
        }

        let dir = match &self.report_dir {
            Some(dir) => dir,
            None => return Ok(()),
        };

        let path = dir.join(UNRESOLVED_REPORT);
        if unresolved.is_empty() {
            remove_stale(&path)?;
        } else {
            let mut f = BufWriter::new(fs::File::create(&path)?);
            for acc in unresolved {
                writeln!(f, "{}", acc)?;
            }
            f.flush()?;
            log::warn!("see unresolved accessions in {}", path.display());
        }

        let path = dir.join(RECONCILED_REPORT);
        if reconciled.is_empty() {
            remove_stale(&path)?;
        } else {
            let mut f = BufWriter::new(fs::File::create(&path)?);
            for (requested, canonical) in reconciled {
                writeln!(f, "{}\t{}", requested, canonical)?;
            }
            f.flush()?;
            log::warn!("see inconsistent accessions in {}", path.display());
        }
        Ok(())
    }
}

fn remove_stale(path: &Path) -> Result<(), Error> {
    match fs::remove_file(path) {
        Ok(()) => {
            log::debug!("removed stale report {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
