//! Estimate the amino acid composition of samples from label-free
//! peptide abundances.
//!
//! This library's API is based around several types that form
//! a data analysis pipeline.
//!
//! Peptide abundances are collected into an [`AbundanceTable`], whose sample
//! columns are described by a [`Schema`]. The table is cleaned up by
//! [`preprocess`], collapsing redundant peptides into one signal per protein:
//!
//! ```rust,ignore
//! # use ace::*;
//! let schema = Schema::new(vec!["tomato_1", "tomato_2"])?;
//! let table = AbundanceTable::new(schema, peptides)?;
//! let cleaned = preprocess(table, &Preprocess::default());
//! ```
//!
//! Cleaned tables are quantified into a protein abundance index ([`Pai`])
//! using the Top-N method, and the residue composition of every protein is
//! resolved through a [`CompositionCache`], which downloads sequences it has
//! not seen before from UniProtKB and keeps their residue counts in a
//! persistent [`Store`]:
//!
//! ```rust,ignore
//! # use ace::*;
//! let pai = quantify(&cleaned, 3);
//!
//! let store = Store::open("composition.json")?;
//! let directory = uniprot::Uniprot::new(uniprot::DEFAULT_BASE_URL, Duration::from_secs(30))?;
//! let mut cache = CompositionCache::new(store, directory);
//! let resolution = cache.resolve(&cleaned.accessions())?;
//! ```
//!
//! The [`Estimator`] runs the whole pipeline, and combines both into the
//! per-sample amino acid [`Composition`]
//!
//! ```rust,ignore
//! # use ace::*;
//! let mut estimator = Estimator::from_options(Options::load("ace.json")?)?;
//! let estimate = estimator.estimate(table)?;
//! estimate.composition.write("composition.tsv")?;
//! estimate.pai.write("pai.tsv")?;
//! ```

use std::io;

mod cache;
mod estimator;
mod matrix;
mod options;
mod peptide;
mod preprocess;
mod protein;
mod quant;
mod residue;
mod stats;
mod store;
mod table;

pub use cache::{CompositionCache, CompositionTable, Resolution, RECONCILED_REPORT, UNRESOLVED_REPORT};
pub use estimator::{Estimate, Estimator};
pub use matrix::{Composition, Pai};
pub use options::{CacheOptions, DirectoryOptions, Options};
pub use peptide::Peptide;
pub use preprocess::{
    exclude_proteins, impute_zeroes, merge_substrings, preprocess, remove_non_unique, Preprocess,
    SubstringMembership,
};
pub use protein::{accession, Protein};
pub use quant::{quantify, top_n};
pub use residue::{Counts, RESIDUES};
pub use store::Store;
pub use table::{AbundanceTable, Schema};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Record(#[from] uniprot::Error),
    #[error("invalid abundance table: {0}")]
    Schema(String),
    #[error("no amino acid composition entry for {0}")]
    MissingEntry(String),
    #[error("unable to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
    #[error("{0}")]
    Config(String),
}
