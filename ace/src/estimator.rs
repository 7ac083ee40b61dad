use super::cache::CompositionCache;
use super::matrix::{Composition, Pai};
use super::options::Options;
use super::preprocess::preprocess;
use super::protein::accession;
use super::quant::quantify;
use super::store::Store;
use super::table::AbundanceTable;
use super::Error;
use std::collections::HashMap;
use uniprot::{SequenceDirectory, Uniprot};

/// Output of [`Estimator::estimate`]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Estimate {
    /// Amino acid composition, residue by sample
    pub composition: Composition,
    /// Protein abundance index, protein by sample, of every quantified
    /// protein
    pub pai: Pai,
    /// Accessions with no known sequence; their proteins do not contribute
    /// to the composition
    pub unresolved: Vec<String>,
    /// (requested, canonical) accession pairs
    pub reconciled: Vec<(String, String)>,
}

/// The amino acid composition estimator
pub struct Estimator<D> {
    options: Options,
    cache: CompositionCache<D>,
}

impl Estimator<Uniprot> {
    /// Open the configured composition store and connect to UniProtKB
    pub fn from_options(options: Options) -> Result<Self, Error> {
        options.validate()?;
        let store = Store::open(options.store_path()?)?;
        let directory = Uniprot::new(
            options.directory.base_url.as_str(),
            options.directory.timeout(),
        )?;
        let cache = CompositionCache::new(store, directory)
            .concurrency(options.cache.concurrency)
            .report_dir(options.cache.report_dir.as_ref());
        Ok(Estimator { options, cache })
    }
}

impl<D: SequenceDirectory> Estimator<D> {
    pub fn new(options: Options, cache: CompositionCache<D>) -> Self {
        Estimator { options, cache }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn cache(&self) -> &CompositionCache<D> {
        &self.cache
    }

    /// Preprocess the peptide table according to the estimator's options
    pub fn preprocess(&self, table: AbundanceTable) -> AbundanceTable {
        preprocess(table, &self.options.preprocess)
    }

    /// Estimate the amino acid composition of every sample in `table`
    ///
    /// Each composition column sums to one, or to zero if no protein with a
    /// known sequence was quantified in the sample.
    pub fn estimate(&mut self, table: AbundanceTable) -> Result<Estimate, Error> {
        let cleaned = self.preprocess(table);
        let pai = quantify(&cleaned, self.options.top_n);

        let accessions = cleaned.accessions();
        let resolution = self.cache.resolve(&accessions)?;

        let fractions = accessions
            .iter()
            .zip(resolution.table.iter())
            .filter_map(|(requested, (_, counts))| Some((requested.as_str(), counts?.fractions())))
            .collect::<HashMap<&str, [f64; 24]>>();

        // Proteins without a sequence cannot contribute a composition
        let mut known = pai.clone();
        known.retain(|protein| fractions.contains_key(accession(protein)));
        if known.proteins.len() < pai.proteins.len() {
            log::warn!(
                "{} proteins without a known sequence were left out of the composition",
                pai.proteins.len() - known.proteins.len()
            );
        }

        log::info!("estimating amino acid composition of {} samples", known.samples.len());
        let rows = known
            .proteins
            .iter()
            .filter_map(|protein| fractions.get(accession(protein)).copied())
            .collect::<Vec<[f64; 24]>>();
        let composition = Composition::combine(known.samples.clone(), &rows, &known.normalized());

        Ok(Estimate {
            composition,
            pai,
            unresolved: resolution.unresolved,
            reconciled: resolution.reconciled,
        })
    }
}
