//! Top-N protein quantification
//!
//! Silva, Jeffrey C., et al. "Absolute quantification of proteins by LCMSE:
//! a virtue of parallel MS acquisition." Molecular & Cellular Proteomics
//! 5.1 (2006): 144-156.
use super::matrix::Pai;
use super::peptide::Peptide;
use super::stats;
use super::table::AbundanceTable;

/// Mean of the `n` most abundant measured peptides of a protein in one
/// sample. If fewer than `n` peptides were measured, all of them are used;
/// if none were, the protein is missing from the sample.
pub fn top_n(peptides: &[&Peptide], sample: usize, n: usize) -> Option<f64> {
    let mut v = peptides
        .iter()
        .filter_map(|p| p.abundances.get(sample).copied().flatten())
        .collect::<Vec<f64>>();
    v.sort_unstable_by(|a, b| b.total_cmp(a));
    v.truncate(n);
    stats::mean(&v)
}

/// Estimate the protein abundance index (PAI) of every protein in every
/// sample of the table, using the `n` most abundant peptides. Proteins are
/// listed in order of first appearance.
pub fn quantify(table: &AbundanceTable, n: usize) -> Pai {
    log::info!("quantifying {} peptides with top{}", table.len(), n);
    let samples = table.schema().len();

    let mut proteins = Vec::new();
    let mut values = Vec::new();
    for (protein, peptides) in table.grouped() {
        proteins.push(protein.to_string());
        values.push(
            (0..samples)
                .map(|s| top_n(&peptides, s, n))
                .collect::<Vec<Option<f64>>>(),
        );
    }

    Pai {
        proteins,
        samples: table.schema().samples().to_vec(),
        values,
    }
}
