//! Peptide-level preprocessing of an [`AbundanceTable`]
use super::table::AbundanceTable;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How a peptide that is a substring of more than one longer peptide is
/// merged
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubstringMembership {
    /// Add the peptide's abundance to every group it is a substring of
    All,
    /// Only add it to the first (longest) group it is a substring of
    First,
}

impl Default for SubstringMembership {
    fn default() -> Self {
        SubstringMembership::All
    }
}

/// Which preprocessing steps to apply, see [`preprocess`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preprocess {
    pub remove_zeroes: bool,
    pub remove_duplicates: bool,
    pub merge_substrings: bool,
    pub membership: SubstringMembership,
    /// Remove every protein whose identifier contains one of these
    pub exclude: Vec<String>,
}

impl Default for Preprocess {
    fn default() -> Self {
        Preprocess {
            remove_zeroes: true,
            remove_duplicates: true,
            merge_substrings: true,
            membership: SubstringMembership::All,
            exclude: Vec::new(),
        }
    }
}

/// Remove all proteins whose identifier includes any of `patterns`
pub fn exclude_proteins<S: AsRef<str>>(table: AbundanceTable, patterns: &[S]) -> AbundanceTable {
    log::info!("removing excluded proteins from the data");
    let before = table.len();
    let mut table = table;
    table
        .peptides
        .retain(|p| !patterns.iter().any(|s| p.protein.contains(s.as_ref())));
    log::debug!("removed {} peptides", before - table.len());
    table
}

/// Replace all zero-valued abundances with missing values, so that they
/// are not considered by the Top-N mean
pub fn impute_zeroes(table: AbundanceTable) -> AbundanceTable {
    log::info!("imputing zero-valued abundances as missing");
    let mut table = table;
    table.peptides.iter_mut().for_each(|p| p.impute_zeroes());
    table
}

/// Remove every peptide sequence that occurs more than once in the table,
/// as it cannot be attributed to a single protein
pub fn remove_non_unique(table: AbundanceTable) -> AbundanceTable {
    log::info!("removing every non-unique sequence from the data");
    let mut count: HashMap<&str, usize> = HashMap::new();
    for p in &table.peptides {
        *count.entry(p.sequence.as_str()).or_insert(0) += 1;
    }

    let non_unique = count
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(seq, n)| (seq.to_string(), n))
        .collect::<HashMap<String, usize>>();
    log::debug!(
        "there are {} kinds of non-unique sequences, removed {} peptides",
        non_unique.len(),
        non_unique.values().sum::<usize>()
    );

    let mut table = table;
    table
        .peptides
        .retain(|p| !non_unique.contains_key(&p.sequence));
    table
}

/// Merge the peptides of each protein which are substrings of another
/// peptide of the same protein, see [`Protein::merge_substrings`]
///
/// [`Protein::merge_substrings`]: super::Protein::merge_substrings
pub fn merge_substrings(table: AbundanceTable, membership: SubstringMembership) -> AbundanceTable {
    log::info!("merging substring peptides");
    let before = table.len();
    let (schema, proteins) = table.into_proteins();
    let proteins = proteins
        .into_iter()
        .map(|p| p.merge_substrings(membership))
        .collect();
    let table = AbundanceTable::from_proteins(schema, proteins);
    log::debug!("merged {} peptides into {} groups", before, table.len());
    table
}

/// Apply, in order, protein exclusion, zero imputation, duplicate
/// removal and substring merging, as enabled in `options`
pub fn preprocess(table: AbundanceTable, options: &Preprocess) -> AbundanceTable {
    let mut table = table;
    if !options.exclude.is_empty() {
        table = exclude_proteins(table, options.exclude.as_slice());
    }
    if options.remove_zeroes {
        table = impute_zeroes(table);
    }
    if options.remove_duplicates {
        table = remove_non_unique(table);
    }
    if options.merge_substrings {
        table = merge_substrings(table, options.membership);
    }
    table
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Peptide, Schema};
    use std::collections::HashSet;

    /// Sequences that occur more than once in the table
    fn duplicated(table: &AbundanceTable) -> HashSet<&str> {
        let mut seen = HashSet::new();
        table
            .peptides()
            .iter()
            .map(|p| p.sequence.as_str())
            .filter(|s| !seen.insert(*s))
            .collect()
    }

    fn table(rows: Vec<(&str, &str, Vec<Option<f64>>)>) -> AbundanceTable {
        let schema = Schema::new(vec!["s1", "s2"]).unwrap();
        AbundanceTable::new(
            schema,
            rows.into_iter()
                .map(|(prot, seq, a)| Peptide::new(prot, seq, a))
                .collect(),
        )
        .unwrap()
    }

    fn sequences(table: &AbundanceTable) -> Vec<&str> {
        table.peptides().iter().map(|p| p.sequence.as_str()).collect()
    }

    #[test]
    fn zeroes() {
        let t = table(vec![
            ("a", "MKV", vec![Some(0.), Some(1.)]),
            ("b", "LLR", vec![None, Some(0.)]),
        ]);
        let once = impute_zeroes(t);
        assert_eq!(once.peptides()[0].abundances, vec![None, Some(1.)]);
        assert_eq!(once.peptides()[1].abundances, vec![None, None]);
        assert_eq!(impute_zeroes(once.clone()), once);
    }

    #[test]
    fn non_unique() {
        let t = table(vec![
            ("a", "MKV", vec![Some(1.), None]),
            ("b", "MKV", vec![Some(2.), None]),
            ("a", "LLR", vec![Some(3.), None]),
            ("c", "WWK", vec![Some(4.), None]),
            ("c", "WWK", vec![Some(5.), None]),
        ]);
        let t = remove_non_unique(t);
        assert_eq!(sequences(&t), vec!["LLR"]);
        assert!(duplicated(&t).is_empty());
        assert_eq!(remove_non_unique(t.clone()), t);
    }

    #[test]
    fn exclusion() {
        let t = table(vec![
            ("sp|P1|A", "MKV", vec![Some(1.), None]),
            ("CONTAMINANT_P2", "LLR", vec![Some(3.), None]),
            ("Reverse_sp|P3|B", "WWK", vec![Some(4.), None]),
        ]);
        let t = exclude_proteins(t, &["CONTAMINANT", "Reverse"]);
        assert_eq!(t.proteins(), vec!["sp|P1|A"]);
    }

    #[test]
    fn merge_per_protein() {
        // "PEP" appears in both proteins but only merges within its own
        let t = table(vec![
            ("a", "PEP", vec![Some(1.), None]),
            ("b", "PEPTIDEK", vec![Some(2.), Some(2.)]),
            ("a", "PEPSINR", vec![Some(3.), None]),
            ("b", "TIDE", vec![Some(4.), None]),
        ]);
        let merged = merge_substrings(t, SubstringMembership::All);
        assert_eq!(sequences(&merged), vec!["PEPSINR", "PEPTIDEK"]);
        assert_eq!(merged.peptides()[0].abundances, vec![Some(4.), None]);
        assert_eq!(merged.peptides()[1].abundances, vec![Some(6.), Some(2.)]);
        assert_eq!(merge_substrings(merged.clone(), SubstringMembership::All), merged);
    }

    #[test]
    fn full_pipeline() {
        let t = table(vec![
            ("a", "PEPSINR", vec![Some(3.), Some(0.)]),
            ("a", "PEP", vec![Some(1.), Some(0.)]),
            ("b", "SHARED", vec![Some(9.), Some(9.)]),
            ("c", "SHARED", vec![Some(9.), Some(9.)]),
            ("c", "CCK", vec![Some(0.), Some(2.)]),
        ]);
        let t = preprocess(t, &Preprocess::default());
        assert_eq!(t.proteins(), vec!["a", "c"]);
        assert_eq!(sequences(&t), vec!["PEPSINR", "CCK"]);
        assert_eq!(t.peptides()[0].abundances, vec![Some(4.), None]);
        assert_eq!(t.peptides()[1].abundances, vec![None, Some(2.)]);
    }

    #[test]
    fn steps_can_be_disabled() {
        let rows = vec![
            ("a", "PEPSINR", vec![Some(3.), Some(0.)]),
            ("a", "PEP", vec![Some(1.), Some(0.)]),
        ];
        let options = Preprocess {
            remove_zeroes: false,
            merge_substrings: false,
            ..Preprocess::default()
        };
        let t = preprocess(table(rows), &options);
        assert_eq!(sequences(&t), vec!["PEPSINR", "PEP"]);
        assert_eq!(t.peptides()[1].abundances, vec![Some(1.), Some(0.)]);
    }
}
