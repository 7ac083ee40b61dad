use super::peptide::Peptide;
use super::preprocess::SubstringMembership;
use std::collections::HashMap;

#[derive(Clone, Debug, Default, PartialEq)]
/// Container for the [`Peptide`]s assigned to one protein, in the order they
/// appear in the table
pub struct Protein {
    /// Protein identifier as it appears in the table, e.g. `sp|P02769|ALBU_BOVIN`
    pub identifier: String,
    pub peptides: Vec<Peptide>,
}

/// Extract the UniProt accession from a protein identifier
///
/// Full UniProt identifiers (`sp|P02769|ALBU_BOVIN`) carry the accession in
/// their second field; anything else is assumed to already be an accession.
///
/// ```rust
/// # use ace::accession;
/// assert_eq!(accession("sp|P02769|ALBU_BOVIN"), "P02769");
/// assert_eq!(accession("P02769"), "P02769");
/// ```
pub fn accession(identifier: &str) -> &str {
    match identifier.split('|').nth(1) {
        Some(acc) if !acc.is_empty() => acc,
        _ => identifier,
    }
}

impl Protein {
    pub fn new<S: Into<String>>(identifier: S) -> Protein {
        Protein {
            identifier: identifier.into(),
            peptides: Vec::new(),
        }
    }

    pub fn accession(&self) -> &str {
        accession(&self.identifier)
    }

    /// Merge peptides which are substrings of another, longer, peptide of
    /// this protein.
    ///
    /// Peptides are visited longest first. A peptide that is contained in an
    /// existing group key joins that key's group (every matching group, or
    /// only the first one, depending on `membership`); otherwise it becomes
    /// the key of a new group. Each group is replaced by its key peptide,
    /// carrying the summed abundances of all members, where missing values
    /// count as zero and sums of zero are missing again.
    pub fn merge_substrings(self, membership: SubstringMembership) -> Protein {
        let Protein {
            identifier,
            peptides,
        } = self;

        let mut order = (0..peptides.len()).collect::<Vec<_>>();
        // Stable, so equal-length peptides keep their table order
        order.sort_by(|&a, &b| peptides[b].sequence.len().cmp(&peptides[a].sequence.len()));

        // (key index, member indices), in order of key creation
        let mut groups: Vec<(usize, Vec<usize>)> = Vec::new();
        for idx in order {
            let mut grouped = false;
            for (key, members) in groups.iter_mut() {
                if peptides[idx].is_substring_of(&peptides[*key]) {
                    members.push(idx);
                    grouped = true;
                    if membership == SubstringMembership::First {
                        break;
                    }
                }
            }
            if !grouped {
                groups.push((idx, vec![idx]));
            }
        }

        let mut merged: HashMap<usize, Vec<Option<f64>>> = groups
            .into_iter()
            .map(|(key, members)| {
                let mut sums = vec![0.0; peptides[key].abundances.len()];
                for m in members {
                    for (sum, a) in sums.iter_mut().zip(&peptides[m].abundances) {
                        *sum += a.unwrap_or(0.0);
                    }
                }
                let abundances = sums
                    .into_iter()
                    .map(|s| if s == 0.0 { None } else { Some(s) })
                    .collect();
                (key, abundances)
            })
            .collect();

        let peptides = peptides
            .into_iter()
            .enumerate()
            .filter_map(|(idx, mut peptide)| {
                peptide.abundances = merged.remove(&idx)?;
                Some(peptide)
            })
            .collect();

        Protein {
            identifier,
            peptides,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn protein(peptides: &[(&str, &[Option<f64>])]) -> Protein {
        let mut prot = Protein::new("sp|P1|TEST");
        for (seq, abundances) in peptides {
            prot.peptides
                .push(Peptide::new("sp|P1|TEST", *seq, abundances.to_vec()));
        }
        prot
    }

    fn sequences(prot: &Protein) -> Vec<&str> {
        prot.peptides.iter().map(|p| p.sequence.as_str()).collect()
    }

    #[test]
    fn merge_into_longest() {
        let prot = protein(&[
            ("QPQVY", &[Some(1.0), None]),
            ("LQFGSQPQVYNDFLDIMK", &[Some(2.0), None]),
            ("DIMK", &[Some(3.0), None]),
            ("MEHQLL", &[None, Some(4.0)]),
        ]);
        let merged = prot.merge_substrings(SubstringMembership::All);
        assert_eq!(sequences(&merged), vec!["LQFGSQPQVYNDFLDIMK", "MEHQLL"]);
        assert_eq!(merged.peptides[0].abundances, vec![Some(6.0), None]);
        assert_eq!(merged.peptides[1].abundances, vec![None, Some(4.0)]);
        assert_eq!(merged.identifier, "sp|P1|TEST");
    }

    #[test]
    fn zero_sums_are_missing() {
        let prot = protein(&[("AAK", &[Some(0.0), None]), ("AAKR", &[None, Some(1.0)])]);
        let merged = prot.merge_substrings(SubstringMembership::All);
        assert_eq!(sequences(&merged), vec!["AAKR"]);
        assert_eq!(merged.peptides[0].abundances, vec![None, Some(1.0)]);
    }

    #[test]
    fn multi_membership() {
        // "PEP" is contained in both keys
        let prot = protein(&[
            ("PEPTIDEK", &[Some(1.0)]),
            ("PEPSINR", &[Some(2.0)]),
            ("PEP", &[Some(10.0)]),
        ]);

        let all = prot.clone().merge_substrings(SubstringMembership::All);
        assert_eq!(sequences(&all), vec!["PEPTIDEK", "PEPSINR"]);
        assert_eq!(all.peptides[0].abundances, vec![Some(11.0)]);
        assert_eq!(all.peptides[1].abundances, vec![Some(12.0)]);

        let first = prot.merge_substrings(SubstringMembership::First);
        assert_eq!(first.peptides[0].abundances, vec![Some(11.0)]);
        assert_eq!(first.peptides[1].abundances, vec![Some(2.0)]);
    }

    #[test]
    fn merge_is_idempotent() {
        let prot = protein(&[
            ("QPQVY", &[Some(1.0), None]),
            ("LQFGSQPQVYNDFLDIMK", &[Some(2.0), Some(0.5)]),
            ("MEHQLL", &[None, Some(4.0)]),
        ]);
        let once = prot.merge_substrings(SubstringMembership::All);
        let twice = once.clone().merge_substrings(SubstringMembership::All);
        assert_eq!(once, twice);
    }
}
