use super::peptide::Peptide;
use super::protein::{accession, Protein};
use super::Error;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// The ordered sample identifiers of an experiment, one per abundance column
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    samples: Vec<String>,
}

impl Schema {
    /// Sample identifiers must be unique
    pub fn new<I, S>(samples: I) -> Result<Schema, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let samples = samples.into_iter().map(Into::into).collect::<Vec<String>>();
        let mut seen = HashSet::new();
        for s in &samples {
            if !seen.insert(s.as_str()) {
                return Err(Error::Schema(format!("duplicate sample `{}`", s)));
            }
        }
        Ok(Schema { samples })
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn index(&self, sample: &str) -> Option<usize> {
        self.samples.iter().position(|s| s == sample)
    }

    /// Check that a peptide carries exactly one non-negative, finite
    /// abundance (or a missing value) per sample
    fn validate(&self, peptide: &Peptide) -> Result<(), Error> {
        if peptide.abundances.len() != self.samples.len() {
            return Err(Error::Schema(format!(
                "peptide {} of {} has {} abundances, expected {}",
                peptide.sequence,
                peptide.protein,
                peptide.abundances.len(),
                self.samples.len()
            )));
        }
        for (sample, a) in self.samples.iter().zip(&peptide.abundances) {
            if let Some(x) = *a {
                if !x.is_finite() || x < 0.0 {
                    return Err(Error::Schema(format!(
                        "peptide {} of {} has invalid abundance {} in sample {}",
                        peptide.sequence, peptide.protein, x, sample
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Peptide-level abundances for every sample of an experiment
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AbundanceTable {
    schema: Schema,
    pub(crate) peptides: Vec<Peptide>,
}

impl AbundanceTable {
    /// Build a table, validating every peptide against `schema`
    pub fn new(schema: Schema, peptides: Vec<Peptide>) -> Result<AbundanceTable, Error> {
        for peptide in &peptides {
            schema.validate(peptide)?;
        }
        Ok(AbundanceTable { schema, peptides })
    }

    pub fn push(&mut self, peptide: Peptide) -> Result<(), Error> {
        self.schema.validate(&peptide)?;
        self.peptides.push(peptide);
        Ok(())
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn peptides(&self) -> &[Peptide] {
        &self.peptides
    }

    pub fn len(&self) -> usize {
        self.peptides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peptides.is_empty()
    }

    /// Distinct protein identifiers, in order of first appearance
    pub fn proteins(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.peptides
            .iter()
            .map(|p| p.protein.as_str())
            .filter(|p| seen.insert(*p))
            .collect()
    }

    /// Accessions of the distinct proteins, in order of first appearance
    pub fn accessions(&self) -> Vec<String> {
        self.proteins()
            .into_iter()
            .map(|p| accession(p).to_string())
            .collect()
    }

    /// Borrow the peptides of every protein, proteins in order of first
    /// appearance
    pub fn grouped(&self) -> Vec<(&str, Vec<&Peptide>)> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<(&str, Vec<&Peptide>)> = Vec::new();
        for peptide in &self.peptides {
            let idx = *index.entry(peptide.protein.as_str()).or_insert_with(|| {
                groups.push((peptide.protein.as_str(), Vec::new()));
                groups.len() - 1
            });
            groups[idx].1.push(peptide);
        }
        groups
    }

    /// Group the table by protein, proteins in order of first appearance
    pub fn into_proteins(self) -> (Schema, Vec<Protein>) {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut proteins: Vec<Protein> = Vec::new();
        for peptide in self.peptides {
            let idx = match index.get(&peptide.protein) {
                Some(idx) => *idx,
                None => {
                    index.insert(peptide.protein.clone(), proteins.len());
                    proteins.push(Protein::new(peptide.protein.clone()));
                    proteins.len() - 1
                }
            };
            proteins[idx].peptides.push(peptide);
        }
        (self.schema, proteins)
    }

    /// Flatten grouped proteins back into a table
    pub(crate) fn from_proteins(schema: Schema, proteins: Vec<Protein>) -> AbundanceTable {
        AbundanceTable {
            schema,
            peptides: proteins.into_iter().flat_map(|p| p.peptides).collect(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn table() -> AbundanceTable {
        let schema = Schema::new(vec!["s1", "s2"]).unwrap();
        AbundanceTable::new(
            schema,
            vec![
                Peptide::new("sp|P1|A", "MKV", vec![Some(1.0), None]),
                Peptide::new("sp|P2|B", "LLK", vec![Some(2.0), Some(0.0)]),
                Peptide::new("sp|P1|A", "WWR", vec![None, Some(3.0)]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn schema() {
        let schema = Schema::new(vec!["s1", "s2"]).unwrap();
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.index("s2"), Some(1));
        assert_eq!(schema.index("s3"), None);
        assert!(matches!(Schema::new(vec!["a", "a"]), Err(Error::Schema(_))));
    }

    #[test]
    fn validation() {
        let mut t = table();
        assert!(t.push(Peptide::new("P3", "K", vec![Some(1.0)])).is_err());
        assert!(t.push(Peptide::new("P3", "K", vec![Some(-1.0), None])).is_err());
        assert!(t
            .push(Peptide::new("P3", "K", vec![Some(f64::NAN), None]))
            .is_err());
        assert!(t.push(Peptide::new("P3", "K", vec![None, None])).is_ok());
        assert_eq!(t.len(), 4);
    }

    #[test]
    fn grouping_keeps_first_appearance() {
        let t = table();
        assert_eq!(t.proteins(), vec!["sp|P1|A", "sp|P2|B"]);
        assert_eq!(t.accessions(), vec!["P1", "P2"]);

        let grouped = t.grouped();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].1.len(), 2);
        assert_eq!(grouped[0].1[1].sequence, "WWR");

        let (schema, proteins) = t.clone().into_proteins();
        assert_eq!(proteins[0].identifier, "sp|P1|A");
        assert_eq!(proteins[0].peptides.len(), 2);
        let back = AbundanceTable::from_proteins(schema, proteins);
        assert_eq!(back.proteins(), t.proteins());
        assert_eq!(back.peptides()[1].sequence, "WWR");
    }
}
