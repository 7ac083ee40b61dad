use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Recognized amino acid symbols, including the ambiguity codes B, Z and X
/// and selenocysteine (U)
pub const RESIDUES: [char; 24] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'K', 'L', 'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'U',
    'V', 'W', 'X', 'Y', 'Z',
];

#[inline]
fn index(residue: char) -> Option<usize> {
    RESIDUES.binary_search(&residue).ok()
}

/// Number of occurrences of each of the [`RESIDUES`] in a protein sequence
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "BTreeMap<String, u32>", try_from = "BTreeMap<String, u32>")]
pub struct Counts([u32; 24]);

impl Counts {
    /// Count the residues of `sequence`. Unrecognized symbols are not
    /// counted, and are reported as a warning against `accession`.
    pub fn from_sequence(accession: &str, sequence: &str) -> Counts {
        let mut counts = [0u32; 24];
        let mut unknown = BTreeMap::new();
        for c in sequence.chars() {
            match index(c) {
                Some(idx) => counts[idx] += 1,
                None => *unknown.entry(c).or_insert(0usize) += 1,
            }
        }
        if !unknown.is_empty() {
            log::warn!(
                "protein {} contains non amino acid characters: {:?}",
                accession,
                unknown
            );
        }
        Counts(counts)
    }

    pub fn get(&self, residue: char) -> Option<u32> {
        index(residue).map(|idx| self.0[idx])
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    /// Fraction of the protein made up by each residue. All zeroes if the
    /// protein has no recognized residues.
    pub fn fractions(&self) -> [f64; 24] {
        let total = self.total() as f64;
        let mut f = [0.0; 24];
        if total > 0.0 {
            for (x, &c) in f.iter_mut().zip(self.0.iter()) {
                *x = c as f64 / total;
            }
        }
        f
    }
}

impl From<Counts> for BTreeMap<String, u32> {
    fn from(counts: Counts) -> Self {
        RESIDUES
            .iter()
            .zip(counts.0.iter())
            .map(|(r, &c)| (r.to_string(), c))
            .collect()
    }
}

impl TryFrom<BTreeMap<String, u32>> for Counts {
    type Error = String;

    /// Absent residues are zero-filled, unknown ones are rejected
    fn try_from(map: BTreeMap<String, u32>) -> Result<Self, Self::Error> {
        let mut counts = [0u32; 24];
        for (key, count) in map {
            let mut chars = key.chars();
            match (chars.next().and_then(index), chars.next()) {
                (Some(idx), None) => counts[idx] = count,
                _ => return Err(format!("unknown residue `{}`", key)),
            }
        }
        Ok(Counts(counts))
    }
}
