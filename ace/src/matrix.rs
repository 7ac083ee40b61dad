use super::residue::RESIDUES;
use super::stats;
use std::fs;
use std::io::{self, prelude::*, BufWriter};
use std::path::Path;

/// Protein abundance index: one row per protein, one column per sample.
/// A value is `None` if no peptide of the protein was measured in the sample.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pai {
    pub proteins: Vec<String>,
    pub samples: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl Pai {
    pub fn get(&self, protein: &str, sample: &str) -> Option<f64> {
        let row = self.proteins.iter().position(|p| p == protein)?;
        let col = self.samples.iter().position(|s| s == sample)?;
        self.values[row][col]
    }

    /// Keep only the proteins for which `f` returns true
    pub fn retain<F: FnMut(&str) -> bool>(&mut self, mut f: F) {
        let keep = self
            .proteins
            .iter()
            .map(|p| f(p))
            .collect::<Vec<bool>>();
        let mut iter = keep.iter();
        self.proteins.retain(|_| *iter.next().unwrap_or(&false));
        let mut iter = keep.iter();
        self.values.retain(|_| *iter.next().unwrap_or(&false));
    }

    /// Divide each sample column by its sum, so that every column sums to
    /// one. Missing values count as zero, and a column summing to zero
    /// normalizes to all zeroes.
    pub fn normalized(&self) -> Vec<Vec<f64>> {
        let mut norm = vec![vec![0.0; self.samples.len()]; self.proteins.len()];
        for col in 0..self.samples.len() {
            let column = self
                .values
                .iter()
                .map(|row| row[col].unwrap_or(0.0))
                .collect::<Vec<f64>>();
            for (row, x) in stats::normalize(&column).into_iter().enumerate() {
                norm[row][col] = x;
            }
        }
        norm
    }

    /// Write the matrix as a tab-delimited table, missing values are left
    /// empty
    pub fn write<P: AsRef<Path>>(&self, p: P) -> io::Result<()> {
        let mut f = BufWriter::new(fs::File::create(p)?);
        writeln!(f, "protein\t{}", self.samples.join("\t"))?;
        for (protein, row) in self.proteins.iter().zip(&self.values) {
            write!(f, "{}", protein)?;
            for v in row {
                match v {
                    Some(x) => write!(f, "\t{}", x)?,
                    None => write!(f, "\t")?,
                }
            }
            writeln!(f)?;
        }
        f.flush()
    }
}

/// Estimated amino acid composition: one row per residue in [`RESIDUES`],
/// one column per sample.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Composition {
    pub samples: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl Composition {
    /// Matrix product of the transposed, row-normalized residue fractions of
    /// each protein (`fractions`) with the column-normalized abundance of
    /// each protein (`abundance`)
    pub(crate) fn combine(
        samples: Vec<String>,
        fractions: &[[f64; 24]],
        abundance: &[Vec<f64>],
    ) -> Composition {
        let mut values = vec![vec![0.0; samples.len()]; RESIDUES.len()];
        for (frac, pai) in fractions.iter().zip(abundance) {
            for (r, f) in frac.iter().enumerate() {
                for (s, a) in pai.iter().enumerate() {
                    values[r][s] += f * a;
                }
            }
        }
        Composition { samples, values }
    }

    pub fn get(&self, residue: char, sample: &str) -> Option<f64> {
        let row = RESIDUES.iter().position(|&r| r == residue)?;
        let col = self.samples.iter().position(|s| s == sample)?;
        Some(self.values[row][col])
    }

    /// Sum of a sample column: one, or zero if nothing was quantified in the
    /// sample
    pub fn column_sum(&self, sample: &str) -> Option<f64> {
        let col = self.samples.iter().position(|s| s == sample)?;
        Some(self.values.iter().map(|row| row[col]).sum())
    }

    pub fn write<P: AsRef<Path>>(&self, p: P) -> io::Result<()> {
        let mut f = BufWriter::new(fs::File::create(p)?);
        writeln!(f, "residue\t{}", self.samples.join("\t"))?;
        for (residue, row) in RESIDUES.iter().zip(&self.values) {
            write!(f, "{}", residue)?;
            for v in row {
                write!(f, "\t{}", v)?;
            }
            writeln!(f)?;
        }
        f.flush()
    }
}
