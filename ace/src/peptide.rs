#[derive(Clone, Debug, Default, PartialEq)]
/// A peptide sequence, the protein it was assigned to, and its abundance
/// in every sample of the experiment
pub struct Peptide {
    pub protein: String,
    pub sequence: String,
    /// An abundance is `None` if it was not measured, or if it has been
    /// imputed as missing.
    pub abundances: Vec<Option<f64>>,
}

impl Peptide {
    pub fn new<P: Into<String>, S: Into<String>>(
        protein: P,
        sequence: S,
        abundances: Vec<Option<f64>>,
    ) -> Peptide {
        Peptide {
            protein: protein.into(),
            sequence: sequence.into(),
            abundances,
        }
    }

    /// Turn all `Some(0.0)` into `None`
    ///
    /// # Example
    ///
    /// ```rust
    /// # use ace::Peptide;
    /// let mut peptide = Peptide::new("sp|P1|A", "MKV", vec![Some(0.), None, Some(1.2)]);
    ///
    /// peptide.impute_zeroes();
    ///
    /// assert_eq!(peptide.abundances, vec![None, None, Some(1.2)]);
    /// ```
    pub fn impute_zeroes(&mut self) {
        self.abundances.iter_mut().for_each(|a| {
            if *a == Some(0.0) {
                *a = None
            }
        })
    }

    /// Return a `Vec` of all measured abundances
    pub fn present(&self) -> Vec<f64> {
        self.abundances.iter().filter_map(|&a| a).collect()
    }

    /// Is this peptide's sequence contained in `other`'s?
    pub fn is_substring_of(&self, other: &Peptide) -> bool {
        other.sequence.contains(self.sequence.as_str())
    }
}
