//! Retrieve protein sequence records from UniProtKB
//!
//! # Record format
//!
//! Records are FASTA formatted, as served by the UniProtKB REST endpoints.
//! The header line must carry one of the two UniProtKB database prefixes,
//! `>sp` (Swiss-Prot, reviewed) or `>tr` (TrEMBL, unreviewed), followed by
//! the accession in the second `|`-delimited field.
//!
//! ```text
//! >sp|P02769|ALBU_BOVIN Albumin OS=Bos taurus OX=9913 GN=ALB PE=1 SV=4
//! MKWVTFISLLLLFSSAYSRGVFRRDTHKSEIAHRFKDLGEEHFKGLVLIAFSQYLQQCPF
//! ...
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! # use uniprot::{Record, SequenceDirectory, Uniprot};
//! let directory = Uniprot::new(uniprot::DEFAULT_BASE_URL, Duration::from_secs(30))?;
//! let record = match directory.retrieve("P02769") {
//!     Some(body) => Record::parse(&body)?,
//!     None => panic!("P02769 is not in UniProtKB"),
//! };
//! assert_eq!(record.accession, "P02769");
//! ```
//!

use memchr::{memchr_iter, Memchr};

pub mod fasta;
pub mod remote;

pub use fasta::Record;
pub use remote::{SequenceDirectory, Uniprot, DEFAULT_BASE_URL};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("protein record `{0}` is not one of the supported formats, only '>sp' and '>tr' are supported")]
    UnsupportedFormat(String),
    #[error("protein record `{0}` has no accession field")]
    MissingAccession(String),
    #[error("empty protein record")]
    Empty,
    #[error("unable to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Generalized wrapper around [`Memchr`] iterator for splitting `&[u8]` slices
/// by a byte.
pub(crate) struct Pitchfork<'a> {
    pos: usize,
    haystack: &'a [u8],
    inner: Memchr<'a>,
}

impl<'a> Pitchfork<'a> {
    pub fn new(needle: u8, haystack: &'a [u8]) -> Self {
        Self {
            pos: 0,
            haystack,
            inner: memchr_iter(needle, haystack),
        }
    }
}

impl<'a> Iterator for Pitchfork<'a> {
    type Item = &'a [u8];

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let end = match self.inner.next() {
            Some(e) => e,
            None => {
                if self.pos < self.haystack.len() {
                    self.haystack.len()
                } else {
                    return None;
                }
            }
        };
        let slice = &self.haystack[self.pos..end];
        self.pos = end + 1;
        Some(slice)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pitchfork() {
        let input = ">sp|P1|X\nMKV\nLLA";
        let mut pitch = Pitchfork::new(b'\n', input.as_bytes());
        assert_eq!(pitch.next().unwrap(), b">sp|P1|X");
        assert_eq!(pitch.next().unwrap(), b"MKV");
        assert_eq!(pitch.next().unwrap(), b"LLA");
        assert_eq!(pitch.next(), None);
    }

    #[test]
    fn pitchfork_trailing_newline() {
        let mut pitch = Pitchfork::new(b'\n', b"MKV\n");
        assert_eq!(pitch.next().unwrap(), b"MKV");
        assert_eq!(pitch.next(), None);
    }
}
