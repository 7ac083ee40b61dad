//! Parsing of single UniProtKB FASTA records
use super::{Error, Pitchfork};
use std::str;

/// Header prefixes of the two UniProtKB databases we accept records from
pub const RECORD_PREFIXES: [&str; 2] = [">sp", ">tr"];

#[derive(Debug, PartialEq, Eq, Clone)]
/// A protein accession and its one-line residue sequence
pub struct Record {
    /// Uniprot accession identifier, as reported by the record itself
    pub accession: String,
    /// Protein sequence
    pub sequence: String,
}

impl Record {
    /// Parse the first record of a FASTA formatted response body
    ///
    /// The header must start with one of [`RECORD_PREFIXES`]. Any additional
    /// records following the first one (search responses may return several)
    /// are ignored.
    pub fn parse(body: &str) -> Result<Record, Error> {
        let mut lines = Pitchfork::new(b'\n', body.as_bytes())
            .map(|line| String::from_utf8_lossy(line))
            .map(|line| line.trim().to_string())
            .skip_while(|line| line.is_empty());

        let header = lines.next().ok_or(Error::Empty)?;
        if !RECORD_PREFIXES.iter().any(|p| header.starts_with(p)) {
            log::error!("protein {} is not one of the supported formats", header);
            return Err(Error::UnsupportedFormat(header));
        }

        let accession = match header.split('|').nth(1) {
            Some(acc) if !acc.is_empty() => acc.to_string(),
            _ => return Err(Error::MissingAccession(header)),
        };

        let mut sequence = String::new();
        for line in lines {
            if line.starts_with('>') {
                break;
            }
            sequence.push_str(&line);
        }

        Ok(Record {
            accession,
            sequence,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn swissprot() {
        let body = ">sp|P02769|ALBU_BOVIN Albumin OS=Bos taurus\nMKWVTF\nISLLLL\n";
        let rec = Record::parse(body).unwrap();
        assert_eq!(rec.accession, "P02769");
        assert_eq!(rec.sequence, "MKWVTFISLLLL");
    }

    #[test]
    fn trembl_crlf() {
        let body = ">tr|A0A0B4J2F0|A0A0B4J2F0_HUMAN\r\nMFRR\r\nIQ\r\n";
        let rec = Record::parse(body).unwrap();
        assert_eq!(rec.accession, "A0A0B4J2F0");
        assert_eq!(rec.sequence, "MFRRIQ");
    }

    #[test]
    fn only_first_record() {
        let body = ">sp|P1|A\nMKV\n>sp|P2|B\nWWW\n";
        let rec = Record::parse(body).unwrap();
        assert_eq!(rec.accession, "P1");
        assert_eq!(rec.sequence, "MKV");
    }

    #[test]
    fn unsupported() {
        match Record::parse(">gi|12345|ref\nMKV") {
            Err(Error::UnsupportedFormat(h)) => assert_eq!(h, ">gi|12345|ref"),
            e => panic!("unexpected {:?}", e),
        }
    }

    #[test]
    fn missing_accession() {
        assert!(matches!(
            Record::parse(">sp_no_fields\nMKV"),
            Err(Error::MissingAccession(_))
        ));
        assert!(matches!(Record::parse("\n\n"), Err(Error::Empty)));
    }
}
