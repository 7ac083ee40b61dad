//! Remote lookup of protein records by accession
use super::Error;
use reqwest::blocking::Client;
use std::time::Duration;

/// UniProtKB REST endpoint
pub const DEFAULT_BASE_URL: &str = "https://rest.uniprot.org/uniprotkb";

/// A directory of protein sequence records that can be queried by accession
///
/// Both queries return `None` when the directory has nothing for the
/// accession; implementations must not fail on transport errors, they should
/// log and report nothing instead.
pub trait SequenceDirectory: Sync {
    /// Fetch the record stored directly under `accession`
    fn fetch(&self, accession: &str) -> Option<String>;

    /// Free-text search for `accession`, used when [`SequenceDirectory::fetch`]
    /// comes back empty (e.g. the accession was merged or demerged)
    fn search(&self, accession: &str) -> Option<String>;

    /// Fetch a record, retrying once with a search query if the direct fetch
    /// returns nothing
    fn retrieve(&self, accession: &str) -> Option<String> {
        self.fetch(accession).or_else(|| {
            log::debug!("no record for {}, retrying with a search query", accession);
            self.search(accession)
        })
    }
}

/// Blocking HTTP client for the UniProtKB REST API
#[derive(Clone, Debug)]
pub struct Uniprot {
    client: Client,
    base_url: String,
}

impl Uniprot {
    /// Build a client for `base_url`, every request is bounded by `timeout`
    pub fn new<S: Into<String>>(base_url: S, timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Uniprot {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn get(&self, request: reqwest::blocking::RequestBuilder, accession: &str) -> Option<String> {
        let response = match request.send() {
            Ok(r) => r,
            Err(e) => {
                log::warn!("request for {} failed: {}", accession, e);
                return None;
            }
        };
        if !response.status().is_success() {
            log::debug!("{} returned HTTP {}", accession, response.status());
            return None;
        }
        match response.text() {
            Ok(body) if !body.trim().is_empty() => Some(body),
            Ok(_) => None,
            Err(e) => {
                log::warn!("unable to read response for {}: {}", accession, e);
                None
            }
        }
    }
}

impl SequenceDirectory for Uniprot {
    fn fetch(&self, accession: &str) -> Option<String> {
        let url = format!("{}/{}.fasta", self.base_url, accession);
        self.get(self.client.get(url), accession)
    }

    fn search(&self, accession: &str) -> Option<String> {
        let url = format!("{}/search", self.base_url);
        let request = self
            .client
            .get(url)
            .query(&[("query", accession), ("format", "fasta")]);
        self.get(request, accession)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fallback {
        searches: AtomicUsize,
    }

    impl SequenceDirectory for Fallback {
        fn fetch(&self, accession: &str) -> Option<String> {
            match accession {
                "P1" => Some(">sp|P1|A\nMKV".into()),
                _ => None,
            }
        }

        fn search(&self, accession: &str) -> Option<String> {
            self.searches.fetch_add(1, Ordering::SeqCst);
            match accession {
                "OLD" => Some(">sp|NEW|A\nMKV".into()),
                _ => None,
            }
        }
    }

    #[test]
    fn retrieve_falls_back_to_search() {
        let dir = Fallback {
            searches: AtomicUsize::new(0),
        };
        assert!(dir.retrieve("P1").is_some());
        assert_eq!(dir.searches.load(Ordering::SeqCst), 0);

        assert_eq!(dir.retrieve("OLD").unwrap(), ">sp|NEW|A\nMKV");
        assert_eq!(dir.retrieve("nothing"), None);
        assert_eq!(dir.searches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn base_url_is_trimmed() {
        let u = Uniprot::new("https://example.org/uniprotkb/", Duration::from_secs(1)).unwrap();
        assert_eq!(u.base_url, "https://example.org/uniprotkb");
    }
}
