//! Records passed between the lister, the extractor and the JSON output.

use crate::error::ScrapeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A publication discovered on a collection page.
///
/// `identifier` is the DOI when one was linked; article-path links only carry
/// an address. Serialized with the `doi`/`url` keys used in the JSON output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationRecord {
    #[serde(rename = "doi")]
    pub identifier: Option<String>,
    #[serde(rename = "url")]
    pub address: String,
    pub title: String,
}

/// A binomial name. Equality is exact and case-sensitive.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaxonPair {
    pub genus: String,
    pub species: String,
}

impl TaxonPair {
    pub fn new(genus: impl Into<String>, species: impl Into<String>) -> Self {
        Self {
            genus: genus.into(),
            species: species.into(),
        }
    }
}

impl fmt::Display for TaxonPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.genus, self.species)
    }
}

/// Outcome of processing one publication.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExtractionResult {
    #[serde(flatten)]
    pub record: PublicationRecord,
    pub taxa: Vec<TaxonPair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractionResult {
    /// Build the terminal result from a per-publication outcome. Failures keep
    /// their message and carry no taxa.
    pub fn from_outcome(
        record: PublicationRecord,
        outcome: Result<Vec<TaxonPair>, ScrapeError>,
    ) -> Self {
        match outcome {
            Ok(taxa) => Self {
                record,
                taxa,
                error: None,
            },
            Err(e) => Self {
                record,
                taxa: Vec::new(),
                error: Some(e.to_string()),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
