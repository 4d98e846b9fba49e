//! Runs the extractor over every publication of a collection.
//!
//! Publications are processed one at a time. A failure (fetch, address
//! derivation or malformed XML) is recorded on that publication's result and
//! processing moves on to the next one.

use crate::error::{Result, ScrapeError};
use crate::logger;
use crate::models::{ExtractionResult, PublicationRecord, TaxonPair};
use crate::scrapers::collection::list_publications;
use crate::scrapers::fetcher::RetrievalContext;
use crate::scrapers::taxa::extract_taxa;
use crate::scrapers::xml_address::fetch_xml;

/// Fetch the XML for `identifier` and extract its taxa.
pub async fn extract_publication_taxa(
    ctx: &RetrievalContext,
    identifier: &str,
) -> Result<Vec<TaxonPair>> {
    let xml = fetch_xml(ctx, identifier).await?;
    extract_taxa(&xml)
}

/// Process one publication. Never fails: errors end up in the result.
pub async fn process_publication(
    ctx: &RetrievalContext,
    record: &PublicationRecord,
) -> ExtractionResult {
    let outcome = match &record.identifier {
        Some(doi) => extract_publication_taxa(ctx, doi).await,
        None => Err(ScrapeError::MissingIdentifier),
    };

    match &outcome {
        Ok(taxa) => {
            logger::info(&format!("Found {} taxa", taxa.len()));
            for taxon in taxa {
                logger::debug(&format!("  - {}", taxon));
            }
        }
        Err(e) => logger::warn(&format!("Skipping '{}': {}", record.title, e)),
    }

    ExtractionResult::from_outcome(record.clone(), outcome)
}

/// Process `records` in order, pausing between network-bound publications.
pub async fn process_publications(
    ctx: &RetrievalContext,
    records: &[PublicationRecord],
) -> Vec<ExtractionResult> {
    let total = records.len();
    let mut results = Vec::with_capacity(total);

    for (i, record) in records.iter().enumerate() {
        logger::info(&format!(
            "[{}/{}] Processing: {} (DOI: {})",
            i + 1,
            total,
            record.title,
            record.identifier.as_deref().unwrap_or("none")
        ));
        results.push(process_publication(ctx, record).await);

        if record.identifier.is_some() && i + 1 < total {
            ctx.pause().await;
        }
    }

    results
}

/// List the collection and extract taxa from each publication.
///
/// Only listing failures (bad collection address, unreachable listing page)
/// are returned as errors.
pub async fn extract_collection(
    ctx: &RetrievalContext,
    collection_address: &str,
) -> Result<Vec<ExtractionResult>> {
    let records = list_publications(ctx, collection_address).await?;
    Ok(process_publications(ctx, &records).await)
}

/// Counts reported at the end of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub taxa_found: usize,
}

impl Summary {
    pub fn from_results(results: &[ExtractionResult]) -> Self {
        let succeeded = results.iter().filter(|r| r.is_success()).count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            taxa_found: results.iter().map(|r| r.taxa.len()).sum(),
        }
    }

    pub fn log(&self) {
        logger::info(&format!(
            "Total publications: {}, processed: {}, errors: {}, taxa found: {}",
            self.total, self.succeeded, self.failed, self.taxa_found
        ));
    }
}
