//! Collection listing and taxon extraction.
//!
//! - `collection`: walks a collection's listing pages into `PublicationRecord`s
//! - `xml_address`: derives where a publication's XML can be downloaded
//! - `taxa`: extracts genus/species pairs from an XML document
//! - `pipeline`: runs the extractor over every listed publication
//!
//! All network access goes through the `PageFetcher` held by a
//! `RetrievalContext`, so each stage can be exercised against a mock server.

pub mod collection;
pub mod fetcher;
pub mod pipeline;
pub mod taxa;
pub mod xml_address;
pub mod xml_tree;

#[cfg(test)]
pub mod tests;
