//! Genus/species extraction from article XML.
//!
//! Four passes run over every document, each targeting a different markup
//! convention:
//! 1. TaxPub `tp:taxon-name` elements with typed `tp:taxon-name-part` children
//! 2. `<italic>` runs whose whole text is a binomial
//! 3. every binomial-shaped word pair inside `<article-title>`
//! 4. `<kwd>` keywords whose whole text is a binomial
//!
//! Candidates are pooled in pass order and deduplicated keeping the first
//! occurrence. The title pass reports any capitalized word followed by a
//! lowercase one, so titles like "The genome sequence ..." contribute noise
//! pairs such as `The genome`; callers are expected to weigh those against
//! the structured and italic findings.

use crate::error::Result;
use crate::models::TaxonPair;
use crate::scrapers::xml_tree::{Document, Element};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

pub const TAXPUB_NAMESPACE: &str = "http://www.plazi.org/taxpub";

lazy_static! {
    // Whole-string binomial: one capitalized word, whitespace, one lowercase word
    static ref BINOMIAL: Regex = Regex::new(r"^([A-Z][a-z]+)\s+([a-z]+)$").unwrap();

    // Binomial-shaped word pair anywhere in running text
    static ref BINOMIAL_IN_TEXT: Regex = Regex::new(r"([A-Z][a-z]+)\s+([a-z]+)").unwrap();
}

/// Parse `xml` and extract its deduplicated taxon pairs.
///
/// Fails with `ScrapeError::Parse` on malformed XML; no partial list is
/// returned in that case.
pub fn extract_taxa(xml: &str) -> Result<Vec<TaxonPair>> {
    let document = Document::parse(xml)?;
    Ok(extract_taxa_from_document(&document))
}

pub fn extract_taxa_from_document(document: &Document) -> Vec<TaxonPair> {
    let mut candidates = structured_markup_pass(document);
    candidates.extend(inline_emphasis_pass(document));
    candidates.extend(title_pass(document));
    candidates.extend(keyword_pass(document));
    dedup_taxa(candidates)
}

/// TaxPub names with both a genus and a species part.
pub fn structured_markup_pass(document: &Document) -> Vec<TaxonPair> {
    document
        .find_all(|e| e.is("taxon-name", Some(TAXPUB_NAMESPACE)))
        .into_iter()
        .filter_map(|name| {
            let genus = name_part_text(name, "genus")?;
            let species = name_part_text(name, "species")?;
            Some(TaxonPair::new(genus, species))
        })
        .collect()
}

fn name_part_text(name: &Element, part_type: &str) -> Option<String> {
    let part = name.find(|e| {
        e.is("taxon-name-part", Some(TAXPUB_NAMESPACE))
            && e.attr("taxon-name-part-type") == Some(part_type)
    })?;
    let text = part.text();
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

pub fn inline_emphasis_pass(document: &Document) -> Vec<TaxonPair> {
    whole_text_binomials(document, "italic")
}

pub fn title_pass(document: &Document) -> Vec<TaxonPair> {
    document
        .find_all(|e| e.is("article-title", None))
        .into_iter()
        .flat_map(|title| binomials_in(&title.text()))
        .collect()
}

pub fn keyword_pass(document: &Document) -> Vec<TaxonPair> {
    whole_text_binomials(document, "kwd")
}

fn whole_text_binomials(document: &Document, element_name: &str) -> Vec<TaxonPair> {
    document
        .find_all(|e| e.is(element_name, None))
        .into_iter()
        .filter_map(|e| binomial(e.text().trim()))
        .collect()
}

/// `text` as a binomial, if the whole string is one.
pub fn binomial(text: &str) -> Option<TaxonPair> {
    BINOMIAL
        .captures(text)
        .map(|caps| TaxonPair::new(&caps[1], &caps[2]))
}

/// Every non-overlapping binomial-shaped word pair in `text`.
pub fn binomials_in(text: &str) -> Vec<TaxonPair> {
    BINOMIAL_IN_TEXT
        .captures_iter(text)
        .map(|caps| TaxonPair::new(&caps[1], &caps[2]))
        .collect()
}

/// Keep the first occurrence of each pair, dropping pairs with an empty part.
pub fn dedup_taxa(candidates: Vec<TaxonPair>) -> Vec<TaxonPair> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|t| !t.genus.trim().is_empty() && !t.species.trim().is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}
