//! Collection lister: walks a journal collection's listing pages and collects
//! the publications they link to.
//!
//! Page 0 is the collection address itself; later pages come from the
//! publisher's listing endpoint. Each page is scanned with three link matchers,
//! always in this order:
//! 1. DOI links under the publisher's registrant prefix
//! 2. internal article-path links (`/article/{id}`), which carry no DOI
//! 3. DOI links under any registrant prefix
//!
//! A candidate is dropped when its address or DOI was already collected, on
//! this page or an earlier one, so the first matcher to reach a publication
//! keeps it. Collisions between an article path and a DOI address for the same
//! publication are not reconciled.
//!
//! Walking stops after the first page that adds nothing, that has no link to
//! the next page, or that reaches the page ceiling.

use crate::config::PublisherConfig;
use crate::error::{Result, ScrapeError};
use crate::logger;
use crate::models::PublicationRecord;
use crate::scrapers::fetcher::RetrievalContext;
use crate::utilities::{absolutize, join_text, strip_trailing_punctuation};
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

lazy_static! {
    static ref COLLECTION_ID: Regex = Regex::new(r"collection[_/](\d+)").unwrap();
    static ref ARTICLE_PATH: Regex = Regex::new(r"/article/(\d+)").unwrap();
    static ref ANY_DOI: Regex = Regex::new(r#"doi\.org/(10\.\d+/[^\s"'>]+)"#).unwrap();
}

/// Link text shorter than this is replaced by the enclosing heading's text.
const MIN_LINK_TITLE_CHARS: usize = 10;

/// Elements whose text stands in for a too-short link text.
const TITLE_CONTAINERS: &[&str] = &["h3", "h4", "div"];

/// Extract the collection identifier: the digits after `collection_` or
/// `collection/`.
///
/// ```
/// use taxon_scraper::scrapers::collection::collection_id;
///
/// let id = collection_id("https://riojournal.com/topical_collection/280/").unwrap();
/// assert_eq!(id, "280");
/// ```
pub fn collection_id(address: &str) -> Result<String> {
    COLLECTION_ID
        .captures(address)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| ScrapeError::Input {
            address: address.to_string(),
        })
}

/// An `<a href>` found on a listing page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageLink {
    pub href: String,
    /// Link text, or the enclosing heading's text when the link text is too
    /// short. Empty when neither has any.
    pub title: String,
}

/// Every `<a href>` on `html`, in document order.
pub fn page_links(html: &str) -> Vec<PageLink> {
    let document = Html::parse_document(html);
    let selector = match Selector::parse("a[href]") {
        Ok(s) => s,
        Err(_) => return vec![],
    };

    document
        .select(&selector)
        .filter_map(|link| {
            let href = link.value().attr("href")?.trim().to_string();
            Some(PageLink {
                title: link_title(&link),
                href,
            })
        })
        .collect()
}

fn link_title(link: &ElementRef) -> String {
    let title = join_text(link.text());
    if title.chars().count() >= MIN_LINK_TITLE_CHARS {
        return title;
    }
    link.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|e| TITLE_CONTAINERS.contains(&e.value().name()))
        .map(|container| join_text(container.text()))
        .unwrap_or(title)
}

/// True when some link targets listing page `page` (`p={page}` as a whole
/// query value, so `p=1` does not match `p=10`).
pub fn links_reference_page(links: &[PageLink], page: u32) -> bool {
    let pattern = format!(r"(?:^|[?&;])p={}(?:$|[^0-9])", page);
    match Regex::new(&pattern) {
        Ok(re) => links.iter().any(|link| re.is_match(&link.href)),
        Err(_) => false,
    }
}

/// Accumulates records across pages while enforcing address and DOI
/// uniqueness.
pub struct PublicationCollector {
    publisher: PublisherConfig,
    publisher_doi: Regex,
    records: Vec<PublicationRecord>,
    seen_addresses: HashSet<String>,
    seen_identifiers: HashSet<String>,
}

impl PublicationCollector {
    pub fn new(publisher: &PublisherConfig) -> Result<Self> {
        let pattern = format!(
            r#"doi\.org/({}/[^\s"'>]+)"#,
            regex::escape(&publisher.doi_prefix)
        );
        let publisher_doi = Regex::new(&pattern).map_err(|e| ScrapeError::Config {
            message: format!("invalid DOI prefix '{}': {}", publisher.doi_prefix, e),
        })?;
        Ok(Self {
            publisher: publisher.clone(),
            publisher_doi,
            records: Vec::new(),
            seen_addresses: HashSet::new(),
            seen_identifiers: HashSet::new(),
        })
    }

    /// Run the three matchers over one page's links. Returns how many new
    /// records the page contributed.
    pub fn collect_page(&mut self, links: &[PageLink]) -> usize {
        let mut added = 0;

        for link in links {
            let doi = match doi_from(&self.publisher_doi, &link.href) {
                Some(doi) => doi,
                None => continue,
            };
            if self.add_doi_record(doi, &link.title) {
                added += 1;
            }
        }

        for link in links {
            let article_id = match ARTICLE_PATH.captures(&link.href) {
                Some(caps) => caps[1].to_string(),
                None => continue,
            };
            let address = absolutize(&self.publisher.site_base, &link.href);
            let title = title_or(&link.title, || format!("Article {}", article_id));
            if self.insert(None, address, title) {
                added += 1;
            }
        }

        for link in links {
            let doi = match doi_from(&ANY_DOI, &link.href) {
                Some(doi) => doi,
                None => continue,
            };
            if self.add_doi_record(doi, &link.title) {
                added += 1;
            }
        }

        added
    }

    fn add_doi_record(&mut self, doi: String, link_title: &str) -> bool {
        let address = self.publisher.resolver_url(&doi);
        let title = title_or(link_title, || format!("Publication {}", doi));
        self.insert(Some(doi), address, title)
    }

    fn insert(&mut self, identifier: Option<String>, address: String, title: String) -> bool {
        if self.seen_addresses.contains(&address) {
            return false;
        }
        if let Some(doi) = &identifier {
            if !self.seen_identifiers.insert(doi.clone()) {
                return false;
            }
        }
        self.seen_addresses.insert(address.clone());
        self.records.push(PublicationRecord {
            identifier,
            address,
            title,
        });
        true
    }

    pub fn records(&self) -> &[PublicationRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<PublicationRecord> {
        self.records
    }
}

/// DOI captured by `pattern` from `href`, with trailing punctuation removed.
fn doi_from(pattern: &Regex, href: &str) -> Option<String> {
    let caps = pattern.captures(href)?;
    let doi = strip_trailing_punctuation(&caps[1]);
    // Nothing left after the registrant once punctuation is gone.
    if doi.ends_with('/') {
        return None;
    }
    Some(doi.to_string())
}

fn title_or<F: FnOnce() -> String>(title: &str, fallback: F) -> String {
    if title.is_empty() {
        fallback()
    } else {
        title.to_string()
    }
}

/// List every publication in the collection at `collection_address`.
///
/// # Errors
/// - `ScrapeError::Input` when the address has no collection identifier;
///   nothing is fetched in that case
/// - `ScrapeError::Fetch` when any listing page cannot be retrieved
pub async fn list_publications(
    ctx: &RetrievalContext,
    collection_address: &str,
) -> Result<Vec<PublicationRecord>> {
    let collection = collection_id(collection_address)?;
    let publisher = &ctx.config.publisher;
    let mut collector = PublicationCollector::new(publisher)?;
    let mut page: u32 = 0;

    loop {
        let url = if page == 0 {
            collection_address.to_string()
        } else {
            publisher.listing_url(&collection, page)
        };

        logger::info(&format!("Fetching page {}: {}", page + 1, url));
        let html = ctx.fetch(&url).await?;
        let links = page_links(&html);
        let added = collector.collect_page(&links);
        logger::info(&format!("Found {} new publications on page {}", added, page + 1));

        if added == 0 {
            logger::info(&format!(
                "No new publications on page {}, stopping pagination",
                page + 1
            ));
            break;
        }
        if !links_reference_page(&links, page + 1) {
            logger::info("No next page link found, stopping pagination");
            break;
        }
        if page >= ctx.config.max_pages {
            logger::warn(&format!(
                "Reached safety limit of {} pages",
                ctx.config.max_pages
            ));
            break;
        }

        page += 1;
        ctx.pause().await;
    }

    let records = collector.into_records();
    logger::info(&format!("Collected {} publications", records.len()));
    Ok(records)
}

#[cfg(test)]
mod helper_tests {
    use super::*;

    fn publisher() -> PublisherConfig {
        PublisherConfig {
            site_base: "https://riojournal.com".to_string(),
            resolver_base: "https://doi.org".to_string(),
            ..PublisherConfig::default()
        }
    }

    fn link(href: &str, title: &str) -> PageLink {
        PageLink {
            href: href.to_string(),
            title: title.to_string(),
        }
    }

    #[test]
    fn test_collection_id_from_topical_collection_path() {
        assert_eq!(
            collection_id("https://site.example/topical_collection/280/").unwrap(),
            "280"
        );
    }

    #[test]
    fn test_collection_id_from_underscore_form() {
        assert_eq!(
            collection_id("https://riojournal.com/browse?collection_417&x=1").unwrap(),
            "417"
        );
    }

    #[test]
    fn test_collection_id_missing_is_input_error() {
        let err = collection_id("https://riojournal.com/articles").unwrap_err();
        assert!(matches!(err, ScrapeError::Input { .. }));
    }

    #[test]
    fn test_publisher_doi_is_cleaned_and_resolved() {
        let mut collector = PublicationCollector::new(&publisher()).unwrap();
        let added = collector.collect_page(&[link(
            "https://doi.org/10.3897/rio.11.e174988);",
            "The genome sequence of the Common Brassy Ringlet",
        )]);

        assert_eq!(added, 1);
        let rec = &collector.records()[0];
        assert_eq!(rec.identifier.as_deref(), Some("10.3897/rio.11.e174988"));
        assert_eq!(rec.address, "https://doi.org/10.3897/rio.11.e174988");
    }

    #[test]
    fn test_same_doi_found_by_two_matchers_is_kept_once() {
        let mut collector = PublicationCollector::new(&publisher()).unwrap();
        let added = collector.collect_page(&[
            link("https://doi.org/10.3897/rio.11.e174988", "First title of the paper"),
            link("http://doi.org/10.3897/rio.11.e174988", "Second title of the paper"),
        ]);

        assert_eq!(added, 1);
        assert_eq!(collector.records()[0].title, "First title of the paper");
    }

    #[test]
    fn test_article_path_absolutized_and_deduplicated() {
        let mut collector = PublicationCollector::new(&publisher()).unwrap();
        let added = collector.collect_page(&[
            link("/article/174988/", ""),
            link("https://riojournal.com/article/174988/", "Full title of the article"),
        ]);

        assert_eq!(added, 1);
        let rec = &collector.records()[0];
        assert_eq!(rec.identifier, None);
        assert_eq!(rec.address, "https://riojournal.com/article/174988/");
        assert_eq!(rec.title, "Article 174988");
    }

    #[test]
    fn test_external_doi_added_after_publisher_matches() {
        let mut collector = PublicationCollector::new(&publisher()).unwrap();
        collector.collect_page(&[
            link("https://doi.org/10.24072/pcjournal.514", ""),
            link("/article/170925/", "Scarce Forester genome"),
            link("https://doi.org/10.3897/rio.11.e173880", "Small Elephant Hawk-moth"),
        ]);

        let ids: Vec<_> = collector
            .records()
            .iter()
            .map(|r| r.address.as_str())
            .collect();
        assert_eq!(
            ids,
            vec![
                "https://doi.org/10.3897/rio.11.e173880",
                "https://riojournal.com/article/170925/",
                "https://doi.org/10.24072/pcjournal.514",
            ]
        );
        assert_eq!(
            collector.records()[2].title,
            "Publication 10.24072/pcjournal.514"
        );
    }

    #[test]
    fn test_records_from_earlier_pages_are_not_repeated() {
        let mut collector = PublicationCollector::new(&publisher()).unwrap();
        let page = [link("https://doi.org/10.3897/rio.11.e166774", "Beautiful Yellow Underwing")];

        assert_eq!(collector.collect_page(&page), 1);
        assert_eq!(collector.collect_page(&page), 0);
        assert_eq!(collector.records().len(), 1);
    }

    #[test]
    fn test_page_links_use_heading_for_short_link_text() {
        let html = r#"<html><body>
            <h3><a href="https://doi.org/10.3897/rio.11.e174988">PDF</a> Erebia cassioides genome</h3>
            <div><a href="/article/173880/">The genome sequence of Deilephila porcellus</a></div>
        </body></html>"#;

        let links = page_links(html);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].title, "PDF Erebia cassioides genome");
        assert_eq!(links[1].href, "/article/173880/");
        assert_eq!(links[1].title, "The genome sequence of Deilephila porcellus");
    }

    #[test]
    fn test_links_reference_page_matches_whole_value() {
        let links = [link("/browse?collection_id=280&p=10", "")];
        assert!(!links_reference_page(&links, 1));
        assert!(links_reference_page(&links, 10));

        let links = [link("?p=1", "")];
        assert!(links_reference_page(&links, 1));
    }
}
