//! Where to download a publication's XML from, given its DOI.
//!
//! Derivation is pure; only preprints need a network round trip, to find the
//! XML download link on their landing page.

use crate::config::PublisherConfig;
use crate::error::{Result, ScrapeError};
use crate::logger;
use crate::scrapers::fetcher::RetrievalContext;
use crate::utilities::absolutize;
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{Html, Selector};

lazy_static! {
    static ref XML_DOWNLOAD: Regex = Regex::new(r"\.xml|/download/xml").unwrap();
}

/// Result of address derivation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum XmlAddress {
    /// The XML lives at this address.
    Direct(String),
    /// Preprint: the XML link must be read from this landing page.
    PreprintLanding(String),
    /// Unrecognized namespace: the resolver response is used as the XML.
    Resolver(String),
}

impl XmlAddress {
    pub fn url(&self) -> &str {
        match self {
            XmlAddress::Direct(u) | XmlAddress::PreprintLanding(u) | XmlAddress::Resolver(u) => u,
        }
    }
}

/// Derive the XML address for `identifier`. Rules, first match wins:
/// - preprint namespace: landing page at the resolver
/// - journal namespace: fixed download template keyed by the numeric article id
/// - anything else: the resolver address itself
pub fn derive_xml_address(identifier: &str, publisher: &PublisherConfig) -> XmlAddress {
    if identifier.contains(&publisher.preprint_marker) {
        XmlAddress::PreprintLanding(publisher.resolver_url(identifier))
    } else if identifier.contains(&publisher.journal_marker) {
        XmlAddress::Direct(publisher.article_xml_url(article_id(identifier)))
    } else {
        XmlAddress::Resolver(publisher.resolver_url(identifier))
    }
}

/// Numeric article id: the token after the last `.`, minus its `e` marker.
///
/// ```
/// use taxon_scraper::scrapers::xml_address::article_id;
///
/// assert_eq!(article_id("10.3897/rio.11.e174988"), "174988");
/// ```
pub fn article_id(identifier: &str) -> &str {
    let token = identifier.rsplit('.').next().unwrap_or(identifier);
    token.strip_prefix('e').unwrap_or(token)
}

/// First link on `html` whose target looks like an XML download, resolved
/// against `base`.
pub fn find_xml_download_link(html: &str, base: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]").ok()?;
    document
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .find(|href| XML_DOWNLOAD.is_match(href))
        .map(|href| absolutize(base, href))
}

/// Turn a derived address into the final XML URL, reading the preprint
/// landing page when needed.
pub async fn resolve_xml_address(ctx: &RetrievalContext, address: XmlAddress) -> Result<String> {
    match address {
        XmlAddress::PreprintLanding(landing) => {
            let html = ctx.fetch(&landing).await?;
            find_xml_download_link(&html, &ctx.config.publisher.preprint_base)
                .ok_or(ScrapeError::AddressDerivation { url: landing })
        }
        XmlAddress::Direct(url) | XmlAddress::Resolver(url) => Ok(url),
    }
}

/// Fetch the XML document of the publication identified by `identifier`.
pub async fn fetch_xml(ctx: &RetrievalContext, identifier: &str) -> Result<String> {
    let address = derive_xml_address(identifier, &ctx.config.publisher);
    let xml_url = resolve_xml_address(ctx, address).await?;
    logger::info(&format!("Fetching XML from: {}", xml_url));
    ctx.fetch(&xml_url).await
}
