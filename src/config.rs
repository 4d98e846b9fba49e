//! Runtime configuration, loaded from a JSON file.
//!
//! Every field has a default so a partial file (or no file at all) is enough.
//! The site and resolver bases can also be overridden through the
//! `RIO_BASE_URL` and `DOI_RESOLVER_URL` environment variables.

use crate::error::{Result, ScrapeError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File read when no explicit config path is given.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub publisher: PublisherConfig,
    pub http: HttpConfig,
    /// Highest page index the lister visits.
    pub max_pages: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            publisher: PublisherConfig::default(),
            http: HttpConfig::default(),
            max_pages: 10,
        }
    }
}

/// Publisher-specific addresses and namespace markers.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct PublisherConfig {
    /// Journal site, used to absolutize article paths and build listing/XML URLs
    pub site_base: String,
    /// Path of the paginated collection listing endpoint
    pub listing_path: String,
    pub journal_name: String,
    pub journal_id: u32,
    /// DOI registrant prefix owned by the publisher
    pub doi_prefix: String,
    /// DOI resolver base
    pub resolver_base: String,
    /// Identifier substring marking the preprint server
    pub preprint_marker: String,
    /// Preprint site, used to absolutize XML download links
    pub preprint_base: String,
    /// Identifier substring marking the primary journal
    pub journal_marker: String,
    /// XML download path; `{id}` is replaced by the numeric article id
    pub xml_path_template: String,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        let site_base =
            std::env::var("RIO_BASE_URL").unwrap_or_else(|_| "https://riojournal.com".to_string());
        let resolver_base =
            std::env::var("DOI_RESOLVER_URL").unwrap_or_else(|_| "https://doi.org".to_string());
        Self {
            site_base,
            listing_path: "/browse_topical_collection_documents.php".to_string(),
            journal_name: "rio".to_string(),
            journal_id: 17,
            doi_prefix: "10.3897".to_string(),
            resolver_base,
            preprint_marker: "arphapreprints".to_string(),
            preprint_base: "https://arphapreprints.com".to_string(),
            journal_marker: "rio.".to_string(),
            xml_path_template: "/article/{id}/download/xml/".to_string(),
        }
    }
}

impl PublisherConfig {
    /// Address of listing page `page` (page 0 is the collection address itself).
    pub fn listing_url(&self, collection_id: &str, page: u32) -> String {
        format!(
            "{}{}?journal_name={}&collection_id={}&lang=&journal_id={}&p={}",
            self.site_base.trim_end_matches('/'),
            self.listing_path,
            self.journal_name,
            collection_id,
            self.journal_id,
            page
        )
    }

    /// Resolver address of a DOI.
    pub fn resolver_url(&self, doi: &str) -> String {
        format!("{}/{}", self.resolver_base.trim_end_matches('/'), doi)
    }

    /// XML download address of a journal article.
    pub fn article_xml_url(&self, article_id: &str) -> String {
        format!(
            "{}{}",
            self.site_base.trim_end_matches('/'),
            self.xml_path_template.replace("{id}", article_id)
        )
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    /// Delay between requests in milliseconds
    pub delay_ms: u64,
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (compatible; ResearchBot/1.0)".to_string(),
            delay_ms: 1000, // Be polite
            timeout_secs: 30,
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| ScrapeError::Config {
        message: format!("cannot read {}: {}", path.display(), e),
    })?;
    serde_json::from_str(&content).map_err(|e| ScrapeError::Config {
        message: format!("cannot parse {}: {}", path.display(), e),
    })
}

/// Load `path` when given, otherwise `config.json` if present, otherwise defaults.
pub fn load_config_or_default(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) => load_config(p),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            load_config(Path::new(DEFAULT_CONFIG_PATH))
        }
        None => Ok(Config::default()),
    }
}
