//! Error type shared by the lister, the address derivation and the extractor.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    /// The collection address carries no recognizable collection identifier.
    #[error("Invalid collection address '{address}': no collection identifier found")]
    Input { address: String },

    /// Transport failure or non-success HTTP status.
    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    /// The document is not well-formed XML.
    #[error("Malformed XML: {message}")]
    Parse { message: String },

    /// A preprint landing page offered no XML download link.
    #[error("No XML download link found on {url}")]
    AddressDerivation { url: String },

    #[error("No DOI available")]
    MissingIdentifier,

    #[error("Invalid configuration: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ScrapeError {
    pub(crate) fn fetch(url: &str, message: impl ToString) -> Self {
        ScrapeError::Fetch {
            url: url.to_string(),
            message: message.to_string(),
        }
    }

    pub(crate) fn parse(message: impl ToString) -> Self {
        ScrapeError::Parse {
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
