//! Small text and URL helpers shared by the scrapers.

use url::Url;

/// Characters stripped from the tail of a DOI scraped out of an href.
const TRAILING_PUNCTUATION: &[char] = &[',', ';', ':', ')', ']', '}'];

/// Removes trailing `, ; : ) ] }` (possibly repeated) from a scraped identifier.
///
/// # Example
/// ```
/// use taxon_scraper::utilities::strip_trailing_punctuation;
///
/// assert_eq!(strip_trailing_punctuation("10.3897/rio.11.e174988),;"), "10.3897/rio.11.e174988");
/// ```
pub fn strip_trailing_punctuation(identifier: &str) -> &str {
    identifier.trim_end_matches(TRAILING_PUNCTUATION)
}

/// Joins text fragments, trimming each and skipping the empty ones.
///
/// Used for link and heading text, where markup splits a title into many
/// whitespace-padded text nodes.
pub fn join_text<'a, I>(fragments: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    fragments
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolves `href` against `base`. Absolute hrefs are returned unchanged; if
/// the base itself is unusable the two are concatenated.
pub fn absolutize(base: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    match Url::parse(base).and_then(|b| b.join(href)) {
        Ok(url) => url.to_string(),
        Err(_) => format!("{}{}", base.trim_end_matches('/'), href),
    }
}
