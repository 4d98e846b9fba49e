//! Tests for utility functions.

#[cfg(test)]
mod tests {
    use crate::utilities::{absolutize, join_text, strip_trailing_punctuation};

    /// Test stripping one trailing punctuation character.
    #[test]
    fn test_strip_single_trailing_character() {
        assert_eq!(
            strip_trailing_punctuation("10.3897/rio.11.e174988)"),
            "10.3897/rio.11.e174988"
        );
    }

    /// Test stripping a run of mixed trailing punctuation.
    #[test]
    fn test_strip_repeated_trailing_characters() {
        assert_eq!(
            strip_trailing_punctuation("10.24072/pcjournal.514]};:,"),
            "10.24072/pcjournal.514"
        );
    }

    /// Punctuation inside the identifier is kept.
    #[test]
    fn test_strip_keeps_inner_punctuation() {
        assert_eq!(
            strip_trailing_punctuation("10.1000/(abc);x"),
            "10.1000/(abc);x"
        );
    }

    /// Test that a clean identifier comes back untouched.
    #[test]
    fn test_strip_clean_identifier() {
        assert_eq!(strip_trailing_punctuation("10.3897/abc"), "10.3897/abc");
    }

    #[test]
    fn test_join_text_trims_and_skips_empty_fragments() {
        let joined = join_text(vec!["  The genome ", "\n", " of ", "Erebia", ""]);
        assert_eq!(joined, "The genome of Erebia");
    }

    #[test]
    fn test_join_text_empty() {
        assert_eq!(join_text(Vec::<&str>::new()), "");
    }

    /// Relative article paths are resolved against the site base.
    #[test]
    fn test_absolutize_relative_path() {
        assert_eq!(
            absolutize("https://riojournal.com", "/article/174988/"),
            "https://riojournal.com/article/174988/"
        );
    }

    #[test]
    fn test_absolutize_keeps_absolute_url() {
        assert_eq!(
            absolutize("https://riojournal.com", "https://example.org/article/1/"),
            "https://example.org/article/1/"
        );
    }

    /// A base with a port (as served by a local mock server) is kept.
    #[test]
    fn test_absolutize_base_with_port() {
        assert_eq!(
            absolutize("http://127.0.0.1:8080", "/article/5/"),
            "http://127.0.0.1:8080/article/5/"
        );
    }

    #[test]
    fn test_absolutize_unparseable_base_concatenates() {
        assert_eq!(absolutize("riojournal", "/article/5/"), "riojournal/article/5/");
    }
}
