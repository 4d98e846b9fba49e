#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::error::{Result, ScrapeError};
    use crate::scrapers::fetcher::{HttpFetcher, PageFetcher, RetrievalContext};
    use crate::scrapers::tests::fixtures::mock_config;
    use async_trait::async_trait;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Requests carry the configured User-Agent.
    #[tokio::test]
    async fn test_fetch_sends_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/article/174988/download/xml/"))
            .and(header("user-agent", "Mozilla/5.0 (compatible; ResearchBot/1.0)"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<article/>"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&mock_config(&server.uri())).unwrap();
        let body = fetcher
            .fetch(&format!("{}/article/174988/download/xml/", server.uri()))
            .await
            .unwrap();
        assert_eq!(body, "<article/>");
    }

    #[tokio::test]
    async fn test_fetch_uses_configured_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", "taxon-scraper-tests/0.1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = mock_config(&server.uri());
        config.http.user_agent = "taxon-scraper-tests/0.1".to_string();
        let ctx = RetrievalContext::new(config).unwrap();
        assert_eq!(ctx.fetch(&server.uri()).await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_non_success_status_is_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&mock_config(&server.uri())).unwrap();
        match fetcher.fetch(&server.uri()).await {
            Err(ScrapeError::Fetch { url, message }) => {
                assert_eq!(url, server.uri());
                assert!(message.contains("404"));
            }
            other => panic!("expected fetch error, got {:?}", other),
        }
    }

    struct StaticFetcher;

    #[async_trait]
    impl PageFetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            Ok(format!("<page url=\"{}\"/>", url))
        }
    }

    #[tokio::test]
    async fn test_context_delegates_to_custom_fetcher() {
        let ctx = RetrievalContext::with_fetcher(Config::default(), StaticFetcher);
        assert_eq!(
            ctx.fetch("https://riojournal.com/").await.unwrap(),
            "<page url=\"https://riojournal.com/\"/>"
        );
    }
}
