//! Web search over the DuckDuckGo HTML endpoint.

use crate::models::SearchResult;
use async_trait::async_trait;
use percent_encoding::percent_decode_str;
use reqwest::{Client, Url};
use scraper::{Html, Selector};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

const SEARCH_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid search endpoint: {0}")]
    Endpoint(String),
    #[error("search provider returned HTTP {0}")]
    Status(u16),
}

/// A web search backend.
///
/// Implementations never fail: any provider error yields an empty list so
/// the caller moves on to its next query.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> Vec<SearchResult>;
}

/// Scrapes DuckDuckGo's JavaScript-free results page
pub struct DuckDuckGo {
    client: Client,
    endpoint: String,
}

impl DuckDuckGo {
    pub fn new(endpoint: impl Into<String>, user_agent: &str) -> Result<Self, SearchError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(SEARCH_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    async fn try_search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, SearchError> {
        let url = Url::parse_with_params(&self.endpoint, &[("q", query)])
            .map_err(|e| SearchError::Endpoint(e.to_string()))?;
        let response = self
            .client
            .get(url)
            .header("Accept", "text/html")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SearchError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        Ok(parse_results(&body, limit))
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGo {
    async fn search(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        info!("Searching web for: {} (max results: {})", query, limit);
        match self.try_search(query, limit).await {
            Ok(results) => {
                info!("Found {} results for query: {}", results.len(), query);
                results
            }
            Err(e) => {
                warn!("Error searching web for {:?}: {}", query, e);
                Vec::new()
            }
        }
    }
}

/// Parse a DuckDuckGo HTML results page. Results without an http(s) link are dropped.
pub fn parse_results(body: &str, limit: usize) -> Vec<SearchResult> {
    let document = Html::parse_document(body);
    let (Ok(result_sel), Ok(link_sel), Ok(snippet_sel)) = (
        Selector::parse(".result"),
        Selector::parse("a.result__a"),
        Selector::parse(".result__snippet"),
    ) else {
        return Vec::new();
    };

    document
        .select(&result_sel)
        .filter_map(|result| {
            let link = result.select(&link_sel).next()?;
            let title = link.text().collect::<String>().trim().to_string();
            let url = decode_redirect(link.value().attr("href").unwrap_or(""));
            let snippet = result
                .select(&snippet_sel)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
                .unwrap_or_default();
            (!title.is_empty() && url.starts_with("http")).then(|| SearchResult::new(title, url, snippet))
        })
        .take(limit)
        .collect()
}

/// DuckDuckGo wraps result links as `//duckduckgo.com/l/?uddg=<encoded>&rut=...`.
fn decode_redirect(href: &str) -> String {
    if let Some(pos) = href.find("uddg=") {
        let start = pos + 5;
        let end = href[start..].find('&').map(|i| start + i).unwrap_or(href.len());
        let encoded = &href[start..end];
        if !encoded.is_empty() {
            return percent_decode_str(encoded).decode_utf8_lossy().into_owned();
        }
    }
    href.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS: &str = r#"<html><body>
        <div class="result">
          <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.azlyrics.com%2Flyrics%2Fjohnlennon%2Fimagine.html&rut=abc">John Lennon - Imagine Lyrics | AZLyrics.com</a>
          <a class="result__snippet">Imagine there's no heaven...</a>
        </div>
        <div class="result">
          <a class="result__a" href="https://genius.com/John-lennon-imagine-lyrics">John Lennon – Imagine Lyrics | Genius</a>
        </div>
        <div class="result">
          <a class="result__a" href="/y.js?ad_provider=x">Sponsored</a>
        </div>
        </body></html>"#;

    #[test]
    fn test_parse_results() {
        let results = parse_results(RESULTS, 10);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].url, "https://www.azlyrics.com/lyrics/johnlennon/imagine.html");
        assert_eq!(results[0].snippet, "Imagine there's no heaven...");
        assert_eq!(results[1].url, "https://genius.com/John-lennon-imagine-lyrics");
        assert!(results[1].snippet.is_empty());
    }

    #[test]
    fn test_limit_respected() {
        assert_eq!(parse_results(RESULTS, 1).len(), 1);
    }

    #[test]
    fn test_decode_plain_href() {
        assert_eq!(decode_redirect("https://example.com/a"), "https://example.com/a");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_yields_empty() {
        let provider = DuckDuckGo::new("not a url", "test").unwrap();
        assert!(provider.search("imagine lyrics", 5).await.is_empty());
    }
}
