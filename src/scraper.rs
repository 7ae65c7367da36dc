//! Web scraping module for page fetching and main-content isolation.
//!
//! Uses reqwest for fetching and scraper for HTML parsing.

use crate::models::FetchedPage;
use crate::sites::{self, HostRule};
use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Tags whose text is never page content
const NON_CONTENT_TAGS: &[&str] = &["script", "style", "nav", "header", "footer", "iframe", "noscript"];

/// Containers likely to hold the main content, best first
const CONTENT_SELECTORS: &[&str] = &[
    "article",
    "div#lyrics",
    "div.lyrics",
    "div[class*='lyric']",
    "div[id*='lyric']",
    "div.content",
    "div#content",
    "div.main-content",
];

/// A content container must carry more text than this to be chosen over the body
const MIN_CONTAINER_CHARS: usize = 200;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request timed out for URL: {0}")]
    Timeout(String),
    #[error("HTTP error {status} for URL: {url}")]
    Status { status: u16, url: String },
    #[error("error fetching URL: {url}: {message}")]
    Request { url: String, message: String },
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Raw response of a successful GET
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
    pub final_url: String,
}

/// Fetches pages. Failures come back as a `FetchedPage` with `success == false`.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str, timeout: Duration) -> FetchedPage;
}

/// reqwest-backed fetcher with a browser-like identity
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .default_headers(browser_headers())
            .build()?;
        Ok(Self { client })
    }

    /// GET `url`, telling timeouts, non-2xx statuses and other failures apart
    pub async fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, FetchError> {
        let classify = |e: reqwest::Error| {
            if e.is_timeout() {
                FetchError::Timeout(url.to_string())
            } else {
                FetchError::Request {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        };

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let final_url = response.url().to_string();
        let body = response.text().await.map_err(classify)?;
        Ok(HttpResponse {
            status: status.as_u16(),
            body,
            final_url,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> FetchedPage {
        debug!("Fetching page content from: {}", url);
        match self.get(url, timeout).await {
            Ok(response) => {
                let page = parse_page(url, &response.body);
                debug!(
                    "Fetched {} ({} chars of main text, final URL {})",
                    url,
                    page.main_text.chars().count(),
                    response.final_url
                );
                page
            }
            Err(e) => {
                warn!("{}", e);
                FetchedPage::failed(url, e.to_string())
            }
        }
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"),
    );
    headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert("Upgrade-Insecure-Requests", HeaderValue::from_static("1"));
    headers.insert(
        "sec-ch-ua",
        HeaderValue::from_static("\"Google Chrome\";v=\"131\", \"Chromium\";v=\"131\", \"Not_A Brand\";v=\"24\""),
    );
    headers.insert("sec-ch-ua-mobile", HeaderValue::from_static("?0"));
    headers.insert("sec-ch-ua-platform", HeaderValue::from_static("\"Windows\""));
    headers
}

/// Build a successful `FetchedPage` from downloaded HTML
pub fn parse_page(url: &str, html: &str) -> FetchedPage {
    let document = Html::parse_document(html);
    FetchedPage {
        url: url.to_string(),
        raw_markup: html.to_string(),
        main_text: extract_main_text(url, &document),
        title: extract_title(&document).unwrap_or_default(),
        success: true,
        error: None,
    }
}

/// Extract the page title from <title> or <h1>
pub fn extract_title(document: &Html) -> Option<String> {
    ["title", "h1"].iter().find_map(|tag| {
        let selector = Selector::parse(tag).ok()?;
        let element = document.select(&selector).next()?;
        let title: String = element.text().collect();
        let title = title.trim();
        (!title.is_empty()).then(|| title.to_string())
    })
}

/// Main text of the page: the host's own rule, then a large content container,
/// then the whole body
fn extract_main_text(url: &str, document: &Html) -> String {
    if let Some(rules) = sites::rules_for(url) {
        if let Some(text) = apply_host_rules(document, rules) {
            return text;
        }
    }

    for selector_str in CONTENT_SELECTORS {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(element) = document.select(&selector).next() {
                let text = visible_text(element);
                if text.chars().filter(|c| !c.is_whitespace()).count() > MIN_CONTAINER_CHARS {
                    return text;
                }
            }
        }
    }

    Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next())
        .map(visible_text)
        .unwrap_or_else(|| visible_text(document.root_element()))
}

/// Apply a host's rules in order; the first rule that yields text wins
pub fn apply_host_rules(document: &Html, rules: &[HostRule]) -> Option<String> {
    rules.iter().find_map(|rule| {
        let text = match *rule {
            HostRule::First(css) => {
                let selector = Selector::parse(css).ok()?;
                document.select(&selector).next().map(visible_text)?
            }
            HostRule::All(css) => {
                let selector = Selector::parse(css).ok()?;
                document
                    .select(&selector)
                    .map(visible_text)
                    .filter(|t| !t.is_empty())
                    .collect::<Vec<_>>()
                    .join("\n\n")
            }
        };
        (!text.trim().is_empty()).then_some(text)
    })
}

/// Visible text under `root`, one trimmed text node per line, skipping
/// anything inside a non-content tag
pub fn visible_text(root: ElementRef<'_>) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .take_while(|ancestor| ancestor.id() != root.id())
            .chain(std::iter::once(*root))
            .any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|e| NON_CONTENT_TAGS.contains(&e.name()))
            });
        if hidden {
            continue;
        }
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            lines.push(trimmed);
        }
    }
    lines.join("\n")
}
