//! Offline stand-ins for the web, shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use song_vocab::models::{FetchedPage, SearchResult};
use song_vocab::scraper::{self, PageFetcher};
use song_vocab::search::SearchProvider;
use song_vocab::storage::ArtifactStore;
use song_vocab::SongAgent;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Returns the same results for every query and records what was asked
#[derive(Default)]
pub struct StubSearch {
    results: Vec<SearchResult>,
    pub queries: Mutex<Vec<String>>,
}

impl StubSearch {
    pub fn with_results(results: Vec<SearchResult>) -> Self {
        Self {
            results,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn issued(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for StubSearch {
    async fn search(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        self.queries.lock().unwrap().push(query.to_string());
        self.results.iter().take(limit).cloned().collect()
    }
}

/// Serves canned HTML by URL; unknown URLs fail like a dead link
#[derive(Default)]
pub struct StubFetcher {
    pages: HashMap<String, String>,
    pub fetched: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch(&self, url: &str, _timeout: Duration) -> FetchedPage {
        self.fetched.lock().unwrap().push(url.to_string());
        match self.pages.get(url) {
            Some(html) => scraper::parse_page(url, html),
            None => FetchedPage::failed(url, "HTTP error: 404 Not Found"),
        }
    }
}

pub fn agent(search: Arc<StubSearch>, fetcher: Arc<StubFetcher>, dir: &std::path::Path) -> SongAgent {
    SongAgent::new(search, fetcher, ArtifactStore::new(dir))
}

pub const IMAGINE_URL: &str = "https://www.example.com/john-lennon/imagine-lyrics";

pub const IMAGINE_PAGE: &str = r#"<html>
<head><title>Imagine Lyrics | John Lennon</title></head>
<body>
  <nav>Home | Artists | Charts</nav>
  <article>
    Imagine there's no heaven<br>
    It's easy if you try<br>
    No hell below us<br>
    Above us only sky<br>
    Imagine all the people<br>
    Living for today<br>
  </article>
  <footer>Lyrics provided by Example Lyrics</footer>
</body>
</html>"#;

pub const LEMON_NATIVE_URL: &str = "https://www.uta-net.com/song/240000/";

pub const LEMON_NATIVE_PAGE: &str = r#"<html>
<head><title>Lemon 米津玄師 歌詞</title></head>
<body>
  <div id="kashi_area">
    夢ならばどれほどよかったでしょう<br>
    未だにあなたのことを夢にみる<br>
    忘れた物を取りに帰るように<br>
    古びた思い出の埃を払う<br>
  </div>
</body>
</html>"#;

pub const LEMON_ROMAJI_URL: &str = "https://www.example.com/kenshi-yonezu/lemon-romaji-lyrics";

pub const LEMON_ROMAJI_PAGE: &str = r#"<html>
<head><title>Lemon Romaji Lyrics</title></head>
<body>
  <div class="lyrics">
    Yume naraba dore hodo yokatta deshou<br>
    Imada ni anata no koto wo yume ni miru<br>
    Wasureta mono wo tori ni kaeru you ni<br>
    Furubita omoide no hokori wo harau<br>
  </div>
</body>
</html>"#;
