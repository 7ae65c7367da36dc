//! Lyrics extraction from fetched pages.
//!
//! Extraction runs an ordered list of [`ExtractionStrategy`] values and keeps
//! the first non-empty answer:
//!
//! 1. [`SiteStrategy`]: per-host rules from [`crate::sites::SITE_RULES`]
//! 2. [`ContainerStrategy`]: well-known lyrics containers
//! 3. [`LineGroupStrategy`]: runs of short lines in the page's main text
//!
//! Whatever wins is passed through [`clean_lyrics`]. Extraction never fails;
//! an empty string means "nothing here".

use crate::models::FetchedPage;
use crate::scraper::{apply_host_rules, visible_text};
use crate::sites;
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

/// Containers tried by [`ContainerStrategy`], most specific first
const LYRICS_SELECTORS: &[&str] = &[
    "div.lyrics",
    "div.lyricbox",
    "div.ringtone ~ div",
    "div.songLyricsV14",
    "div.entry-content",
    "div#kashi_area",
    "div.lyricBox",
    "div.noprint",
    "div[class*='lyrics']",
    "div[id*='lyrics']",
    "pre",
    "article",
    ".lyrics__content",
    "#lyric-body-text",
];

/// A container's cleaned text must be longer than this
const MIN_CONTAINER_CHARS: usize = 100;

/// Lines at least this long are prose, not lyrics
const MAX_LYRIC_LINE_CHARS: usize = 150;

/// A run needs more lines than this to count as lyrics
const MIN_GROUP_LINES: usize = 5;

/// How many of the largest runs are checked for section markers
const MARKER_SEARCH_DEPTH: usize = 3;

const SECTION_MARKERS: &[&str] = &["verse", "chorus", "bridge", "hook", "intro", "outro"];

const BOILERPLATE_PHRASES: &[&str] = &[
    "lyrics licensed & provided by",
    "lyrics provided by",
    "lyrics powered by",
    "lyrics from lyrics.com",
    "lyrics from azlyrics",
];

lazy_static! {
    static ref BOILERPLATE: Regex = {
        let alternatives: Vec<String> = BOILERPLATE_PHRASES.iter().map(|p| regex::escape(p)).collect();
        Regex::new(&format!(r"(?im)^.*(?:{}).*$", alternatives.join("|"))).unwrap()
    };
    static ref SECTION_TAG: Regex = Regex::new(r"(?m)^[ \t]*\[[^\]\n]*\]").unwrap();
    static ref MARKUP: Regex = Regex::new(r"<[^>\n]*>").unwrap();
    static ref INLINE_SPACE: Regex = Regex::new(r"[ \t\u{a0}]+").unwrap();
    static ref BLANK_RUNS: Regex = Regex::new(r"\n{3,}").unwrap();
}

/// One way of finding lyrics in a page. Returns raw text, or `None`.
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn extract(&self, page: &FetchedPage) -> Option<String>;
}

/// Known host, known container
pub struct SiteStrategy;

impl ExtractionStrategy for SiteStrategy {
    fn name(&self) -> &'static str {
        "site"
    }

    fn extract(&self, page: &FetchedPage) -> Option<String> {
        let rules = sites::rules_for(&page.url)?;
        let document = Html::parse_document(&page.raw_markup);
        apply_host_rules(&document, rules)
    }
}

/// First well-known lyrics container with enough text
pub struct ContainerStrategy;

impl ExtractionStrategy for ContainerStrategy {
    fn name(&self) -> &'static str {
        "container"
    }

    fn extract(&self, page: &FetchedPage) -> Option<String> {
        let document = Html::parse_document(&page.raw_markup);
        LYRICS_SELECTORS.iter().find_map(|css| {
            let selector = Selector::parse(css).ok()?;
            let text = visible_text(document.select(&selector).next()?);
            (clean_lyrics(&text).chars().count() > MIN_CONTAINER_CHARS).then_some(text)
        })
    }
}

/// Runs of short lines in the page's main text
pub struct LineGroupStrategy;

impl ExtractionStrategy for LineGroupStrategy {
    fn name(&self) -> &'static str {
        "line-groups"
    }

    fn extract(&self, page: &FetchedPage) -> Option<String> {
        pick_line_group(&page.main_text)
    }
}

/// Split text into runs of consecutive short, non-empty lines and pick the
/// run most likely to be lyrics
pub fn pick_line_group(text: &str) -> Option<String> {
    let mut groups: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines().map(str::trim) {
        if !line.is_empty() && line.chars().count() < MAX_LYRIC_LINE_CHARS {
            current.push(line);
        } else if !current.is_empty() {
            if current.len() > MIN_GROUP_LINES {
                groups.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
        }
    }
    if current.len() > MIN_GROUP_LINES {
        groups.push(current);
    }

    // Stable: equal-sized runs keep document order
    groups.sort_by(|a, b| b.len().cmp(&a.len()));

    let with_markers = groups.iter().take(MARKER_SEARCH_DEPTH).find(|group| {
        group.iter().any(|line| {
            let lower = line.to_lowercase();
            SECTION_MARKERS.iter().any(|m| lower.contains(m))
        })
    });

    with_markers.or(groups.first()).map(|group| group.join("\n"))
}

/// Strip boilerplate, leading section tags and stray markup, and normalise whitespace
pub fn clean_lyrics(text: &str) -> String {
    let text = BOILERPLATE.replace_all(text, "");
    let text = SECTION_TAG.replace_all(&text, "");
    let text = MARKUP.replace_all(&text, "");
    let text = INLINE_SPACE.replace_all(&text, " ");
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let joined = lines.join("\n");
    let text = BLANK_RUNS.replace_all(&joined, "\n\n");
    text.trim().to_string()
}

/// Runs strategies in order and cleans the winner
pub struct LyricsExtractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl Default for LyricsExtractor {
    fn default() -> Self {
        Self::new(vec![
            Box::new(SiteStrategy),
            Box::new(ContainerStrategy),
            Box::new(LineGroupStrategy),
        ])
    }
}

impl LyricsExtractor {
    pub fn new(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Cleaned lyrics from `page`, or an empty string
    pub fn extract(&self, page: &FetchedPage) -> String {
        if !page.success || page.raw_markup.is_empty() {
            return String::new();
        }
        for strategy in &self.strategies {
            let Some(raw) = strategy.extract(page) else {
                continue;
            };
            let cleaned = clean_lyrics(&raw);
            if !cleaned.is_empty() {
                debug!(
                    "Extracted {} chars from {} using {} strategy",
                    cleaned.chars().count(),
                    page.url,
                    strategy.name()
                );
                return cleaned;
            }
        }
        debug!("Could not identify lyrics in {}", page.url);
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraper::parse_page;

    fn page(url: &str, html: &str) -> FetchedPage {
        parse_page(url, html)
    }

    #[test]
    fn test_clean_lyrics() {
        let raw = "[Verse 1]  Hey brother\n\tthere's an   endless road\n\n\n\nLyrics provided by SomeCorp\n<b>to</b> rediscover\nkeep [this] tag\n";
        assert_eq!(
            clean_lyrics(raw),
            "Hey brother\nthere's an endless road\n\nto rediscover\nkeep [this] tag"
        );
    }

    #[test]
    fn test_genius_legacy_marker_first() {
        let html = r#"<html><body>
            <div class="lyrics">Old style line one<br>Old style line two</div>
            <div data-lyrics-container="true">New style</div>
            </body></html>"#;
        let text = LyricsExtractor::default().extract(&page("https://genius.com/a-lyrics", html));
        assert_eq!(text, "Old style line one\nOld style line two");
    }

    #[test]
    fn test_genius_data_attribute_fallback() {
        let html = r#"<html><body>
            <div data-lyrics-container="true">[Chorus]<br>One<br>Two</div>
            <div data-lyrics-container="true">Three</div>
            </body></html>"#;
        let text = LyricsExtractor::default().extract(&page("https://genius.com/a-lyrics", html));
        assert_eq!(text, "One\nTwo\n\nThree");
    }

    #[test]
    fn test_container_needs_enough_text() {
        let verse = "When the night has come and the land is dark<br>".repeat(4);
        let html = format!(
            r#"<html><body><div class="lyrics">too short</div><pre>{}</pre></body></html>"#,
            verse
        );
        let text = ContainerStrategy.extract(&page("https://example.com/stand-by-me-lyrics", &html));
        assert!(text.unwrap().starts_with("When the night has come"));
    }

    #[test]
    fn test_line_groups_prefer_markers() {
        let prose = "This is a long paragraph of prose about the song that goes on and on well past the limit for a line of lyrics, so it breaks runs.";
        let prose = format!("{} {}", prose, prose);
        let menu = "Home\nArtists\nAlbums\nCharts\nNews\nContact\nLogin\nSignup";
        let song = "Verse one\nline a\nline b\nChorus\nline c\nline d";
        let text = format!("{}\n{}\n{}", menu, prose, song);
        assert_eq!(pick_line_group(&text).unwrap(), song);
    }

    #[test]
    fn test_line_groups_longest_without_markers() {
        let text = "a\nb\nc\nd\ne\nf\n\n1\n2\n3\n4\n5\n6\n7";
        assert_eq!(pick_line_group(text).unwrap(), "1\n2\n3\n4\n5\n6\n7");
        assert!(pick_line_group("a\nb\nc").is_none());
    }

    #[test]
    fn test_failed_page_yields_empty() {
        let failed = FetchedPage::failed("https://example.com", "timeout");
        assert!(LyricsExtractor::default().extract(&failed).is_empty());
    }

    #[test]
    fn test_nothing_found_yields_empty() {
        let html = "<html><body><p>Just one short paragraph.</p></body></html>";
        assert!(LyricsExtractor::default()
            .extract(&page("https://example.com", html))
            .is_empty());
    }
}
