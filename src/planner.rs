//! Turns a free-form request into an ordered list of search queries.

use crate::sites::{TargetLanguage, TARGET_LANGUAGES};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::info;

/// Languages a request may name in a trailing "in <language>" clause
const LANGUAGE_NAMES: &[&str] = &[
    "english", "japanese", "spanish", "french", "german", "italian", "chinese", "korean",
];

lazy_static! {
    static ref LEAD_INS: Vec<Regex> = [
        r"(?i)^\s*(?:please\s+)?(?:find|fetch|get|show|look\s+up)(?:\s+me)?\s+(?:the\s+)?lyrics(?:\s+(?:of|for|to))?(?:\s+the)?(?:\s+song)?\b",
        r"(?i)^\s*(?:please\s+)?search\s+for(?:\s+the)?\s+lyrics(?:\s+(?:of|for|to))?(?:\s+the)?(?:\s+song)?\b",
        r"(?i)^\s*what\s+are\s+the\s+lyrics(?:\s+(?:of|for|to))?(?:\s+the)?(?:\s+song)?\b",
        r"(?i)^\s*lyrics\s+(?:of|for|to)(?:\s+the)?(?:\s+song)?\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();
    static ref LANGUAGE_CLAUSE: Regex = Regex::new(&format!(
        r"(?i)\s+in\s+({})\s*[.!?]?\s*$",
        LANGUAGE_NAMES.join("|")
    ))
    .unwrap();
    static ref SONG_PREFIX: Regex = Regex::new(r"(?i)^\s*(?:the\s+)?song\s+").unwrap();
    static ref BY_ARTIST: Regex = Regex::new(r"(?i)^(.+?)\s+by\s+(.+)$").unwrap();
    static ref RESULT_TITLE: Regex = Regex::new(r"(?i)^(.*?)\s+lyrics\s+(?:by|:)\s+(.+)$").unwrap();
    static ref TRAILING_PUNCT: Regex = Regex::new(r"[\s.!?]+$").unwrap();
    static ref LYRICS_WORD: Regex = Regex::new(r"(?i)\blyrics\b").unwrap();
}

/// What was understood from a request
#[derive(Debug, Clone)]
pub struct SongRequest {
    /// The request as typed
    pub raw: String,
    /// Request with lead-in phrases and the language clause removed
    pub cleaned: String,
    pub title: Option<String>,
    pub artist: Option<String>,
    /// Lowercase language name from an "in <language>" clause
    pub language: Option<String>,
    /// Set when the request targets a non-Latin script
    pub target: Option<TargetLanguage>,
}

impl SongRequest {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim().to_string();

        let mut cleaned = raw.clone();
        for lead_in in LEAD_INS.iter() {
            cleaned = lead_in.replace(&cleaned, "").into_owned();
        }

        let language = LANGUAGE_CLAUSE
            .captures(&cleaned)
            .map(|caps| caps[1].to_lowercase());
        cleaned = LANGUAGE_CLAUSE.replace(&cleaned, "").into_owned();
        cleaned = TRAILING_PUNCT.replace(&cleaned, "").trim().to_string();

        let (title, artist) = split_title_artist(&cleaned);
        let target = detect_target(&raw);

        info!(
            "Extracted song: {:?}, artist: {:?}, language: {:?}",
            title, artist, language
        );

        Self {
            raw,
            cleaned,
            title,
            artist,
            language,
            target,
        }
    }

    pub fn is_non_latin(&self) -> bool {
        self.target.is_some()
    }

    /// "{title} {artist}" when both are known, the cleaned request otherwise
    fn subject(&self) -> String {
        match (&self.title, &self.artist) {
            (Some(title), Some(artist)) => format!("{} {}", title, artist),
            _ => self.cleaned.clone(),
        }
    }
}

fn strip_quotes(s: &str) -> String {
    s.trim()
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '“' | '”' | '「' | '」'))
        .trim()
        .to_string()
}

fn split_title_artist(cleaned: &str) -> (Option<String>, Option<String>) {
    let without_prefix = SONG_PREFIX.replace(cleaned, "");
    match BY_ARTIST.captures(&without_prefix) {
        Some(caps) => {
            let title = strip_quotes(&caps[1]);
            let artist = strip_quotes(&caps[2]);
            (
                (!title.is_empty()).then_some(title),
                (!artist.is_empty()).then_some(artist),
            )
        }
        None => (None, None),
    }
}

/// The non-Latin target of a request: named explicitly, or implied by
/// non-ASCII characters in the request
fn detect_target(raw: &str) -> Option<TargetLanguage> {
    let lower = raw.to_lowercase();
    TARGET_LANGUAGES
        .iter()
        .find(|t| lower.contains(t.name))
        .or_else(|| (!raw.is_ascii()).then(|| &TARGET_LANGUAGES[0]))
        .copied()
}

/// Title and artist from a search result title like "Imagine Lyrics by John Lennon"
pub fn title_artist_from_result(title: &str) -> Option<(String, String)> {
    let caps = RESULT_TITLE.captures(title.trim())?;
    let song = caps[1].trim().to_string();
    let artist = caps[2]
        .split(['|', '-', '–'])
        .next()
        .unwrap_or("")
        .trim()
        .to_string();
    (!song.is_empty() && !artist.is_empty()).then_some((song, artist))
}

/// Title and artist from a page title like "Imagine Lyrics | John Lennon"
pub fn title_artist_from_page(page_title: &str) -> Option<(String, String)> {
    if !page_title.to_lowercase().contains("lyrics") {
        return None;
    }
    let mut parts = page_title.split('|');
    let song_part = parts.next()?;
    let artist = parts.next()?.trim().to_string();
    let song = LYRICS_WORD
        .replace_all(song_part, "")
        .trim()
        .to_string();
    (!song.is_empty() && !artist.is_empty()).then_some((song, artist))
}

/// Ordered search queries for a request, most specific first
#[derive(Debug, Clone)]
pub struct QueryPlan {
    pub request: SongRequest,
    pub queries: Vec<String>,
}

impl QueryPlan {
    pub fn build(raw: &str) -> Self {
        let request = SongRequest::parse(raw);
        let mut queries: Vec<String> = Vec::new();
        let subject = request.subject();

        if let Some(target) = &request.target {
            queries.push(format!(
                "{} {} {}",
                subject, target.lyrics_marker, target.native_name
            ));
            queries.push(format!("{} {}", subject, target.lyrics_marker));
            queries.push(format!("{} {}", subject, target.transliteration_probe));
        }
        if let (Some(title), Some(artist)) = (&request.title, &request.artist) {
            queries.push(format!("{} {} lyrics", title, artist));
        }
        let generic = if request.cleaned.is_empty() {
            request.raw.clone()
        } else {
            request.cleaned.clone()
        };
        queries.push(format!("{} lyrics", generic).trim().to_string());

        let mut seen = std::collections::HashSet::new();
        queries.retain(|q| seen.insert(q.to_lowercase()));

        info!("Searching with queries: {:?}", queries);
        Self { request, queries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_common_phrasing() {
        let request = SongRequest::parse("find lyrics for Imagine by John Lennon");
        assert_eq!(request.cleaned, "Imagine by John Lennon");
        assert_eq!(request.title.as_deref(), Some("Imagine"));
        assert_eq!(request.artist.as_deref(), Some("John Lennon"));
        assert!(!request.is_non_latin());
    }

    #[test]
    fn test_parse_song_keyword_and_language() {
        let request = SongRequest::parse("Get me the lyrics for the song \"Lemon\" by Kenshi Yonezu in Japanese.");
        assert_eq!(request.title.as_deref(), Some("Lemon"));
        assert_eq!(request.artist.as_deref(), Some("Kenshi Yonezu"));
        assert_eq!(request.language.as_deref(), Some("japanese"));
        assert_eq!(request.target.map(|t| t.name), Some("japanese"));
    }

    #[test]
    fn test_non_ascii_implies_target() {
        let request = SongRequest::parse("夜に駆ける YOASOBI");
        assert!(request.is_non_latin());
        assert_eq!(request.title, None);
    }

    #[test]
    fn test_latin_plan_order() {
        let plan = QueryPlan::build("find lyrics for Imagine by John Lennon");
        assert_eq!(
            plan.queries,
            vec!["Imagine John Lennon lyrics", "Imagine by John Lennon lyrics"]
        );
    }

    #[test]
    fn test_japanese_plan_puts_native_queries_first() {
        let plan = QueryPlan::build("find lyrics for the song Lemon by Kenshi Yonezu in japanese");
        assert_eq!(
            plan.queries,
            vec![
                "Lemon Kenshi Yonezu 歌詞 日本語",
                "Lemon Kenshi Yonezu 歌詞",
                "Lemon Kenshi Yonezu romaji lyrics",
                "Lemon Kenshi Yonezu lyrics",
                "Lemon by Kenshi Yonezu lyrics",
            ]
        );
    }

    #[test]
    fn test_unparseable_request_still_plans() {
        let plan = QueryPlan::build("hey brother");
        assert_eq!(plan.queries, vec!["hey brother lyrics"]);
        let plan = QueryPlan::build("find lyrics for");
        assert_eq!(plan.queries.len(), 1);
    }

    #[test]
    fn test_metadata_from_titles() {
        assert_eq!(
            title_artist_from_result("Hey Brother Lyrics by Avicii - Lyrics.com"),
            Some(("Hey Brother".into(), "Avicii".into()))
        );
        assert_eq!(title_artist_from_result("Avicii - Hey Brother"), None);
        assert_eq!(
            title_artist_from_page("Hey Brother Lyrics | Avicii"),
            Some(("Hey Brother".into(), "Avicii".into()))
        );
        assert_eq!(title_artist_from_page("Avicii | Home"), None);
    }
}
