//! Core data types passed between the pipeline stages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One hit returned by a search provider, in provider order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

impl SearchResult {
    pub fn new(title: impl Into<String>, url: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
        }
    }
}

/// A fetched web page.
///
/// When `success` is false the text fields are empty and `error` says why.
#[derive(Debug, Clone, Default)]
pub struct FetchedPage {
    /// The requested URL (not the final URL after redirects)
    pub url: String,
    /// Raw HTML as received
    pub raw_markup: String,
    /// Best-effort main text, one text node per line
    pub main_text: String,
    /// Page title from `<title>` or the first `<h1>`
    pub title: String,
    pub success: bool,
    pub error: Option<String>,
}

impl FetchedPage {
    /// A page that could not be fetched
    pub fn failed(url: &str, error: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

/// The writing system a piece of lyrics is written in, as far as the
/// orchestrator can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptClass {
    /// Latin alphabet (or unknown)
    Latin,
    /// The native script of a non-Latin target language
    Native,
}

/// Lyrics extracted from one page, not yet chosen as the final answer.
#[derive(Debug, Clone, PartialEq)]
pub struct LyricsCandidate {
    pub text: String,
    pub source_url: String,
    pub script_class: ScriptClass,
    pub is_romanized: bool,
}

/// Minimum number of characters for a candidate to be promoted.
pub const MIN_LYRICS_CHARS: usize = 40;

impl LyricsCandidate {
    /// Whether this text is long enough to be taken for a song's lyrics
    pub fn is_plausible(&self) -> bool {
        let text = self.text.trim();
        text.chars().count() >= MIN_LYRICS_CHARS && text.lines().count() >= 2
    }
}

/// Terminal output of the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub lyrics: String,
    /// Latin transliteration, empty when none was found
    #[serde(default)]
    pub romanized_lyrics: String,
    pub song_title: String,
    pub artist: String,
    pub found: bool,
}

impl RetrievalResult {
    /// Result for a request nothing could be found for. The lyrics field
    /// carries a message that names the request.
    pub fn not_found(request: &str, song_title: String, artist: String) -> Self {
        Self {
            lyrics: format!("Could not find lyrics for: {}", request),
            romanized_lyrics: String::new(),
            song_title,
            artist,
            found: false,
        }
    }

    pub fn has_romanized(&self) -> bool {
        !self.romanized_lyrics.is_empty()
    }
}

/// One vocabulary entry derived from the lyrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub term: String,
    /// Occurrences in the returned lyrics, always at least 1
    pub frequency: usize,
    pub part_of_speech: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
}

impl VocabularyItem {
    pub fn new(term: impl Into<String>, frequency: usize, part_of_speech: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            frequency: frequency.max(1),
            part_of_speech: part_of_speech.into(),
            reading: None,
            definition: None,
        }
    }

    pub fn with_reading(mut self, reading: Option<String>) -> Self {
        self.reading = reading.filter(|r| !r.is_empty());
        self
    }
}

/// Everything remembered about one completed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlerRecord {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub song_id: String,
    pub result: RetrievalResult,
    pub vocabulary: Vec<VocabularyItem>,
    pub artifact_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub romanized_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_request() {
        let result = RetrievalResult::not_found(
            "find lyrics for Nothing by Nobody",
            "Unknown Song".into(),
            "Unknown Artist".into(),
        );
        assert!(!result.found);
        assert!(result.lyrics.contains("find lyrics for Nothing by Nobody"));
        assert!(!result.has_romanized());
    }

    #[test]
    fn test_candidate_plausibility() {
        let short = LyricsCandidate {
            text: "la la".into(),
            source_url: "https://example.com".into(),
            script_class: ScriptClass::Latin,
            is_romanized: false,
        };
        assert!(!short.is_plausible());

        let long = LyricsCandidate {
            text: "Imagine there's no heaven\nIt's easy if you try\nNo hell below us".into(),
            ..short
        };
        assert!(long.is_plausible());
    }

    #[test]
    fn test_vocabulary_item_frequency_floor() {
        let item = VocabularyItem::new("dream", 0, "unknown");
        assert_eq!(item.frequency, 1);
        let item = item.with_reading(Some(String::new()));
        assert!(item.reading.is_none());
    }
}
