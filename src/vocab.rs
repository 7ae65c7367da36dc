//! Vocabulary extraction from lyrics.
//!
//! The language of the lyrics picks one of two branches:
//!
//! * alphabetic languages: word frequencies minus stopwords
//! * logographic/agglutinative languages (Japanese, Chinese, Korean):
//!   morphemes from a [`Segmenter`] when one was configured, character
//!   frequencies otherwise
//!
//! Results are ordered by descending frequency and capped at [`MAX_ITEMS`].

use crate::models::VocabularyItem;
use crate::script::{self, Script};
use crate::stopwords;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{info, warn};

/// Maximum vocabulary items returned
pub const MAX_ITEMS: usize = 30;

/// Most frequent words considered before stopword removal
const CANDIDATE_WORDS: usize = 50;

/// Language codes handled by the logographic branch
const LOGOGRAPHIC_LANGUAGES: &[&str] = &["jpn", "cmn", "kor"];

/// Part-of-speech tags that mark function words (particles, auxiliaries, symbols)
const FUNCTIONAL_TAGS: &[&str] = &["助詞", "助動詞", "記号", "particle", "auxiliary", "symbol"];

#[derive(Error, Debug)]
pub enum SegmentError {
    #[error("segmentation failed: {0}")]
    Failed(String),
}

/// Identifies the language of a text
pub trait LanguageDetector: Send + Sync {
    /// ISO 639-3 code and confidence in `[0, 1]`, or `None` when undecided
    fn classify(&self, text: &str) -> Option<(String, f64)>;
}

/// Trigram-based detection via `whatlang`
#[derive(Debug, Default, Clone, Copy)]
pub struct WhatlangDetector;

impl LanguageDetector for WhatlangDetector {
    fn classify(&self, text: &str) -> Option<(String, f64)> {
        whatlang::detect(text).map(|info| (info.lang().code().to_string(), info.confidence()))
    }
}

/// One morpheme produced by a segmenter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Morpheme {
    pub surface: String,
    pub base_form: Option<String>,
    pub pos_tag: String,
    pub reading: Option<String>,
}

/// Morphological analyser for languages written without spaces
pub trait Segmenter: Send + Sync {
    fn segment(&self, text: &str) -> Result<Vec<Morpheme>, SegmentError>;
}

/// Which extraction branch a text goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    Alphabetic,
    Logographic,
}

pub struct VocabularyExtractor {
    detector: Box<dyn LanguageDetector>,
    segmenter: Option<Box<dyn Segmenter>>,
}

impl Default for VocabularyExtractor {
    fn default() -> Self {
        Self::new(Box::new(WhatlangDetector))
    }
}

impl VocabularyExtractor {
    /// Extractor without a segmenter; logographic text uses character frequencies
    pub fn new(detector: Box<dyn LanguageDetector>) -> Self {
        Self {
            detector,
            segmenter: None,
        }
    }

    pub fn with_segmenter(mut self, segmenter: Box<dyn Segmenter>) -> Self {
        self.segmenter = Some(segmenter);
        self
    }

    pub fn has_segmenter(&self) -> bool {
        self.segmenter.is_some()
    }

    /// Decide the branch for `text`. The script ratio settles it when the
    /// detector is undecided.
    pub fn branch_for(&self, text: &str) -> Branch {
        match self.detector.classify(text) {
            Some((code, confidence)) => {
                info!("Detected language: {} (confidence: {:.2})", code, confidence);
                if LOGOGRAPHIC_LANGUAGES.contains(&code.as_str()) {
                    Branch::Logographic
                } else {
                    Branch::Alphabetic
                }
            }
            None if script::is_predominantly(text, Script::Cjk)
                || script::is_predominantly(text, Script::Hangul) =>
            {
                Branch::Logographic
            }
            None => Branch::Alphabetic,
        }
    }

    /// Ranked vocabulary for `lyrics`; empty on empty input or tool failure
    pub fn extract(&self, lyrics: &str) -> Vec<VocabularyItem> {
        if lyrics.trim().is_empty() {
            warn!("No lyrics provided for vocabulary extraction");
            return Vec::new();
        }

        let vocabulary = match self.branch_for(lyrics) {
            Branch::Alphabetic => word_frequencies(lyrics),
            Branch::Logographic => match &self.segmenter {
                Some(segmenter) => match segmenter.segment(lyrics) {
                    Ok(morphemes) => morpheme_vocabulary(morphemes),
                    Err(e) => {
                        warn!("Error extracting vocabulary: {}", e);
                        Vec::new()
                    }
                },
                None => {
                    info!("No segmenter configured, using character frequencies");
                    character_frequencies(lyrics)
                }
            },
        };

        info!("Extracted {} vocabulary items", vocabulary.len());
        vocabulary
    }
}

/// Count items, remembering first appearance so ties keep text order
struct Tally<'a> {
    counts: HashMap<&'a str, (usize, usize)>,
}

impl<'a> Tally<'a> {
    fn new() -> Self {
        Self {
            counts: HashMap::new(),
        }
    }

    fn add(&mut self, item: &'a str) {
        let next = self.counts.len();
        self.counts.entry(item).or_insert((0, next)).0 += 1;
    }

    /// Items by descending count, then first appearance
    fn ranked(self) -> Vec<(&'a str, usize)> {
        let mut ranked: Vec<(&str, usize, usize)> =
            self.counts.into_iter().map(|(item, (count, first))| (item, count, first)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
        ranked.into_iter().map(|(item, count, _)| (item, count)).collect()
    }
}

fn word_frequencies(lyrics: &str) -> Vec<VocabularyItem> {
    let lowered = lyrics.to_lowercase();
    let mut tally = Tally::new();
    lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() > 1 && token.chars().all(char::is_alphabetic))
        .for_each(|token| tally.add(token));

    let stop_words = stopwords::stop_words();
    tally
        .ranked()
        .into_iter()
        .take(CANDIDATE_WORDS)
        .filter(|(word, _)| !stop_words.contains(*word))
        .take(MAX_ITEMS)
        .map(|(word, count)| {
            let mut item = VocabularyItem::new(word, count, "unknown");
            item.definition = Some(String::new());
            item
        })
        .collect()
}

/// Non-ASCII letters and digits only; CJK punctuation such as 「」、。 is not vocabulary.
fn character_frequencies(lyrics: &str) -> Vec<VocabularyItem> {
    let mut tally = Tally::new();
    lyrics
        .char_indices()
        .filter(|(_, c)| !c.is_ascii() && c.is_alphanumeric())
        .for_each(|(i, c)| tally.add(&lyrics[i..i + c.len_utf8()]));

    tally
        .ranked()
        .into_iter()
        .take(MAX_ITEMS)
        .map(|(c, count)| VocabularyItem::new(c, count, "character"))
        .collect()
}

/// Morphemes are grouped by dictionary form, so inflections such as 探し and
/// 探せ count towards 探す. The term is therefore not always a substring of the
/// lyrics and its frequency counts surface occurrences of any inflection.
fn morpheme_vocabulary(morphemes: Vec<Morpheme>) -> Vec<VocabularyItem> {
    let mut items: Vec<VocabularyItem> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for morpheme in morphemes {
        if FUNCTIONAL_TAGS.contains(&morpheme.pos_tag.as_str()) {
            continue;
        }
        let term = morpheme
            .base_form
            .filter(|b| !b.is_empty() && b != "*")
            .unwrap_or(morpheme.surface);
        if term.chars().count() <= 1 {
            continue;
        }
        match index.get(&term) {
            Some(&i) => items[i].frequency += 1,
            None => {
                index.insert(term.clone(), items.len());
                items.push(VocabularyItem::new(term, 1, morpheme.pos_tag).with_reading(morpheme.reading));
            }
        }
    }

    // Stable, so equal counts stay in first-seen order
    items.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    items.truncate(MAX_ITEMS);
    items
}
