//! Retrieval orchestrator.
//!
//! Drives the pipeline for one request: plan queries, search, filter
//! candidates, fetch, extract, classify, and stop as soon as the request's
//! mode is satisfied. Then the chosen lyrics are saved and turned into a
//! vocabulary list.

use crate::lyrics::LyricsExtractor;
use crate::models::{HandlerRecord, LyricsCandidate, RetrievalResult, ScriptClass, SearchResult};
use crate::planner::{self, QueryPlan};
use crate::scraper::PageFetcher;
use crate::search::SearchProvider;
use crate::sites::{self, TargetLanguage};
use crate::storage::{self, ArtifactStore, StorageError};
use crate::script;
use crate::vocab::VocabularyExtractor;
use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

const DEFAULT_MAX_RESULTS: usize = 15;
const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Search results probed for title/artist when the request did not name them
const METADATA_PROBE_RESULTS: usize = 3;

const UNKNOWN_SONG: &str = "Unknown Song";
const UNKNOWN_ARTIST: &str = "Unknown Artist";

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^\w]").unwrap();
    static ref DASH_RUNS: Regex = Regex::new(r"-+").unwrap();
}

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("failed to save lyrics: {0}")]
    Storage(#[from] StorageError),
}

/// Where the orchestrator is in its scan, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Planning,
    Searching,
    CandidateScan,
    Fetching,
    Extracting,
    Accumulating,
    Done,
    NotFound,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Planning => "planning",
            Self::Searching => "searching",
            Self::CandidateScan => "candidate-scan",
            Self::Fetching => "fetching",
            Self::Extracting => "extracting",
            Self::Accumulating => "accumulating",
            Self::Done => "done",
            Self::NotFound => "not-found",
        };
        write!(f, "{}", name)
    }
}

/// What a request needs before the scan may stop
#[derive(Debug, Clone, Copy)]
pub enum Mode {
    /// Any plausible lyrics will do
    Latin,
    /// Native-script lyrics are required; a transliteration is a bonus
    NonLatin(TargetLanguage),
}

/// Candidates held during a scan
#[derive(Debug, Default)]
pub struct Accumulator {
    pub original: Option<LyricsCandidate>,
    pub romanized: Option<LyricsCandidate>,
    pub fallback: Option<LyricsCandidate>,
}

impl Accumulator {
    /// Classify `text` from `url` and hold it if the matching slot is free
    pub fn accept(&mut self, mode: Mode, text: String, url: &str) {
        let mut candidate = LyricsCandidate {
            text,
            source_url: url.to_string(),
            script_class: ScriptClass::Latin,
            is_romanized: false,
        };

        if let Mode::NonLatin(target) = mode {
            if sites::is_native_host(url, &target) && script::is_predominantly(&candidate.text, target.script) {
                candidate.script_class = ScriptClass::Native;
                if self.original.is_none() {
                    info!("Found original-script lyrics at {}", url);
                    self.original = Some(candidate);
                }
                return;
            }
            if sites::is_romanized_url(url) {
                candidate.is_romanized = true;
                if self.romanized.is_none() {
                    info!("Found romanized lyrics at {}", url);
                    self.romanized = Some(candidate);
                }
                return;
            }
        }

        if self.fallback.is_none() {
            debug!("Holding {} as best-effort lyrics", url);
            self.fallback = Some(candidate);
        }
    }

    /// Both versions held: no need to look at further results
    pub fn is_paired(&self) -> bool {
        self.original.is_some() && self.romanized.is_some()
    }

    /// The mode's requirement is met: no need to issue further queries
    pub fn is_satisfied(&self, mode: Mode) -> bool {
        match mode {
            Mode::Latin => self.fallback.is_some(),
            Mode::NonLatin(_) => self.original.is_some(),
        }
    }

    /// Final (lyrics, romanized lyrics)
    pub fn select(self, mode: Mode) -> (Option<LyricsCandidate>, Option<LyricsCandidate>) {
        let lyrics = match mode {
            Mode::NonLatin(_) => self.original.or(self.fallback),
            Mode::Latin => self.fallback,
        };
        (lyrics, self.romanized)
    }
}

/// Whether a search result is worth fetching
pub fn is_candidate(result: &SearchResult, mode: Mode) -> bool {
    if result.url.is_empty() || sites::is_denied(&result.url) {
        return false;
    }
    let url = result.url.to_lowercase();
    let signalled = sites::is_lyrics_host(&result.url)
        || url.contains("lyrics")
        || result.title.to_lowercase().contains("lyrics");
    let native_marker = match mode {
        Mode::NonLatin(target) => {
            result.url.contains(target.lyrics_marker)
                || percent_encoding::percent_decode_str(&result.url)
                    .decode_utf8_lossy()
                    .contains(target.lyrics_marker)
        }
        Mode::Latin => false,
    };
    signalled || native_marker
}

/// Stable id for a song: slug of title and artist plus a short hash
pub fn song_id(title: &str, artist: &str) -> String {
    let base = format!("{}-{}", title.to_lowercase(), artist.to_lowercase());
    let base = NON_WORD.replace_all(&base, "-");
    let base = DASH_RUNS.replace_all(&base, "-");
    let base: String = base.trim_matches('-').chars().take(50).collect();
    let digest = md5::compute(format!("{}:{}", title, artist));
    let hash = format!("{:x}", digest);
    format!("{}-{}", base, &hash[..6])
}

pub struct SongAgent {
    search: Arc<dyn SearchProvider>,
    fetcher: Arc<dyn PageFetcher>,
    lyrics: LyricsExtractor,
    vocabulary: VocabularyExtractor,
    store: ArtifactStore,
    max_results: usize,
    fetch_timeout: Duration,
}

impl SongAgent {
    pub fn new(search: Arc<dyn SearchProvider>, fetcher: Arc<dyn PageFetcher>, store: ArtifactStore) -> Self {
        Self {
            search,
            fetcher,
            lyrics: LyricsExtractor::default(),
            vocabulary: VocabularyExtractor::default(),
            store,
            max_results: DEFAULT_MAX_RESULTS,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn with_vocabulary(mut self, vocabulary: VocabularyExtractor) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    pub fn with_lyrics_extractor(mut self, lyrics: LyricsExtractor) -> Self {
        self.lyrics = lyrics;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn vocabulary_extractor(&self) -> &VocabularyExtractor {
        &self.vocabulary
    }

    /// Handle one request end to end. Not finding lyrics is a normal outcome;
    /// only failing to write the artifact is an error.
    pub async fn process_request(&self, message: &str) -> Result<HandlerRecord, AgentError> {
        let id = Uuid::new_v4().to_string();
        info!("Processing lyrics request {}: {}", id, message);

        let result = self.retrieve(message).await;

        let (artifact_path, romanized_path, vocabulary) = if result.found {
            let name = storage::artifact_name(&result.song_title, &result.artist);
            let artifact_path = self.store.save(&name, &id, &result.lyrics).await?;

            let romanized_path = if result.has_romanized() {
                let romanized_title = format!("{} (Romaji)", result.song_title);
                let name = storage::artifact_name(&romanized_title, &result.artist);
                // Own id, so an unnameable song cannot map both files to "{id}.txt"
                let romanized_id = format!("romaji_{}", id);
                Some(self.store.save(&name, &romanized_id, &result.romanized_lyrics).await?)
            } else {
                None
            };

            (artifact_path, romanized_path, self.vocabulary.extract(&result.lyrics))
        } else {
            let name = storage::artifact_name(UNKNOWN_SONG, UNKNOWN_ARTIST);
            let artifact_path = self.store.save(&name, &id, &result.lyrics).await?;
            (artifact_path, None, Vec::new())
        };

        Ok(HandlerRecord {
            song_id: song_id(&result.song_title, &result.artist),
            id,
            created_at: Utc::now(),
            result,
            vocabulary,
            artifact_path,
            romanized_path,
        })
    }

    /// Search the web for the lyrics a request asks for. Never fails.
    pub async fn retrieve(&self, message: &str) -> RetrievalResult {
        debug!(stage = %Stage::Planning, "{}", message);
        let plan = QueryPlan::build(message);
        let mode = match plan.request.target {
            Some(target) => Mode::NonLatin(target),
            None => Mode::Latin,
        };

        let mut title = plan.request.title.clone();
        let mut artist = plan.request.artist.clone();
        let mut held = Accumulator::default();

        'queries: for query in &plan.queries {
            debug!(stage = %Stage::Searching, "{}", query);
            let results = self.search.search(query, self.max_results).await;
            if results.is_empty() {
                warn!("No search results found for query: {}", query);
                continue;
            }
            for (i, result) in results.iter().enumerate() {
                debug!("Result {}: {} - {}", i + 1, result.title, result.url);
            }

            if title.is_none() || artist.is_none() {
                if let Some((t, a)) = results
                    .iter()
                    .take(METADATA_PROBE_RESULTS)
                    .find_map(|r| planner::title_artist_from_result(&r.title))
                {
                    title.get_or_insert(t);
                    artist.get_or_insert(a);
                }
            }

            for result in &results {
                debug!(stage = %Stage::CandidateScan, "{}", result.url);
                if !is_candidate(result, mode) {
                    debug!("Skipping {}", result.url);
                    continue;
                }

                debug!(stage = %Stage::Fetching, "{}", result.url);
                let page = self.fetcher.fetch(&result.url, self.fetch_timeout).await;
                if !page.success {
                    warn!("Failed to fetch page content: {}", result.url);
                    continue;
                }

                debug!(stage = %Stage::Extracting, "{}", result.url);
                let text = self.lyrics.extract(&page);
                if text.is_empty() {
                    continue;
                }
                let probe = LyricsCandidate {
                    text,
                    source_url: result.url.clone(),
                    script_class: ScriptClass::Latin,
                    is_romanized: false,
                };
                if !probe.is_plausible() {
                    debug!("Discarding implausible lyrics from {}", result.url);
                    continue;
                }
                info!("Successfully extracted lyrics from {}", result.url);

                if title.is_none() || artist.is_none() {
                    if let Some((t, a)) = planner::title_artist_from_page(&page.title) {
                        title.get_or_insert(t);
                        artist.get_or_insert(a);
                    }
                }

                debug!(stage = %Stage::Accumulating, "{}", result.url);
                held.accept(mode, probe.text, &result.url);
                if held.is_paired() {
                    info!("Found both original and romanized lyrics");
                    break;
                }
            }

            if held.is_satisfied(mode) {
                break 'queries;
            }
        }

        let song_title = title.unwrap_or_else(|| plan.request.cleaned.clone());
        let song_title = if song_title.is_empty() {
            UNKNOWN_SONG.to_string()
        } else {
            song_title
        };
        let artist = artist.unwrap_or_else(|| UNKNOWN_ARTIST.to_string());

        match held.select(mode) {
            (Some(lyrics), romanized) => {
                debug!(stage = %Stage::Done, "{}", lyrics.source_url);
                RetrievalResult {
                    lyrics: lyrics.text,
                    romanized_lyrics: romanized.map(|c| c.text).unwrap_or_default(),
                    song_title,
                    artist,
                    found: true,
                }
            }
            (None, _) => {
                debug!(stage = %Stage::NotFound, "{}", message);
                warn!("Could not find lyrics for query: {}", message);
                RetrievalResult::not_found(message, song_title, artist)
            }
        }
    }
}
