//! # Song Vocab
//!
//! Finds the lyrics of a song on the web and turns them into a vocabulary
//! list for language learners.
//!
//! ## Features
//!
//! - **Query planning**: free-form requests become ordered search queries,
//!   with native-script queries first for non-Latin targets
//! - **Layered extraction**: per-site rules, known lyrics containers, then a
//!   short-line heuristic
//! - **Original + romanized**: Japanese requests look for both versions
//! - **Language-aware vocabulary**: word frequencies or character/morpheme
//!   lists depending on the detected language

pub mod agent;
pub mod config;
pub mod db;
pub mod lyrics;
pub mod models;
pub mod planner;
pub mod registry;
pub mod scraper;
pub mod script;
pub mod search;
pub mod server;
pub mod sites;
pub mod stopwords;
pub mod storage;
pub mod vocab;

pub use agent::SongAgent;
pub use config::Config;
pub use db::{ArtifactStore, HandlerRegistry};
pub use models::{HandlerRecord, RetrievalResult, VocabularyItem};
