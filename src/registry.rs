//! In-memory registry of completed requests, keyed by request id.
//!
//! Entries live for the whole process. There is no eviction yet; a
//! long-running server grows by one record per request.

use crate::models::{HandlerRecord, VocabularyItem};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Cheap to clone; all clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct HandlerRegistry {
    records: Arc<RwLock<HashMap<String, HandlerRecord>>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, record: HandlerRecord) {
        self.records.write().await.insert(record.id.clone(), record);
    }

    pub async fn get(&self, id: &str) -> Option<HandlerRecord> {
        self.records.read().await.get(id).cloned()
    }

    pub async fn vocabulary(&self, id: &str) -> Option<Vec<VocabularyItem>> {
        self.records.read().await.get(id).map(|r| r.vocabulary.clone())
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RetrievalResult;
    use chrono::Utc;
    use std::path::PathBuf;

    fn record(id: &str, term: &str) -> HandlerRecord {
        HandlerRecord {
            id: id.to_string(),
            created_at: Utc::now(),
            song_id: format!("song-{}", id),
            result: RetrievalResult {
                lyrics: term.to_string(),
                romanized_lyrics: String::new(),
                song_title: "Song".into(),
                artist: "Artist".into(),
                found: true,
            },
            vocabulary: vec![VocabularyItem::new(term, 1, "unknown")],
            artifact_path: PathBuf::from(format!("{}.txt", id)),
            romanized_path: None,
        }
    }

    #[tokio::test]
    async fn test_concurrent_writers_stay_separate() {
        let registry = HandlerRegistry::new();
        let (a, b) = (registry.clone(), registry.clone());
        let first = tokio::spawn(async move { a.insert(record("first", "heaven")).await });
        let second = tokio::spawn(async move { b.insert(record("second", "dreamer")).await });
        first.await.unwrap();
        second.await.unwrap();

        assert_eq!(registry.len().await, 2);
        assert_eq!(registry.vocabulary("first").await.unwrap()[0].term, "heaven");
        assert_eq!(registry.vocabulary("second").await.unwrap()[0].term, "dreamer");
    }

    #[tokio::test]
    async fn test_unknown_id() {
        let registry = HandlerRegistry::new();
        assert!(registry.is_empty().await);
        assert!(registry.get("missing").await.is_none());
        assert!(registry.vocabulary("missing").await.is_none());
    }
}
