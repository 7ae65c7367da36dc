//! File-based storage for lyrics artifacts.

use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

lazy_static! {
    static ref FORBIDDEN: Regex = Regex::new(r#"[\\/*?:"<>|]"#).unwrap();
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Writes each artifact once, to a name made unique by the request id.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Use `dir` for artifacts. The directory is created on first save.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save `content` as "{name}_{id suffix}.txt", or "{id}.txt" when the
    /// sanitized name is empty. Returns the written path.
    pub async fn save(&self, name: &str, id: &str, content: &str) -> Result<PathBuf, StorageError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| StorageError::Io {
                path: self.dir.clone(),
                source,
            })?;

        let path = self.dir.join(artifact_file_name(name, id));
        tokio::fs::write(&path, content)
            .await
            .map_err(|source| StorageError::Io {
                path: path.clone(),
                source,
            })?;
        info!("Lyrics saved to: {}", path.display());
        Ok(path)
    }

    /// Read an artifact back
    pub async fn read(&self, path: &Path) -> Result<String, StorageError> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| StorageError::Io {
                path: path.to_path_buf(),
                source,
            })
    }
}

/// Remove characters that are not allowed in file names
pub fn sanitize(name: &str) -> String {
    FORBIDDEN.replace_all(name, "").trim().to_string()
}

/// "{title} - {artist}" when both are known, empty otherwise
pub fn artifact_name(title: &str, artist: &str) -> String {
    let (title, artist) = (sanitize(title), sanitize(artist));
    if title.is_empty() || artist.is_empty() {
        String::new()
    } else {
        format!("{} - {}", title, artist)
    }
}

fn artifact_file_name(name: &str, id: &str) -> String {
    let name = sanitize(name);
    if name.is_empty() {
        return format!("{}.txt", sanitize(id));
    }
    let chars: Vec<char> = id.chars().collect();
    let suffix: String = chars[chars.len().saturating_sub(8)..].iter().collect();
    format!("{}_{}.txt", name, sanitize(&suffix))
}
