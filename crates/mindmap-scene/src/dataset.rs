//! Processed journal entries as written by the offline embedding pipeline.
//!
//! The file is `{"entries": [...]}`. Each entry carries its UMAP coordinates,
//! per-emotion intensities and the ids of its most similar entries. Fields the
//! viewer does not use (raw embeddings, for instance) are ignored.

use std::fmt;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::emotion::EmotionScores;

/// Errors returned while loading a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The content is not a valid entries document.
    #[error("malformed entries document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Entry identifier. The pipeline emits numbers or strings; both become strings.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EntryId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => Self(n.to_string()),
            RawId::Text(s) => Self(s),
        })
    }
}

/// Position produced by the dimensionality reduction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct Coordinates {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Named entities mentioned in an entry.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EntityMentions {
    pub people: Vec<String>,
    pub places: Vec<String>,
}

/// One processed journal entry.
#[derive(Clone, Debug, Deserialize)]
pub struct JournalEntry {
    pub id: EntryId,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub text: String,
    /// Missing when the pipeline had no embedding for the entry.
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub emotions: EmotionScores,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub entities: EntityMentions,
    #[serde(default, rename = "relatedEntries")]
    pub related_entries: Vec<EntryId>,
}

#[derive(Deserialize)]
struct EntriesDocument {
    entries: Vec<JournalEntry>,
}

/// Read and parse a processed entries file.
pub fn load_entries(path: &Path) -> Result<Vec<JournalEntry>, DatasetError> {
    let contents = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let entries = parse_entries(&contents)?;
    log::info!("Loaded {} entries from {}", entries.len(), path.display());
    Ok(entries)
}

/// Parse an entries document, dropping entries that cannot be placed.
///
/// Entries without coordinates and repeated ids are skipped with a warning;
/// emotion intensities are clamped to `[0, 1]`.
pub fn parse_entries(contents: &str) -> Result<Vec<JournalEntry>, DatasetError> {
    let document: EntriesDocument = serde_json::from_str(contents)?;
    let total = document.entries.len();

    let mut seen = FxHashSet::default();
    let mut entries = Vec::with_capacity(total);
    for mut entry in document.entries {
        if entry.coordinates.is_none() {
            log::warn!("entry {} has no coordinates, skipping", entry.id);
            continue;
        }
        if !seen.insert(entry.id.clone()) {
            log::warn!("duplicate entry id {}, keeping the first", entry.id);
            continue;
        }
        entry.emotions = entry.emotions.clamped();
        entries.push(entry);
    }

    if entries.len() < total {
        log::info!("{} of {total} entries are placeable", entries.len());
    }
    Ok(entries)
}
