//! Best-move memo keyed by `(state hash, depth)`, with optional JSON
//! persistence between runs.
//!
//! The cache is consulted only by the deepening driver, and every cached
//! move is re-validated against the current legal moves before use.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::errors::{MoveCacheError, MoveCacheResult};
use crate::moves::move_descriptions::Move;
use crate::search::state_hasher::StateHash;

pub const MOVE_CACHE_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Default)]
pub struct MoveCache {
    entries: HashMap<(StateHash, u8), Move>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    format_version: u32,
    saved_at: DateTime<Utc>,
    entries: Vec<CacheFileEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheFileEntry {
    hash: StateHash,
    depth: u8,
    mv: Move,
}

impl MoveCache {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, hash: &StateHash, depth: u8) -> Option<Move> {
        self.entries.get(&(*hash, depth)).copied()
    }

    #[inline]
    pub fn insert(&mut self, hash: StateHash, depth: u8, mv: Move) {
        self.entries.insert((hash, depth), mv);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Writes every entry to `path`, sorted by key so equal caches produce
    /// equal files apart from the timestamp.
    pub fn save_to_path(&self, path: &Path) -> MoveCacheResult<()> {
        let mut entries: Vec<CacheFileEntry> = self
            .entries
            .iter()
            .map(|(&(hash, depth), &mv)| CacheFileEntry { hash, depth, mv })
            .collect();
        entries.sort_by_key(|e| (e.hash, e.depth));

        let file = CacheFile {
            format_version: MOVE_CACHE_FORMAT_VERSION,
            saved_at: Utc::now(),
            entries,
        };
        fs::write(path, serde_json::to_string(&file)?)?;
        info!("saved {} move cache entries to {}", self.len(), path.display());
        Ok(())
    }

    /// Reads a cache written by `save_to_path`. A file with another format
    /// version is rejected as a whole.
    pub fn load_from_path(path: &Path) -> MoveCacheResult<Self> {
        let text = fs::read_to_string(path)?;
        let file: CacheFile = serde_json::from_str(&text)?;
        if file.format_version != MOVE_CACHE_FORMAT_VERSION {
            return Err(MoveCacheError::VersionMismatch {
                found: file.format_version,
                expected: MOVE_CACHE_FORMAT_VERSION,
            });
        }

        let mut cache = Self::new();
        for entry in file.entries {
            cache.insert(entry.hash, entry.depth, entry.mv);
        }
        info!(
            "loaded {} move cache entries saved at {}",
            cache.len(),
            file.saved_at.to_rfc3339()
        );
        Ok(cache)
    }

    /// Loads `path` if it exists, starting empty on a missing, unreadable
    /// or mismatched file.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::new();
        }
        match Self::load_from_path(path) {
            Ok(cache) => cache,
            Err(err) => {
                warn!("discarding move cache {}: {err}", path.display());
                Self::new()
            }
        }
    }
}
