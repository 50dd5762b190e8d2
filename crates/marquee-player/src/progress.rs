//! Watch-progress (resume point) storage.
//!
//! Offsets are stored per manifest URL under `watch-progress-{url}` as a
//! decimal string. Reads are best-effort: anything that does not parse to a
//! finite, non-negative number is treated as "no resume point".
//!
//! Unlike a plain browser key-value store, both stores here are bounded and
//! evict the least recently written or read stream once full.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{PlayerError, Result};

const KEY_PREFIX: &str = "watch-progress-";

/// Storage key for a manifest URL.
pub fn progress_key(manifest_url: &str) -> String {
    format!("{KEY_PREFIX}{manifest_url}")
}

/// Parse a stored offset, rejecting NaN, infinities and negatives.
pub fn parse_offset(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
}

/// Durable per-stream resume positions.
pub trait ProgressStore {
    /// Last saved offset for `manifest_url`, if any and valid.
    fn load(&mut self, manifest_url: &str) -> Option<f64>;

    /// Persist `secs` for `manifest_url` (last write wins).
    fn save(&mut self, manifest_url: &str, secs: f64);
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry {
    value: String,
    touched_at: DateTime<Utc>,
    /// Access order; files written before it existed fall back to `touched_at`.
    #[serde(default)]
    tick: u64,
}

/// In-memory store with least-recently-used eviction.
#[derive(Debug)]
pub struct MemoryProgressStore {
    entries: HashMap<String, Entry>,
    capacity: usize,
    clock: u64,
}

impl MemoryProgressStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
            clock: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Store a raw value as-is; used to seed or restore entries.
    pub fn insert_raw(&mut self, manifest_url: &str, value: impl Into<String>) {
        self.put(progress_key(manifest_url), value.into(), Utc::now());
    }

    fn next_tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn put(&mut self, key: String, value: String, touched_at: DateTime<Utc>) {
        let tick = self.next_tick();
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_oldest();
        }
        self.entries.insert(
            key,
            Entry {
                value,
                touched_at,
                tick,
            },
        );
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.tick)
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest {
            tracing::debug!(key = %key, "Evicting least recently used watch progress");
            self.entries.remove(&key);
        }
    }

    fn snapshot(&self) -> Vec<(String, Entry)> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        entries.sort_by_key(|(_, entry)| entry.tick);
        entries
    }
}

impl ProgressStore for MemoryProgressStore {
    fn load(&mut self, manifest_url: &str) -> Option<f64> {
        let tick = self.next_tick();
        let entry = self.entries.get_mut(&progress_key(manifest_url))?;
        entry.tick = tick;
        entry.touched_at = Utc::now();
        let parsed = parse_offset(&entry.value);
        if parsed.is_none() {
            tracing::debug!(url = %manifest_url, value = %entry.value, "Ignoring malformed watch progress");
        }
        parsed
    }

    fn save(&mut self, manifest_url: &str, secs: f64) {
        self.put(progress_key(manifest_url), secs.to_string(), Utc::now());
    }
}

/// File-backed store; the whole map is rewritten on each save and on each
/// successful read, so access order survives a restart.
///
/// A missing or unreadable file starts an empty store. Write failures are
/// logged and the in-memory copy stays authoritative.
#[derive(Debug)]
pub struct JsonFileProgressStore {
    path: PathBuf,
    inner: MemoryProgressStore,
}

impl JsonFileProgressStore {
    pub fn open(path: impl Into<PathBuf>, capacity: usize) -> Self {
        let path = path.into();
        let mut inner = MemoryProgressStore::new(capacity);

        match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<HashMap<String, Entry>>(&content) {
                Ok(stored) => {
                    let mut stored: Vec<_> = stored.into_iter().collect();
                    stored.sort_by_key(|(_, entry)| (entry.tick, entry.touched_at));
                    for (key, entry) in stored {
                        inner.put(key, entry.value, entry.touched_at);
                    }
                    tracing::debug!(path = ?path, entries = inner.len(), "Loaded watch progress");
                }
                Err(e) => {
                    tracing::warn!(path = ?path, "Discarding corrupt watch progress file: {}", e);
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = ?path, "Failed to read watch progress file: {}", e);
            }
        }

        Self { path, inner }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Write the current map to disk.
    pub fn flush(&self) -> Result<()> {
        let map: HashMap<String, Entry> = self.inner.snapshot().into_iter().collect();
        let content = serde_json::to_string(&map)
            .map_err(|e| PlayerError::ProgressWrite {
                path: self.path.clone(),
                source: std::io::Error::other(e),
            })?;
        std::fs::write(&self.path, content).map_err(|e| PlayerError::ProgressWrite {
            path: self.path.clone(),
            source: e,
        })
    }
}

impl ProgressStore for JsonFileProgressStore {
    fn load(&mut self, manifest_url: &str) -> Option<f64> {
        let known = self.inner.entries.contains_key(&progress_key(manifest_url));
        let offset = self.inner.load(manifest_url);
        if known {
            if let Err(e) = self.flush() {
                tracing::warn!("{}", e);
            }
        }
        offset
    }

    fn save(&mut self, manifest_url: &str, secs: f64) {
        self.inner.save(manifest_url, secs);
        if let Err(e) = self.flush() {
            tracing::warn!("{}", e);
        }
    }
}
