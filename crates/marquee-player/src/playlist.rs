//! Episode selection within a server's episode list.

use marquee_common::Episode;
use serde::Serialize;

/// Episodes per tab in the episode picker.
pub const EPISODES_PER_CHUNK: usize = 50;

/// An ordered episode list with one selected entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Playlist {
    episodes: Vec<Episode>,
    index: usize,
}

/// A tab of consecutive episodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EpisodeChunk {
    /// 1-based number of the first episode in the chunk.
    pub first: usize,
    /// 1-based number of the last episode in the chunk.
    pub last: usize,
    pub active: bool,
}

impl Playlist {
    /// Select by 1-based episode number, as carried in watch URLs.
    ///
    /// Anything that does not land inside the list selects the first episode.
    pub fn select(episodes: Vec<Episode>, episode_number: Option<i64>) -> Self {
        let index = episode_number
            .map_or(Some(0), |n| n.checked_sub(1))
            .and_then(|i| usize::try_from(i).ok())
            .filter(|i| *i < episodes.len())
            .unwrap_or(0);
        Self { episodes, index }
    }

    /// Select by 0-based index, clamping out-of-range values to 0.
    pub fn at_index(episodes: Vec<Episode>, index: usize) -> Self {
        let index = if index < episodes.len() { index } else { 0 };
        Self { episodes, index }
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn episodes(&self) -> &[Episode] {
        &self.episodes
    }

    pub fn current(&self) -> Option<&Episode> {
        self.episodes.get(self.index)
    }

    /// 1-based number of the next episode, if any.
    pub fn next(&self) -> Option<usize> {
        (self.index + 1 < self.episodes.len()).then_some(self.index + 2)
    }

    /// 1-based number of the previous episode, if any.
    pub fn previous(&self) -> Option<usize> {
        (self.index > 0 && !self.episodes.is_empty()).then_some(self.index)
    }

    /// Episode tabs, with the tab holding the current episode marked active.
    pub fn chunks(&self, per_chunk: usize) -> Vec<EpisodeChunk> {
        let per_chunk = per_chunk.max(1);
        let active = self.index / per_chunk;
        (0..self.episodes.len().div_ceil(per_chunk))
            .map(|chunk| EpisodeChunk {
                first: chunk * per_chunk + 1,
                last: ((chunk + 1) * per_chunk).min(self.episodes.len()),
                active: chunk == active,
            })
            .collect()
    }

    /// Episodes in the active tab, paired with their 0-based indices.
    pub fn active_chunk(&self, per_chunk: usize) -> impl Iterator<Item = (usize, &Episode)> {
        let per_chunk = per_chunk.max(1);
        let start = (self.index / per_chunk) * per_chunk;
        self.episodes
            .iter()
            .enumerate()
            .skip(start)
            .take(per_chunk)
    }
}
