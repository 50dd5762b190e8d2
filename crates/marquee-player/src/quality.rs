//! Quality (rendition) selection.

use serde::{Deserialize, Serialize};

use crate::error::{PlayerError, Result};
use crate::manifest::Level;

/// What the viewer asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "mode", content = "level", rename_all = "lowercase")]
pub enum QualitySelection {
    /// Let the stream client switch renditions by bandwidth.
    #[default]
    Auto,
    /// Pin the rendition with this level index.
    Level(usize),
}

impl QualitySelection {
    /// Value passed to the stream client: `None` releases the pin.
    pub fn as_client_level(self) -> Option<usize> {
        match self {
            Self::Auto => None,
            Self::Level(index) => Some(index),
        }
    }
}

/// One entry of the quality menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityOption {
    pub label: String,
    pub selection: QualitySelection,
}

/// Menu entries for `levels`: "Auto" first, then renditions tallest first.
///
/// Levels without a known height cannot be labelled and are left out.
pub fn quality_options(levels: &[Level]) -> Vec<QualityOption> {
    let mut with_height: Vec<&Level> = levels.iter().filter(|l| l.height > 0).collect();
    with_height.sort_by(|a, b| b.height.cmp(&a.height).then(b.bandwidth.cmp(&a.bandwidth)));

    let mut options = Vec::with_capacity(with_height.len() + 1);
    options.push(QualityOption {
        label: "Auto".to_string(),
        selection: QualitySelection::Auto,
    });
    options.extend(with_height.into_iter().map(|level| QualityOption {
        label: format!("{}p", level.height),
        selection: QualitySelection::Level(level.index),
    }));
    options
}

/// Selection state kept in step with the stream client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QualityState {
    levels: Vec<Level>,
    selected: QualitySelection,
    active_level: Option<usize>,
}

impl QualityState {
    /// Replace the available levels after a manifest parse; selection resets to Auto.
    pub fn set_levels(&mut self, levels: Vec<Level>) {
        self.levels = levels;
        self.selected = QualitySelection::Auto;
        self.active_level = None;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn selected(&self) -> QualitySelection {
        self.selected
    }

    /// Rendition the client is currently playing, as last reported.
    pub fn active_level(&self) -> Option<usize> {
        self.active_level
    }

    /// Validate and record a new selection.
    pub fn select(&mut self, selection: QualitySelection) -> Result<()> {
        if let QualitySelection::Level(index) = selection {
            if index >= self.levels.len() {
                return Err(PlayerError::InvalidLevel {
                    index,
                    available: self.levels.len(),
                });
            }
            self.active_level = Some(index);
        }
        self.selected = selection;
        Ok(())
    }

    /// Record a switch notification from the client.
    ///
    /// The selection itself never changes here: Auto stays Auto while the
    /// active level moves, and a pinned level stays pinned until the viewer
    /// picks something else.
    pub fn on_level_switched(&mut self, level: usize) {
        if level < self.levels.len() {
            self.active_level = Some(level);
        }
    }

    pub fn options(&self) -> Vec<QualityOption> {
        quality_options(&self.levels)
    }
}
