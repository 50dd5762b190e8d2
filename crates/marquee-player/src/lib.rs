//! # marquee-player
//!
//! Playback session engine for HLS episodes.
//!
//! The engine is platform-neutral: it drives an adaptive-stream client and a
//! media element through the [`StreamClient`] and [`MediaElement`] traits and
//! persists resume points through a [`ProgressStore`]. It provides:
//!
//! - A session state machine (attach, ready, buffering, recovery, error, teardown)
//! - Fatal-error classification with network and media recovery
//! - Quality menu derived from the master playlist
//! - Per-stream resume offsets with bounded storage
//! - Keyboard shortcuts
//!
//! ## Example
//!
//! ```
//! use marquee_player::manifest::parse_master;
//! use marquee_player::quality::quality_options;
//!
//! let master = parse_master(
//!     "#EXTM3U\n\
//!      #EXT-X-STREAM-INF:BANDWIDTH=800000,RESOLUTION=640x360\n\
//!      360.m3u8\n\
//!      #EXT-X-STREAM-INF:BANDWIDTH=2800000,RESOLUTION=1280x720\n\
//!      720.m3u8\n",
//! )?;
//! let labels: Vec<_> = quality_options(&master.levels)
//!     .into_iter()
//!     .map(|o| o.label)
//!     .collect();
//! assert_eq!(labels, ["Auto", "720p", "360p"]);
//! # Ok::<(), marquee_player::PlayerError>(())
//! ```

pub mod backend;
pub mod config;
pub mod engine;
mod error;
pub mod keyboard;
pub mod manifest;
pub mod playlist;
pub mod progress;
pub mod quality;
pub mod state;

// Re-exports
pub use backend::{MediaElement, MediaEvent, PlayRejected, StreamClient, StreamClientFactory, StreamErrorKind};
pub use config::{Control, HlsConfig, KeyboardScope, PlayerConfig, SettingsMenu};
pub use engine::{PlaybackEngine, PlaybackMode, SessionId};
pub use error::{PlayerError, Result};
pub use keyboard::{Key, KeyAction};
pub use manifest::{Level, MasterPlaylist};
pub use playlist::{EpisodeChunk, Playlist, EPISODES_PER_CHUNK};
pub use progress::{JsonFileProgressStore, MemoryProgressStore, ProgressStore};
pub use quality::{QualityOption, QualitySelection};
pub use state::{RecoveryKind, SessionEvent, SessionState};
