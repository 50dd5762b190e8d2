//! Seams between the engine and the platform.
//!
//! The engine drives an adaptive-stream client and a media element through
//! these traits and receives their notifications as [`MediaEvent`]s. A browser
//! shell implements them over its HLS library and `<video>` element; tests use
//! recording fakes.

use crate::config::HlsConfig;
use crate::manifest::Level;

/// An adaptive-bitrate streaming client bound to one media element.
pub trait StreamClient {
    /// Begin loading the manifest at `url`.
    fn load_source(&mut self, url: &str);

    /// Bind the client to the media element.
    fn attach_media(&mut self);

    /// Restart segment loading after a network failure.
    fn start_load(&mut self);

    /// Reinitialise the decode pipeline without refetching the manifest.
    fn recover_media_error(&mut self);

    /// Pin a rendition, or `None` to let the client choose automatically.
    fn set_current_level(&mut self, level: Option<usize>);

    /// Release buffers, timers and listeners. Called exactly once per client.
    fn destroy(&mut self);
}

/// Creates stream clients and reports whether the platform supports them.
pub trait StreamClientFactory {
    type Client: StreamClient;

    /// Whether Media Source Extensions style playback is available.
    fn is_supported(&self) -> bool;

    fn create(&self, config: &HlsConfig) -> Self::Client;
}

/// Playback start was refused, typically by an autoplay policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("play() rejected: {reason}")]
pub struct PlayRejected {
    pub reason: String,
}

/// The media element the stream renders into.
pub trait MediaElement {
    /// Whether the element can play `application/vnd.apple.mpegurl` itself.
    fn can_play_native_hls(&self) -> bool;

    /// Assign a source URL directly (native HLS path).
    fn set_source(&mut self, url: &str);

    /// Drop any directly assigned source.
    fn clear_source(&mut self);

    fn play(&mut self) -> Result<(), PlayRejected>;

    fn pause(&mut self);

    fn is_paused(&self) -> bool;

    /// Current position in seconds.
    fn current_time(&self) -> f64;

    /// Duration in seconds, once known.
    fn duration(&self) -> Option<f64>;

    fn seek(&mut self, position: f64);

    /// Toggle fullscreen on the player container.
    fn toggle_fullscreen(&mut self);
}

/// Class of a stream client failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamErrorKind {
    Network,
    Media,
    Other,
}

/// Notifications delivered to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// The client parsed the manifest and knows its renditions.
    ManifestParsed { levels: Vec<Level> },
    /// The client switched rendition (automatically or on request).
    LevelSwitched { level: usize },
    /// The client reported a failure.
    StreamError { kind: StreamErrorKind, fatal: bool },
    /// Native playback loaded metadata.
    LoadedMetadata,
    /// Playback stalled.
    Waiting,
    /// Playback is advancing.
    Playing,
    /// Periodic position update, in seconds.
    TimeUpdate { position: f64 },
    Ended,
    /// Native playback reported an error.
    NativeError,
}
