//! The playback engine.
//!
//! Owns at most one adaptive-stream client per mounted player. Every
//! (re)attachment destroys the previous client before creating the next, and
//! teardown destroys it regardless of state, so repeated failures or episode
//! switches never leave two decoders alive.

use marquee_common::Episode;
use std::fmt;
use uuid::Uuid;

use crate::backend::{MediaElement, MediaEvent, StreamClient, StreamClientFactory, StreamErrorKind};
use crate::config::PlayerConfig;
use crate::error::{PlayerError, Result};
use crate::keyboard::{map_key, seek_target, Key, KeyAction};
use crate::manifest::Level;
use crate::playlist::Playlist;
use crate::progress::ProgressStore;
use crate::quality::{QualityOption, QualitySelection, QualityState};
use crate::state::{RecoveryKind, SessionEvent, SessionState};

const FATAL_MESSAGE: &str = "Unable to play this video right now. Please try again later.";
const NATIVE_ERROR_MESSAGE: &str = "An error occurred while loading the native video stream.";
const UNSUPPORTED_MESSAGE: &str = "This browser cannot play HLS streams.";

/// Identifier of one attachment, for log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How the current stream is being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackMode {
    /// Through an adaptive-stream client; quality switching available.
    Adaptive,
    /// Manifest URL assigned straight to the media element.
    Native,
}

pub struct PlaybackEngine<F, M, S>
where
    F: StreamClientFactory,
    M: MediaElement,
    S: ProgressStore,
{
    config: PlayerConfig,
    factory: F,
    media: M,
    store: S,
    client: Option<F::Client>,
    mode: Option<PlaybackMode>,
    state: SessionState,
    session_id: Option<SessionId>,
    playlist: Playlist,
    attached_url: Option<String>,
    quality: QualityState,
    pending_resume: Option<f64>,
    message: Option<String>,
}

impl<F, M, S> PlaybackEngine<F, M, S>
where
    F: StreamClientFactory,
    M: MediaElement,
    S: ProgressStore,
{
    pub fn new(config: PlayerConfig, factory: F, media: M, store: S) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            factory,
            media,
            store,
            client: None,
            mode: None,
            state: SessionState::Idle,
            session_id: None,
            playlist: Playlist::default(),
            attached_url: None,
            quality: QualityState::default(),
            pending_resume: None,
            message: None,
        })
    }

    /// Show `episodes` with `index` selected.
    ///
    /// An empty list leaves the engine idle (the "no data" placeholder).
    /// Otherwise the stream is attached unless that exact manifest is already
    /// attached.
    pub fn load(&mut self, episodes: Vec<Episode>, index: usize) -> Result<()> {
        self.ensure_alive()?;
        self.playlist = Playlist::at_index(episodes, index);

        if self.playlist.is_empty() {
            self.release_client();
            self.attached_url = None;
            self.quality.clear();
            self.message = None;
            self.apply(SessionEvent::Reset);
            return Ok(());
        }

        self.attach_if_changed()
    }

    /// Switch to another episode of the current list.
    pub fn select_episode(&mut self, index: usize) -> Result<()> {
        self.ensure_alive()?;
        if self.playlist.is_empty() {
            return Err(PlayerError::NoActiveEpisode);
        }
        let episodes = self.playlist.episodes().to_vec();
        self.playlist = Playlist::at_index(episodes, index);
        self.attach_if_changed()
    }

    /// Re-run attachment from scratch, e.g. from a "try again" button.
    pub fn retry(&mut self) -> Result<()> {
        self.ensure_alive()?;
        self.attach()
    }

    fn attach_if_changed(&mut self) -> Result<()> {
        let url = self.current_url()?;
        if self.attached_url.as_deref() == Some(url.as_str()) && self.state != SessionState::Error
        {
            return Ok(());
        }
        self.attach()
    }

    fn current_url(&self) -> Result<String> {
        self.playlist
            .current()
            .map(|episode| episode.link_m3u8.clone())
            .ok_or(PlayerError::NoActiveEpisode)
    }

    fn attach(&mut self) -> Result<()> {
        let url = self.current_url()?;

        self.release_client();
        self.apply(SessionEvent::Attach);
        self.message = None;
        self.quality.clear();
        self.attached_url = Some(url.clone());

        let session_id = SessionId::new();
        self.session_id = Some(session_id);
        self.pending_resume = self.store.load(&url);

        if self.factory.is_supported() {
            let mut client = self.factory.create(&self.config.hls);
            client.load_source(&url);
            client.attach_media();
            self.client = Some(client);
            self.mode = Some(PlaybackMode::Adaptive);
            tracing::info!(session_id = %session_id, url = %url, "Attached adaptive stream client");
        } else if self.media.can_play_native_hls() {
            self.media.set_source(&url);
            self.mode = Some(PlaybackMode::Native);
            tracing::info!(session_id = %session_id, url = %url, "Using native HLS playback");
        } else {
            tracing::error!(session_id = %session_id, url = %url, "No HLS playback path available");
            self.apply(SessionEvent::Fatal);
            self.message = Some(UNSUPPORTED_MESSAGE.to_string());
            return Err(PlayerError::UnsupportedPlayback);
        }

        Ok(())
    }

    /// Feed a notification from the stream client or media element.
    pub fn handle(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::ManifestParsed { levels } => {
                if self.mode != Some(PlaybackMode::Adaptive) {
                    return;
                }
                if self.apply(SessionEvent::Loaded) {
                    tracing::debug!(
                        session_id = ?self.session_id,
                        levels = levels.len(),
                        "Manifest parsed"
                    );
                    self.quality.set_levels(levels);
                    self.on_ready();
                }
            }
            MediaEvent::LoadedMetadata => {
                if self.mode == Some(PlaybackMode::Native) && self.apply(SessionEvent::Loaded) {
                    self.on_ready();
                }
            }
            MediaEvent::LevelSwitched { level } => self.quality.on_level_switched(level),
            MediaEvent::StreamError { kind, fatal } => self.on_stream_error(kind, fatal),
            MediaEvent::NativeError => {
                if self.mode == Some(PlaybackMode::Native) {
                    self.fail(NATIVE_ERROR_MESSAGE);
                }
            }
            MediaEvent::Waiting => {
                self.apply(SessionEvent::Waiting);
            }
            MediaEvent::Playing => {
                if self.apply(SessionEvent::Playing) {
                    self.message = None;
                }
            }
            MediaEvent::TimeUpdate { position } => self.on_time_update(position),
            MediaEvent::Ended => {
                self.apply(SessionEvent::Ended);
            }
        }
    }

    fn on_ready(&mut self) {
        if let Some(offset) = self.pending_resume.take() {
            if offset > 0.0 {
                tracing::debug!(session_id = ?self.session_id, offset, "Resuming from saved position");
                self.media.seek(offset);
            }
        }

        if self.config.autoplay {
            if let Err(e) = self.media.play() {
                tracing::warn!(
                    session_id = ?self.session_id,
                    "Autoplay blocked, waiting for user interaction: {}",
                    e
                );
                self.apply(SessionEvent::AutoplayBlocked);
            }
        }
    }

    fn on_stream_error(&mut self, kind: StreamErrorKind, fatal: bool) {
        if !fatal {
            tracing::debug!(session_id = ?self.session_id, ?kind, "Non-fatal stream error");
            return;
        }

        match kind {
            StreamErrorKind::Network => {
                if self.apply(SessionEvent::Recover(RecoveryKind::Network)) {
                    tracing::warn!(session_id = ?self.session_id, "Fatal network error, restarting load");
                    self.message = Some(RecoveryKind::Network.message().to_string());
                    if let Some(client) = self.client.as_mut() {
                        client.start_load();
                    }
                }
            }
            StreamErrorKind::Media => {
                if self.apply(SessionEvent::Recover(RecoveryKind::Media)) {
                    tracing::warn!(session_id = ?self.session_id, "Fatal media error, recovering decoder");
                    self.message = Some(RecoveryKind::Media.message().to_string());
                    if let Some(client) = self.client.as_mut() {
                        client.recover_media_error();
                    }
                }
            }
            StreamErrorKind::Other => self.fail(FATAL_MESSAGE),
        }
    }

    fn on_time_update(&mut self, position: f64) {
        if !self.state.has_live_session() || !position.is_finite() {
            return;
        }
        if position > self.config.resume_threshold_secs {
            if let Some(url) = self.attached_url.as_deref() {
                self.store.save(url, position);
            }
        }
    }

    fn fail(&mut self, message: &str) {
        tracing::error!(session_id = ?self.session_id, url = ?self.attached_url, "Playback failed: {}", message);
        self.release_client();
        if self.apply(SessionEvent::Fatal) {
            self.message = Some(message.to_string());
        }
    }

    /// Pin a rendition or return to automatic switching.
    pub fn set_quality(&mut self, selection: QualitySelection) -> Result<()> {
        match (self.mode, self.client.as_mut()) {
            (Some(PlaybackMode::Adaptive), Some(client)) => {
                self.quality.select(selection)?;
                client.set_current_level(selection.as_client_level());
                tracing::debug!(session_id = ?self.session_id, ?selection, "Quality changed");
                Ok(())
            }
            (Some(PlaybackMode::Native), _) => Err(PlayerError::QualityUnsupported),
            _ => Err(PlayerError::NoActiveEpisode),
        }
    }

    /// Handle a key press; returns the action taken, if any.
    pub fn handle_key(&mut self, key: Key, focus_in_text_input: bool) -> Option<KeyAction> {
        if !self.state.has_live_session() {
            return None;
        }
        let action = map_key(key, focus_in_text_input, self.config.seek_step_secs)?;
        match action {
            KeyAction::TogglePlay => {
                if self.media.is_paused() {
                    if let Err(e) = self.media.play() {
                        tracing::warn!(session_id = ?self.session_id, "Play rejected: {}", e);
                    }
                } else {
                    self.media.pause();
                }
            }
            KeyAction::ToggleFullscreen => self.media.toggle_fullscreen(),
            KeyAction::SeekBy(delta) => {
                let target =
                    seek_target(self.media.current_time(), delta, self.media.duration());
                self.media.seek(target);
            }
        }
        Some(action)
    }

    /// Destroy the session for good (unmount).
    pub fn teardown(&mut self) {
        if self.state == SessionState::Destroyed {
            return;
        }
        self.release_client();
        self.apply(SessionEvent::Teardown);
        self.attached_url = None;
        self.pending_resume = None;
        tracing::debug!(session_id = ?self.session_id, "Player torn down");
    }

    fn release_client(&mut self) {
        if let Some(mut client) = self.client.take() {
            client.destroy();
            tracing::debug!(session_id = ?self.session_id, "Destroyed stream client");
        }
        if self.mode == Some(PlaybackMode::Native) {
            self.media.clear_source();
        }
        self.mode = None;
    }

    fn apply(&mut self, event: SessionEvent) -> bool {
        match self.state.transition(&event) {
            Ok(next) => {
                if next != self.state {
                    tracing::trace!(session_id = ?self.session_id, from = %self.state, to = %next, "Session transition");
                }
                self.state = next;
                true
            }
            Err(e) => {
                tracing::debug!(session_id = ?self.session_id, "Ignoring event: {}", e);
                false
            }
        }
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.state == SessionState::Destroyed {
            Err(PlayerError::Destroyed)
        } else {
            Ok(())
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether the "no data" placeholder should be shown instead of a player.
    pub fn is_placeholder(&self) -> bool {
        self.playlist.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Transient or terminal status message for the overlay.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn mode(&self) -> Option<PlaybackMode> {
        self.mode
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session_id
    }

    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn levels(&self) -> &[Level] {
        self.quality.levels()
    }

    pub fn quality_options(&self) -> Vec<QualityOption> {
        self.quality.options()
    }

    pub fn selected_quality(&self) -> QualitySelection {
        self.quality.selected()
    }

    pub fn active_level(&self) -> Option<usize> {
        self.quality.active_level()
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<F, M, S> Drop for PlaybackEngine<F, M, S>
where
    F: StreamClientFactory,
    M: MediaElement,
    S: ProgressStore,
{
    fn drop(&mut self) {
        self.teardown();
    }
}
