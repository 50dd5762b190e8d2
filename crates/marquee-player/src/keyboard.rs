//! Keyboard shortcuts.

/// Keys the player reacts to; everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
    Char(char),
    ArrowLeft,
    ArrowRight,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            " " | "Spacebar" => Self::Space,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Char(c),
                    _ => Self::Other,
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyAction {
    TogglePlay,
    ToggleFullscreen,
    /// Relative seek in seconds.
    SeekBy(f64),
}

/// Resolve a key press. Presses while a text input has focus are ignored.
pub fn map_key(key: Key, focus_in_text_input: bool, seek_step_secs: f64) -> Option<KeyAction> {
    if focus_in_text_input {
        return None;
    }
    match key {
        Key::Space | Key::Char('k') | Key::Char('K') => Some(KeyAction::TogglePlay),
        Key::Char('f') | Key::Char('F') => Some(KeyAction::ToggleFullscreen),
        Key::ArrowLeft => Some(KeyAction::SeekBy(-seek_step_secs)),
        Key::ArrowRight => Some(KeyAction::SeekBy(seek_step_secs)),
        _ => None,
    }
}

/// Target position for a relative seek, clamped to the media bounds.
pub fn seek_target(current: f64, delta: f64, duration: Option<f64>) -> f64 {
    let target = (current + delta).max(0.0);
    match duration {
        Some(d) if d.is_finite() => target.min(d),
        _ => target,
    }
}
