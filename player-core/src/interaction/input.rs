//! User input vocabulary: keys, clicks and progress-bar geometry

/// Keys the player understands, named after DOM `KeyboardEvent.code`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Space,
    ArrowLeft,
    ArrowRight,
    KeyM,
    KeyF,
    Escape,
    Other(String),
}

impl Key {
    pub fn from_code(code: &str) -> Self {
        match code {
            "Space" => Self::Space,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "KeyM" => Self::KeyM,
            "KeyF" => Self::KeyF,
            "Escape" => Self::Escape,
            other => Self::Other(other.to_string()),
        }
    }
}

/// What held keyboard focus when the key was pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Nothing in particular (the document body)
    Document,
    /// A text field or other editable element
    Editable,
    /// Some other focusable element, such as a button
    Control,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub focus: Focus,
}

impl KeyPress {
    pub fn new(key: Key, focus: Focus) -> Self {
        Self { key, focus }
    }

    /// A key pressed with nothing focused
    pub fn global(key: Key) -> Self {
        Self::new(key, Focus::Document)
    }
}

/// Whether the host should suppress the browser's default action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyHandling {
    PreventDefault,
    Ignored,
}

impl KeyHandling {
    pub fn is_handled(self) -> bool {
        self == Self::PreventDefault
    }
}

/// Keyboard shortcut actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    TogglePlay,
    SeekForward,
    SeekBackward,
    ToggleMute,
    ToggleFullscreen,
    ExitFullscreen,
}

impl Shortcut {
    pub fn for_key(key: &Key) -> Option<Self> {
        match key {
            Key::Space => Some(Self::TogglePlay),
            Key::ArrowRight => Some(Self::SeekForward),
            Key::ArrowLeft => Some(Self::SeekBackward),
            Key::KeyM => Some(Self::ToggleMute),
            Key::KeyF => Some(Self::ToggleFullscreen),
            Key::Escape => Some(Self::ExitFullscreen),
            Key::Other(_) => None,
        }
    }
}

/// Buttons on the control bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlButton {
    PlayPause,
    Mute,
    Subtitles,
    Fullscreen,
}

/// Horizontal extent of the progress track, in the same coordinate space
/// as pointer events
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressTrack {
    pub left: f64,
    pub width: f64,
}

impl ProgressTrack {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    /// Percentage (0-100) under `pointer_x`. `None` for a collapsed track.
    pub fn percentage_at(&self, pointer_x: f64) -> Option<f64> {
        if !(self.width.is_finite() && self.width > 0.0) || !pointer_x.is_finite() {
            return None;
        }
        Some(((pointer_x - self.left) / self.width * 100.0).clamp(0.0, 100.0))
    }
}

/// Where a click landed. Clicks on the control bar never reach the
/// surface handler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickTarget {
    /// The video surface outside any control
    Surface,
    /// Empty space on the control bar
    ControlBar,
    Button(ControlButton),
    ProgressTrack { pointer_x: f64, track: ProgressTrack },
}
