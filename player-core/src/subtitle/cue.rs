//! Subtitle cue and timestamp handling

use serde::Serialize;

macro_rules! regex {
    ($re:literal $(,)?) => {{
        static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
        RE.get_or_init(|| regex::Regex::new($re).unwrap())
    }};
}

/// A single subtitle cue with timing and text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cue {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds, never before `start`
    pub end: f64,
    /// Cue text, verbatim. Multi-line cues are joined with `\n`.
    pub text: String,
}

impl Cue {
    /// Create a new cue
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// True if `time` falls inside the cue. Both ends are inclusive, so a
    /// zero-length cue still matches its own instant.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time <= self.end
    }

    /// Get the duration in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Parse a timestamp of the form `H:MM:SS.fff`, `H:MM:SS` or `MM:SS.fff`
/// into seconds.
///
/// Returns `None` for anything that is not made of plain digit groups.
pub fn parse_timestamp(token: &str) -> Option<f64> {
    let caps = regex!(r"^(?:(\d+):)?(\d+):(\d+)(?:\.(\d{1,9}))?$").captures(token.trim())?;

    let hours: u64 = match caps.get(1) {
        Some(h) => h.as_str().parse().ok()?,
        None => 0,
    };
    let minutes: u64 = caps[2].parse().ok()?;
    let seconds: u64 = caps[3].parse().ok()?;
    let fraction = match caps.get(4) {
        Some(f) => {
            let digits = f.as_str();
            let value: u32 = digits.parse().ok()?;
            f64::from(value) / 10f64.powi(digits.len() as i32)
        }
        None => 0.0,
    };

    Some(hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds as f64 + fraction)
}

/// Format seconds as `HH:MM:SS.mmm`
pub fn format_timestamp(secs: f64) -> String {
    let total_ms = (secs.max(0.0) * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let seconds = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;
    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
}
