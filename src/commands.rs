//! Line commands read from stdin
//!
//! Lets a person (or a script) drive the headless player the way a page
//! would: key presses, menu picks and progress-bar clicks.

use player_core::{Key, TrackSelection};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// A `KeyboardEvent.code`, dispatched through the shortcut hub
    Key(Key),
    /// Pick a subtitle track ("off" disables)
    Track(TrackSelection),
    /// Click the progress bar at this percentage
    Seek(f64),
    /// Open or close the subtitle menu
    Menu,
    /// Print the current snapshot
    Snapshot,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let command = match (words.next()?, words.next()) {
            ("quit" | "q", None) => Self::Quit,
            ("menu", None) => Self::Menu,
            ("snapshot" | "s", None) => Self::Snapshot,
            ("track", Some(code)) => Self::Track(TrackSelection::from(code)),
            ("seek", Some(pct)) => Self::Seek(pct.trim_end_matches('%').parse().ok()?),
            (code, None) => match Key::from_code(code) {
                Key::Other(_) => return None,
                key => Self::Key(key),
            },
            _ => return None,
        };
        if words.next().is_some() {
            return None;
        }
        Some(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keys() {
        assert_eq!(Command::parse("Space"), Some(Command::Key(Key::Space)));
        assert_eq!(Command::parse(" KeyM "), Some(Command::Key(Key::KeyM)));
        assert_eq!(Command::parse("KeyQ"), None);
    }

    #[test]
    fn test_parse_arguments() {
        assert_eq!(
            Command::parse("track spa"),
            Some(Command::Track(TrackSelection::from("spa")))
        );
        assert_eq!(
            Command::parse("track off"),
            Some(Command::Track(TrackSelection::Off))
        );
        assert_eq!(Command::parse("seek 25%"), Some(Command::Seek(25.0)));
        assert_eq!(Command::parse("seek half"), None);
        assert_eq!(Command::parse("track"), None);
        assert_eq!(Command::parse("track eng spa"), None);
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(Command::parse("q"), Some(Command::Quit));
        assert_eq!(Command::parse("menu"), Some(Command::Menu));
        assert_eq!(Command::parse(""), None);
    }
}
