//! UI-only player state
//!
//! Every field changes through a named transition below, never by direct
//! assignment from the outside, so rules like "selecting a track closes
//! the menu" live in one place.

use serde::Serialize;

use crate::subtitle::track::TrackSelection;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    pub controls_visible: bool,
    pub center_icon_visible: bool,
    pub subtitle_menu_open: bool,
    pub muted: bool,
    /// Mirrors the host's fullscreen notifications, never set locally
    pub fullscreen: bool,
    pub selected_track: TrackSelection,
}

impl UiState {
    /// State on mount
    pub fn new(selected_track: TrackSelection) -> Self {
        Self {
            controls_visible: true,
            center_icon_visible: true,
            subtitle_menu_open: false,
            muted: false,
            fullscreen: false,
            selected_track,
        }
    }

    pub fn show_controls(&mut self) {
        self.controls_visible = true;
    }

    pub fn hide_controls(&mut self) {
        self.controls_visible = false;
    }

    pub fn show_center_icon(&mut self) {
        self.center_icon_visible = true;
    }

    pub fn hide_center_icon(&mut self) {
        self.center_icon_visible = false;
    }

    /// Flip mute and return the new value
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    pub fn toggle_subtitle_menu(&mut self) {
        self.subtitle_menu_open = !self.subtitle_menu_open;
    }

    pub fn close_subtitle_menu(&mut self) {
        self.subtitle_menu_open = false;
    }

    /// Pick a track. Always closes the menu.
    pub fn select_track(&mut self, selection: TrackSelection) {
        self.selected_track = selection;
        self.subtitle_menu_open = false;
    }

    /// Host reported a fullscreen change. Returns true if it changed
    /// anything.
    pub fn fullscreen_changed(&mut self, active: bool) -> bool {
        let changed = self.fullscreen != active;
        self.fullscreen = active;
        changed
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new(TrackSelection::Off)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_defaults() {
        let ui = UiState::default();
        assert!(ui.controls_visible);
        assert!(ui.center_icon_visible);
        assert!(!ui.subtitle_menu_open);
        assert!(!ui.muted);
        assert!(!ui.fullscreen);
        assert!(ui.selected_track.is_off());
    }

    #[test]
    fn test_select_track_closes_menu() {
        let mut ui = UiState::default();
        ui.toggle_subtitle_menu();
        assert!(ui.subtitle_menu_open);

        ui.select_track(TrackSelection::from("spa"));
        assert!(!ui.subtitle_menu_open);
        assert_eq!(ui.selected_track.language(), Some("spa"));

        ui.toggle_subtitle_menu();
        ui.select_track(TrackSelection::Off);
        assert!(!ui.subtitle_menu_open);
        assert!(ui.selected_track.is_off());
    }

    #[test]
    fn test_toggle_mute() {
        let mut ui = UiState::default();
        assert!(ui.toggle_mute());
        assert!(!ui.toggle_mute());
    }

    #[test]
    fn test_fullscreen_changed() {
        let mut ui = UiState::default();
        assert!(ui.fullscreen_changed(true));
        assert!(!ui.fullscreen_changed(true));
        assert!(ui.fullscreen);
        assert!(ui.fullscreen_changed(false));
    }
}
