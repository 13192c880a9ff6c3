//! Visibility-gated autoplay

/// What to do after a visibility report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityAction {
    Play,
    Pause,
}

/// Tracks whether the player is "in view" and reports threshold crossings
/// only, so a stream of intersection reports does not spam play/pause.
#[derive(Debug, Clone)]
pub struct VisibilityGate {
    threshold: f64,
    in_view: Option<bool>,
}

impl VisibilityGate {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            in_view: None,
        }
    }

    /// Feed the visible fraction (0.0-1.0) of the player
    pub fn observe(&mut self, visible_ratio: f64) -> Option<VisibilityAction> {
        let in_view = visible_ratio >= self.threshold;
        if self.in_view == Some(in_view) {
            return None;
        }
        let first = self.in_view.is_none();
        self.in_view = Some(in_view);

        match (in_view, first) {
            (true, _) => Some(VisibilityAction::Play),
            // Starting out of view: nothing is playing yet
            (false, true) => None,
            (false, false) => Some(VisibilityAction::Pause),
        }
    }

    pub fn in_view(&self) -> bool {
        self.in_view.unwrap_or(false)
    }
}
