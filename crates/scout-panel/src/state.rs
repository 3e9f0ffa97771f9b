//! Browser panel state machine
//!
//! ```text
//! Uninitialized
//!   ↓ open
//! Shown ⇄ Hidden
//!   ↓ shutdown / host teardown
//! Destroyed
//! ```
//!
//! A destroyed panel is rebuilt by the next `open`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelState {
    /// No window exists yet
    Uninitialized,
    /// Window and surfaces alive, not visible
    Hidden,
    /// Window visible
    Shown,
    /// Window and surfaces torn down
    Destroyed,
}

impl PanelState {
    pub fn can_transition_to(&self, target: PanelState) -> bool {
        match (self, target) {
            // First open builds and shows
            (PanelState::Uninitialized, PanelState::Shown) => true,
            (PanelState::Shown, PanelState::Hidden) => true,
            (PanelState::Hidden, PanelState::Shown) => true,
            (PanelState::Shown, PanelState::Destroyed) => true,
            (PanelState::Hidden, PanelState::Destroyed) => true,
            // Rebuild after teardown
            (PanelState::Destroyed, PanelState::Shown) => true,
            (a, b) if *a == b => true,
            _ => false,
        }
    }

    /// Whether the window and both surfaces currently exist
    pub fn has_surfaces(&self) -> bool {
        matches!(self, PanelState::Hidden | PanelState::Shown)
    }

    pub fn needs_construction(&self) -> bool {
        matches!(self, PanelState::Uninitialized | PanelState::Destroyed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PanelState::Uninitialized => "uninitialized",
            PanelState::Hidden => "hidden",
            PanelState::Shown => "shown",
            PanelState::Destroyed => "destroyed",
        }
    }
}

impl std::fmt::Display for PanelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transitions() {
        assert!(PanelState::Uninitialized.can_transition_to(PanelState::Shown));
        assert!(PanelState::Shown.can_transition_to(PanelState::Hidden));
        assert!(PanelState::Hidden.can_transition_to(PanelState::Shown));
        assert!(PanelState::Hidden.can_transition_to(PanelState::Destroyed));
        assert!(PanelState::Shown.can_transition_to(PanelState::Destroyed));
        assert!(PanelState::Destroyed.can_transition_to(PanelState::Shown));
    }

    #[test]
    fn test_invalid_transitions() {
        // Hiding requires a visible window
        assert!(!PanelState::Uninitialized.can_transition_to(PanelState::Hidden));
        assert!(!PanelState::Destroyed.can_transition_to(PanelState::Hidden));
        // Nothing returns to Uninitialized
        assert!(!PanelState::Shown.can_transition_to(PanelState::Uninitialized));
        assert!(!PanelState::Uninitialized.can_transition_to(PanelState::Destroyed));
    }

    #[test]
    fn test_surface_predicates() {
        assert!(PanelState::Hidden.has_surfaces());
        assert!(!PanelState::Destroyed.has_surfaces());
        assert!(PanelState::Destroyed.needs_construction());
        assert!(!PanelState::Shown.needs_construction());
    }
}
