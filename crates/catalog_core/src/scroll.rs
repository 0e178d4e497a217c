use crate::DisplayState;

/// Fires once per transition into a non-empty `Results` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollCoordinator {
    showing_results: bool,
}

impl ScrollCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `display` and returns whether results just came into view.
    pub fn observe(&mut self, display: &DisplayState) -> bool {
        let now_showing = matches!(display, DisplayState::Results(products) if !products.is_empty());
        let fire = now_showing && !self.showing_results;
        self.showing_results = now_showing;
        fire
    }
}
