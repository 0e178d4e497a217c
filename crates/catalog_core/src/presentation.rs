use crate::scroll::ScrollCoordinator;
use crate::DisplayState;

/// Owns the single display state the view reads.
///
/// `Loading` is entered when a batch is issued and left only when that batch
/// or a newer one resolves, so partial results are never observable.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PresentationStateDriver {
    display: DisplayState,
    scroll: ScrollCoordinator,
}

impl PresentationStateDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    pub fn enter_idle(&mut self) {
        self.transition(DisplayState::Idle);
    }

    pub fn enter_loading(&mut self) {
        self.transition(DisplayState::Loading);
    }

    /// Applies a resolved batch (or a local re-filter). Returns whether the
    /// view should scroll to the newly arrived results.
    pub fn settle(&mut self, resolved: DisplayState) -> bool {
        self.transition(resolved)
    }

    fn transition(&mut self, next: DisplayState) -> bool {
        let scroll = self.scroll.observe(&next);
        self.display = next;
        scroll
    }
}
