use crate::aggregate::ProductAggregator;
use crate::presentation::PresentationStateDriver;
use crate::selection::{ProviderCatalog, SelectionState};
use crate::view_model::{AppViewModel, ProviderCardView};
use crate::{DisplayState, Generation, ProviderListing};

/// Providers revealed per page of the provider grid.
pub const DEFAULT_PAGE_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub(crate) listing: ProviderListing,
    pub(crate) catalog: ProviderCatalog,
    pub(crate) selection: SelectionState,
    pub(crate) aggregator: ProductAggregator,
    pub(crate) presentation: PresentationStateDriver,
    pub(crate) notice: Option<String>,
    pub(crate) providers_requested: bool,
    page_size: usize,
    visible_limit: usize,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            listing: ProviderListing::default(),
            catalog: ProviderCatalog::default(),
            selection: SelectionState::default(),
            aggregator: ProductAggregator::default(),
            presentation: PresentationStateDriver::default(),
            notice: None,
            providers_requested: false,
            page_size,
            visible_limit: page_size,
            dirty: false,
        }
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn catalog(&self) -> &ProviderCatalog {
        &self.catalog
    }

    pub fn display(&self) -> &DisplayState {
        self.presentation.display()
    }

    pub fn current_generation(&self) -> Generation {
        self.aggregator.current_generation()
    }

    pub fn view(&self) -> AppViewModel {
        let campaign = self.selection.campaign_type();
        let providers = self
            .catalog
            .offered(campaign)
            .take(self.visible_limit)
            .map(|provider| ProviderCardView {
                code: provider.code.clone(),
                name: provider.name.clone(),
                image_url: provider.image_url.clone(),
                selected: self.selection.is_selected(&provider.code),
            })
            .collect();

        AppViewModel {
            campaign,
            price_bracket: self.selection.price_bracket(),
            listing: self.listing.clone(),
            providers,
            can_load_more: self.can_load_more(),
            selected_count: self.selection.selected_codes().len(),
            generation: self.aggregator.current_generation(),
            display: self.presentation.display().clone(),
            notice: self.notice.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns and clears the dirty flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn can_load_more(&self) -> bool {
        self.catalog.offered(self.selection.campaign_type()).count() > self.visible_limit
    }

    pub(crate) fn reveal_next_page(&mut self) {
        self.visible_limit = self.visible_limit.saturating_add(self.page_size);
    }

    pub(crate) fn reset_paging(&mut self) {
        self.visible_limit = self.page_size;
    }
}
