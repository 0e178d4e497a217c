use crate::{CampaignType, DisplayState, Generation, PriceBracket, ProviderListing};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub campaign: CampaignType,
    pub price_bracket: PriceBracket,
    pub listing: ProviderListing,
    /// Providers of the current campaign, limited to the revealed pages.
    pub providers: Vec<ProviderCardView>,
    pub can_load_more: bool,
    pub selected_count: usize,
    pub generation: Generation,
    pub display: DisplayState,
    /// Feedback for the last rejected action.
    pub notice: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCardView {
    pub code: String,
    pub name: String,
    pub image_url: String,
    pub selected: bool,
}
