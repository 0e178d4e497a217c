use crate::{CampaignType, Generation, PriceBracket, Provider, ProviderOutcome};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Platform finished wiring; request the provider listing.
    AppStarted,
    /// Provider listing arrived.
    ProvidersLoaded(Vec<Provider>),
    /// Provider listing could not be fetched.
    ProvidersFailed(String),
    /// User picked a campaign type.
    CampaignSelected(CampaignType),
    /// User ticked or unticked a provider.
    ProviderToggled(String),
    /// User picked a price bracket.
    PriceBracketSelected(PriceBracket),
    /// User asked to see more providers.
    LoadMoreClicked,
    /// Engine finished every fetch of a batch.
    BatchCompleted {
        generation: Generation,
        outcomes: Vec<ProviderOutcome>,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}
