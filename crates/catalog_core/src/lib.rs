//! Catalog core: pure selection state machine, batch aggregation and
//! view-model helpers.
mod aggregate;
mod effect;
mod filter;
mod msg;
mod presentation;
mod scroll;
mod selection;
mod state;
mod types;
mod update;
mod view_model;

pub use aggregate::{aggregate_outcomes, derive_display, ProductAggregator};
pub use effect::Effect;
pub use filter::{filter_products, matches, rate_in_bracket};
pub use msg::Msg;
pub use presentation::PresentationStateDriver;
pub use scroll::ScrollCoordinator;
pub use selection::{ProviderCatalog, SelectionError, SelectionState};
pub use state::{AppState, DEFAULT_PAGE_SIZE};
pub use types::{
    Batch, CampaignTag, CampaignType, DisplayState, FetchOutcome, Generation, PriceBracket,
    Product, Provider, ProviderListing, ProviderOutcome, PREPAID_PROVIDER_CODE,
};
pub use update::update;
pub use view_model::{AppViewModel, ProviderCardView};
