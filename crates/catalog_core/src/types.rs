use std::fmt;

/// Provider code of the one provider sold under the Prepaid campaign when the
/// listing does not tag providers itself.
pub const PREPAID_PROVIDER_CODE: &str = "vumareach";

pub type Generation = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CampaignTag {
    Free,
    Prepaid,
}

impl CampaignTag {
    /// Tag inferred from the provider code alone.
    pub fn infer_from_code(code: &str) -> Self {
        if code.eq_ignore_ascii_case(PREPAID_PROVIDER_CODE) {
            CampaignTag::Prepaid
        } else {
            CampaignTag::Free
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CampaignType {
    #[default]
    Unset,
    Free,
    Prepaid,
}

impl CampaignType {
    /// Whether a provider tagged `tag` is offered under this campaign.
    /// `Unset` offers every provider.
    pub fn offers(self, tag: CampaignTag) -> bool {
        match self {
            CampaignType::Unset => true,
            CampaignType::Free => tag == CampaignTag::Free,
            CampaignType::Prepaid => tag == CampaignTag::Prepaid,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CampaignType::Unset => "All campaigns",
            CampaignType::Free => "FREE setup + router",
            CampaignType::Prepaid => "Prepaid Fibre",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provider {
    pub code: String,
    pub name: String,
    pub image_url: String,
    pub campaign_tag: CampaignTag,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub product_code: String,
    pub product_name: String,
    /// Monthly rate in rand; never negative.
    pub product_rate: f64,
    pub provider_code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceBracket {
    /// No price filter.
    #[default]
    Any,
    /// R0 - R699
    Low,
    /// R700 - R999
    Mid,
    /// R1000+
    High,
}

impl PriceBracket {
    pub const ALL: [PriceBracket; 4] = [
        PriceBracket::Any,
        PriceBracket::Low,
        PriceBracket::Mid,
        PriceBracket::High,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PriceBracket::Any => "Any price",
            PriceBracket::Low => "R0 - R699",
            PriceBracket::Mid => "R700 - R999",
            PriceBracket::High => "R1000+",
        }
    }
}

/// Immutable snapshot of one aggregation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub generation: Generation,
    /// Selected provider codes in selection order.
    pub provider_codes: Vec<String>,
    pub price_bracket: PriceBracket,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Success(Vec<Product>),
    /// The provider has no catalog.
    NotFound,
    Failure(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderOutcome {
    pub provider_code: String,
    pub outcome: FetchOutcome,
}

impl ProviderOutcome {
    pub fn new(provider_code: impl Into<String>, outcome: FetchOutcome) -> Self {
        Self {
            provider_code: provider_code.into(),
            outcome,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DisplayState {
    /// No providers selected.
    #[default]
    Idle,
    Loading,
    Results(Vec<Product>),
    /// Every selected provider came back without a catalog.
    EmptyNoProducts,
    /// Products exist but none fall in the chosen price bracket.
    EmptyFiltered,
    Error(String),
}

impl DisplayState {
    pub fn is_results(&self) -> bool {
        matches!(self, DisplayState::Results(_))
    }
}

/// Status of the one-off provider listing fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProviderListing {
    #[default]
    Loading,
    Ready,
    Failed(String),
}

impl fmt::Display for DisplayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayState::Idle => write!(f, "idle"),
            DisplayState::Loading => write!(f, "loading"),
            DisplayState::Results(products) => write!(f, "results ({})", products.len()),
            DisplayState::EmptyNoProducts => write!(f, "empty (no products)"),
            DisplayState::EmptyFiltered => write!(f, "empty (filtered)"),
            DisplayState::Error(message) => write!(f, "error: {message}"),
        }
    }
}
