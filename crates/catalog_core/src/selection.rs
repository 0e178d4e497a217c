use catalog_logging::catalog_warn;
use thiserror::Error;

use crate::{CampaignType, PriceBracket, Provider};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("unknown provider: {code}")]
    UnknownProvider { code: String },
    #[error("provider {code} is not offered under the {} campaign", .campaign.label())]
    OutsideCampaign {
        code: String,
        campaign: CampaignType,
    },
}

/// Known providers, in listing order, unique by code.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProviderCatalog {
    providers: Vec<Provider>,
}

impl ProviderCatalog {
    pub fn new(providers: Vec<Provider>) -> Self {
        let mut unique: Vec<Provider> = Vec::with_capacity(providers.len());
        for provider in providers {
            if unique.iter().any(|known| known.code == provider.code) {
                catalog_warn!("Dropping duplicate provider code {}", provider.code);
                continue;
            }
            unique.push(provider);
        }
        Self { providers: unique }
    }

    pub fn get(&self, code: &str) -> Option<&Provider> {
        self.providers.iter().find(|provider| provider.code == code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Providers offered under `campaign`, listing order.
    pub fn offered(&self, campaign: CampaignType) -> impl Iterator<Item = &Provider> {
        self.providers
            .iter()
            .filter(move |provider| campaign.offers(provider.campaign_tag))
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// The user's intent: campaign, selected providers and price bracket.
///
/// Selected codes are always known providers of the current campaign, and a
/// campaign change always empties the selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionState {
    campaign_type: CampaignType,
    selected: Vec<String>,
    price_bracket: PriceBracket,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn campaign_type(&self) -> CampaignType {
        self.campaign_type
    }

    /// Selected provider codes in the order they were selected.
    pub fn selected_codes(&self) -> &[String] {
        &self.selected
    }

    pub fn is_selected(&self, code: &str) -> bool {
        self.selected.iter().any(|selected| selected == code)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn price_bracket(&self) -> PriceBracket {
        self.price_bracket
    }

    /// Switches campaign and clears the selection. Returns whether anything
    /// was selected beforehand.
    pub fn set_campaign_type(&mut self, campaign: CampaignType) -> bool {
        self.campaign_type = campaign;
        let had_selection = !self.selected.is_empty();
        self.selected.clear();
        had_selection
    }

    /// Flips membership of `code`. Returns whether it is selected afterwards.
    pub fn toggle_provider(
        &mut self,
        code: &str,
        catalog: &ProviderCatalog,
    ) -> Result<bool, SelectionError> {
        let provider = catalog
            .get(code)
            .ok_or_else(|| SelectionError::UnknownProvider {
                code: code.to_string(),
            })?;

        if let Some(index) = self.selected.iter().position(|selected| selected == code) {
            self.selected.remove(index);
            return Ok(false);
        }

        if !self.campaign_type.offers(provider.campaign_tag) {
            return Err(SelectionError::OutsideCampaign {
                code: code.to_string(),
                campaign: self.campaign_type,
            });
        }

        self.selected.push(code.to_string());
        Ok(true)
    }

    /// Returns whether the bracket actually changed.
    pub fn set_price_bracket(&mut self, bracket: PriceBracket) -> bool {
        let changed = self.price_bracket != bracket;
        self.price_bracket = bracket;
        changed
    }
}
