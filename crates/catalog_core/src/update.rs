use catalog_logging::{catalog_error, catalog_info, catalog_warn};

use crate::selection::ProviderCatalog;
use crate::{AppState, DisplayState, Effect, Msg, ProviderListing};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::AppStarted => {
            if state.providers_requested {
                return (state, Vec::new());
            }
            state.providers_requested = true;
            state.listing = ProviderListing::Loading;
            state.mark_dirty();
            vec![Effect::LoadProviders]
        }
        Msg::ProvidersLoaded(providers) => {
            state.catalog = ProviderCatalog::new(providers);
            catalog_info!("Provider listing ready with {} providers", state.catalog.len());
            state.listing = ProviderListing::Ready;
            state.reset_paging();
            state.mark_dirty();
            Vec::new()
        }
        Msg::ProvidersFailed(message) => {
            catalog_error!("Provider listing failed: {}", message);
            state.listing = ProviderListing::Failed(message);
            state.mark_dirty();
            Vec::new()
        }
        Msg::CampaignSelected(campaign) => {
            state.notice = None;
            let had_selection = state.selection.set_campaign_type(campaign);
            state.reset_paging();
            state.mark_dirty();
            // Empty before and after: the display is already Idle.
            if had_selection {
                reaggregate(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::ProviderToggled(code) => {
            match state.selection.toggle_provider(&code, &state.catalog) {
                Ok(_) => {
                    state.notice = None;
                    state.mark_dirty();
                    reaggregate(&mut state)
                }
                Err(err) => {
                    catalog_warn!("Rejected provider toggle: {}", err);
                    state.notice = Some(err.to_string());
                    state.mark_dirty();
                    Vec::new()
                }
            }
        }
        Msg::PriceBracketSelected(bracket) => {
            if !state.selection.set_price_bracket(bracket) {
                return (state, Vec::new());
            }
            state.notice = None;
            state.mark_dirty();
            if state.selection.is_empty() {
                Vec::new()
            } else if let Some(display) = state.aggregator.refilter(bracket) {
                settle(&mut state, display)
            } else {
                reaggregate(&mut state)
            }
        }
        Msg::LoadMoreClicked => {
            if state.can_load_more() {
                state.reveal_next_page();
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::BatchCompleted {
            generation,
            outcomes,
        } => match state.aggregator.resolve(generation, outcomes) {
            Some(display) => settle(&mut state, display),
            None => Vec::new(),
        },
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Starts a new generation for the current selection.
fn reaggregate(state: &mut AppState) -> Vec<Effect> {
    match state.aggregator.issue(&state.selection) {
        Some(batch) => {
            state.presentation.enter_loading();
            vec![Effect::FetchBatch(batch)]
        }
        None => {
            state.presentation.enter_idle();
            vec![Effect::CancelSuperseded {
                generation: state.aggregator.current_generation(),
            }]
        }
    }
}

fn settle(state: &mut AppState, display: DisplayState) -> Vec<Effect> {
    state.mark_dirty();
    if state.presentation.settle(display) {
        vec![Effect::ScrollToResults]
    } else {
        Vec::new()
    }
}
