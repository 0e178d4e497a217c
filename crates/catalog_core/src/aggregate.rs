use std::collections::HashMap;

use catalog_logging::{catalog_debug, catalog_info, catalog_warn};

use crate::filter::filter_products;
use crate::selection::SelectionState;
use crate::{Batch, DisplayState, FetchOutcome, Generation, PriceBracket, Product, ProviderOutcome};

#[derive(Debug, Clone, PartialEq)]
struct CachedAggregate {
    generation: Generation,
    products: Vec<Product>,
}

/// Turns selections into generation-tagged batches and batch outcomes into
/// display states. Only the batch carrying the newest generation may resolve.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductAggregator {
    current_generation: Generation,
    pending: Option<Batch>,
    cached: Option<CachedAggregate>,
}

impl ProductAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_generation(&self) -> Generation {
        self.current_generation
    }

    /// The newest batch, while it is still in flight.
    pub fn pending(&self) -> Option<&Batch> {
        self.pending.as_ref()
    }

    /// Allocates the next generation for `selection`, invalidating anything
    /// issued before. Returns `None` for an empty selection: there is nothing
    /// to fetch and the caller shows `Idle`.
    pub fn issue(&mut self, selection: &SelectionState) -> Option<Batch> {
        self.current_generation += 1;
        self.cached = None;

        if selection.is_empty() {
            self.pending = None;
            catalog_debug!(
                "Generation {} has an empty selection; no batch issued",
                self.current_generation
            );
            return None;
        }

        let batch = Batch {
            generation: self.current_generation,
            provider_codes: selection.selected_codes().to_vec(),
            price_bracket: selection.price_bracket(),
        };
        catalog_info!(
            "Issuing batch generation={} providers={} bracket={:?}",
            batch.generation,
            batch.provider_codes.len(),
            batch.price_bracket
        );
        self.pending = Some(batch.clone());
        Some(batch)
    }

    /// Resolves the batch of `generation`. Returns `None` when that batch has
    /// been superseded; its outcomes are dropped.
    pub fn resolve(
        &mut self,
        generation: Generation,
        outcomes: Vec<ProviderOutcome>,
    ) -> Option<DisplayState> {
        let is_current = generation == self.current_generation
            && self
                .pending
                .as_ref()
                .is_some_and(|batch| batch.generation == generation);
        if !is_current {
            catalog_debug!(
                "Discarding stale batch generation={} (current={})",
                generation,
                self.current_generation
            );
            return None;
        }
        let batch = self.pending.take()?;

        match aggregate_outcomes(&batch, outcomes) {
            Err(message) => {
                catalog_warn!(
                    "Batch generation={} failed: {}",
                    batch.generation,
                    message
                );
                Some(DisplayState::Error(message))
            }
            Ok(products) => {
                let display = derive_display(&products, batch.price_bracket);
                self.cached = Some(CachedAggregate {
                    generation: batch.generation,
                    products,
                });
                Some(display)
            }
        }
    }

    /// Re-filters the last resolved aggregate of the current generation.
    /// `None` when there is nothing cached for it (batch in flight, or the
    /// batch failed); the caller must then issue a new batch.
    pub fn refilter(&self, bracket: PriceBracket) -> Option<DisplayState> {
        let cached = self
            .cached
            .as_ref()
            .filter(|cached| cached.generation == self.current_generation)?;
        Some(derive_display(&cached.products, bracket))
    }
}

/// Concatenates successful product lists in selection order.
///
/// The first failure, in selection order, fails the whole batch. Products
/// whose provider code differs from the provider they were fetched for are
/// dropped.
pub fn aggregate_outcomes(
    batch: &Batch,
    outcomes: Vec<ProviderOutcome>,
) -> Result<Vec<Product>, String> {
    let mut by_code: HashMap<String, FetchOutcome> = HashMap::with_capacity(outcomes.len());
    for ProviderOutcome {
        provider_code,
        outcome,
    } in outcomes
    {
        if !batch.provider_codes.contains(&provider_code) {
            catalog_warn!(
                "Ignoring outcome for provider {} outside batch generation={}",
                provider_code,
                batch.generation
            );
            continue;
        }
        by_code.entry(provider_code).or_insert(outcome);
    }

    let mut aggregate = Vec::new();
    for code in &batch.provider_codes {
        match by_code.remove(code) {
            None => return Err(format!("no response for provider {code}")),
            Some(FetchOutcome::Failure(message)) => return Err(message),
            Some(FetchOutcome::NotFound) => {
                catalog_debug!("Provider {} has no catalog", code);
            }
            Some(FetchOutcome::Success(products)) => {
                for product in products {
                    if product.provider_code != *code {
                        catalog_warn!(
                            "Dropping product {} tagged for provider {} in response for {}",
                            product.product_code,
                            product.provider_code,
                            code
                        );
                        continue;
                    }
                    aggregate.push(product);
                }
            }
        }
    }
    Ok(aggregate)
}

/// Display state for an unfiltered aggregate under `bracket`.
pub fn derive_display(aggregate: &[Product], bracket: PriceBracket) -> DisplayState {
    if aggregate.is_empty() {
        return DisplayState::EmptyNoProducts;
    }
    let filtered = filter_products(aggregate, bracket);
    if filtered.is_empty() {
        DisplayState::EmptyFiltered
    } else {
        DisplayState::Results(filtered)
    }
}
