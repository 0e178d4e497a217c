use std::time::Duration;

use catalog_core::{Batch, FetchOutcome, ProviderOutcome};
use catalog_logging::catalog_warn;
use futures_util::future::join_all;

use crate::fetch::CatalogFetcher;

/// Fetches every provider of `batch` concurrently and waits for all of them.
///
/// Outcomes come back in the batch's provider order. A fetch that outlives
/// `timeout` becomes `Failure("timeout")`.
pub async fn run_batch(
    fetcher: &dyn CatalogFetcher,
    batch: &Batch,
    timeout: Duration,
) -> Vec<ProviderOutcome> {
    let fetches = batch.provider_codes.iter().map(|code| async move {
        let outcome = match tokio::time::timeout(timeout, fetcher.fetch_products(code)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                catalog_warn!(
                    "Provider {} timed out after {:?} (generation={})",
                    code,
                    timeout,
                    batch.generation
                );
                FetchOutcome::Failure("timeout".to_string())
            }
        };
        ProviderOutcome::new(code.clone(), outcome)
    });

    join_all(fetches).await
}
