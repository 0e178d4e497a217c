//! Catalog engine: provider/product fetching and batch execution.
mod batch;
mod engine;
mod fetch;
mod records;
mod types;

pub use batch::run_batch;
pub use engine::{EngineEvents, EngineHandle};
pub use fetch::{CatalogFetcher, FetchSettings, ReqwestCatalogFetcher};
pub use records::{parse_products, parse_providers};
pub use types::{EngineError, EngineEvent, FailureKind, FetchError};
