use crate::{Batch, Generation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadProviders,
    /// Fetch every provider of the batch concurrently.
    FetchBatch(Batch),
    /// Batches older than `generation` may be aborted.
    CancelSuperseded { generation: Generation },
    /// Bring freshly arrived results into view.
    ScrollToResults,
}
