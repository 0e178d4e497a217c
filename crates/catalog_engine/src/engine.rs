use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use catalog_core::{Batch, Generation};
use catalog_logging::{catalog_debug, catalog_error, catalog_info};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::batch::run_batch;
use crate::fetch::{CatalogFetcher, FetchSettings, ReqwestCatalogFetcher};
use crate::{EngineError, EngineEvent};

enum EngineCommand {
    LoadProviders,
    FetchBatch(Batch),
    CancelSuperseded { generation: Generation },
}

struct InFlight {
    generation: Generation,
    token: CancellationToken,
}

/// Sends work to the engine thread. Cheap to clone.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

/// Receiving side of the engine's events.
pub struct EngineEvents {
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn spawn(settings: FetchSettings) -> Result<(Self, EngineEvents), EngineError> {
        let batch_timeout = settings.batch_timeout;
        let fetcher = ReqwestCatalogFetcher::new(settings)?;
        Self::spawn_with(Arc::new(fetcher), batch_timeout)
    }

    /// Starts the engine thread around any fetcher implementation.
    pub fn spawn_with(
        fetcher: Arc<dyn CatalogFetcher>,
        batch_timeout: Duration,
    ) -> Result<(Self, EngineEvents), EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = Runtime::new().map_err(EngineError::Runtime)?;

        thread::Builder::new()
            .name("catalog-engine".to_string())
            .spawn(move || {
                let mut in_flight: Option<InFlight> = None;
                while let Ok(command) = cmd_rx.recv() {
                    handle_command(
                        &runtime,
                        &fetcher,
                        batch_timeout,
                        &mut in_flight,
                        command,
                        &event_tx,
                    );
                }
                if let Some(previous) = in_flight.take() {
                    previous.token.cancel();
                }
                catalog_debug!("Engine command channel closed; shutting down");
            })
            .map_err(EngineError::Thread)?;

        Ok((Self { cmd_tx }, EngineEvents { event_rx }))
    }

    pub fn load_providers(&self) {
        let _ = self.cmd_tx.send(EngineCommand::LoadProviders);
    }

    /// Runs `batch`, aborting whichever older batch is still running.
    pub fn fetch_batch(&self, batch: Batch) {
        let _ = self.cmd_tx.send(EngineCommand::FetchBatch(batch));
    }

    /// Aborts any running batch older than `generation`.
    pub fn cancel_superseded(&self, generation: Generation) {
        let _ = self
            .cmd_tx
            .send(EngineCommand::CancelSuperseded { generation });
    }
}

impl EngineEvents {
    /// Blocks for the next event; `None` once the engine is gone.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}

fn handle_command(
    runtime: &Runtime,
    fetcher: &Arc<dyn CatalogFetcher>,
    batch_timeout: Duration,
    in_flight: &mut Option<InFlight>,
    command: EngineCommand,
    event_tx: &mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::LoadProviders => {
            let fetcher = fetcher.clone();
            let event_tx = event_tx.clone();
            runtime.spawn(async move {
                let result = fetcher.fetch_providers().await;
                match &result {
                    Ok(providers) => catalog_info!("Loaded {} providers", providers.len()),
                    Err(err) => catalog_error!("Provider listing failed: {}", err),
                }
                let _ = event_tx.send(EngineEvent::ProvidersLoaded(result));
            });
        }
        EngineCommand::FetchBatch(batch) => {
            cancel_older(in_flight, batch.generation);
            let token = CancellationToken::new();
            *in_flight = Some(InFlight {
                generation: batch.generation,
                token: token.clone(),
            });

            let fetcher = fetcher.clone();
            let event_tx = event_tx.clone();
            runtime.spawn(async move {
                let generation = batch.generation;
                tokio::select! {
                    _ = token.cancelled() => {
                        catalog_debug!("Batch generation={} aborted", generation);
                    }
                    outcomes = run_batch(fetcher.as_ref(), &batch, batch_timeout) => {
                        let _ = event_tx.send(EngineEvent::BatchCompleted { generation, outcomes });
                    }
                }
            });
        }
        EngineCommand::CancelSuperseded { generation } => {
            cancel_older(in_flight, generation);
        }
    }
}

fn cancel_older(in_flight: &mut Option<InFlight>, generation: Generation) {
    if in_flight
        .as_ref()
        .is_some_and(|running| running.generation < generation)
    {
        if let Some(previous) = in_flight.take() {
            catalog_debug!(
                "Cancelling batch generation={} superseded by {}",
                previous.generation,
                generation
            );
            previous.token.cancel();
        }
    }
}
