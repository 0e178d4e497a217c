use std::sync::mpsc;
use std::thread;

use catalog_core::{Effect, Msg};
use catalog_engine::{EngineError, EngineEvent, EngineEvents, EngineHandle, FetchSettings};
use catalog_logging::{catalog_debug, catalog_info, catalog_warn};

use super::app::LoopEvent;

/// Executes effects produced by `update`.
pub trait EffectSink {
    /// Returns whether the view should jump to freshly arrived results.
    fn run(&mut self, effects: Vec<Effect>) -> bool;
}

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: FetchSettings, loop_tx: mpsc::Sender<LoopEvent>) -> Result<Self, EngineError> {
        let (engine, events) = EngineHandle::spawn(settings)?;
        spawn_event_forwarder(events, loop_tx);
        Ok(Self { engine })
    }
}

impl EffectSink for EffectRunner {
    fn run(&mut self, effects: Vec<Effect>) -> bool {
        let mut scroll = false;
        for effect in effects {
            match effect {
                Effect::LoadProviders => {
                    catalog_info!("LoadProviders");
                    self.engine.load_providers();
                }
                Effect::FetchBatch(batch) => {
                    catalog_info!(
                        "FetchBatch generation={} providers={:?}",
                        batch.generation,
                        batch.provider_codes
                    );
                    self.engine.fetch_batch(batch);
                }
                Effect::CancelSuperseded { generation } => {
                    catalog_debug!("CancelSuperseded generation={}", generation);
                    self.engine.cancel_superseded(generation);
                }
                Effect::ScrollToResults => scroll = true,
            }
        }
        scroll
    }
}

fn spawn_event_forwarder(events: EngineEvents, loop_tx: mpsc::Sender<LoopEvent>) {
    thread::spawn(move || {
        while let Some(event) = events.recv() {
            let msg = match event {
                EngineEvent::ProvidersLoaded(Ok(providers)) => Msg::ProvidersLoaded(providers),
                EngineEvent::ProvidersLoaded(Err(err)) => {
                    catalog_warn!("Provider listing unavailable: {}", err);
                    Msg::ProvidersFailed(err.to_string())
                }
                EngineEvent::BatchCompleted {
                    generation,
                    outcomes,
                } => Msg::BatchCompleted {
                    generation,
                    outcomes,
                },
            };
            if loop_tx.send(LoopEvent::Dispatch(msg)).is_err() {
                break;
            }
        }
    });
}
