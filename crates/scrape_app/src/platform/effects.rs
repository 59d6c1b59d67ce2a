use std::time::Duration;

use scrape_core::{Effect, Msg};
use scrape_engine::{EngineEvent, EngineHandle};
use scrape_logging::{scrape_debug, scrape_info, scrape_warn};

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartScrape(request) => {
                    scrape_info!(
                        "StartScrape url_len={} url={}",
                        request.url.len(),
                        request.url
                    );
                    self.engine.scrape(request.url);
                }
                Effect::ScrapeRejected(rejection) => {
                    scrape_warn!("Scrape not started: {}", rejection);
                }
                Effect::ExportCsv { payload } => {
                    scrape_info!("ExportCsv payload_len={}", payload.to_string().len());
                    self.engine.export(payload);
                }
            }
        }
    }

    /// Wait up to `timeout` for the next engine event, translated into a message.
    /// Fails once the engine thread has stopped, so callers cannot wait forever.
    pub fn next_msg(&self, timeout: Duration) -> anyhow::Result<Option<Msg>> {
        let event = self.engine.recv_timeout(timeout)?;
        Ok(event.map(map_event))
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::StreamText(text) => {
            scrape_debug!("StreamText {} bytes", text.len());
            Msg::StreamText(text)
        }
        EngineEvent::StreamFinished(_) => Msg::StreamFinished,
        EngineEvent::StreamFailed(err) => Msg::StreamFailed(err.to_string()),
        EngineEvent::ExportFinished(Ok(path)) => Msg::ExportSaved(path),
        EngineEvent::ExportFinished(Err(err)) => Msg::ExportFailed(err.to_string()),
    }
}
