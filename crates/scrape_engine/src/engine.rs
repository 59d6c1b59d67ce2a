use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use scrape_logging::{scrape_error, scrape_info};
use serde_json::Value;

use crate::endpoints::ServerEndpoints;
use crate::export::{ExportError, ExportSettings, Exporter, ReqwestExporter};
use crate::transport::{
    ChannelEventSink, EventSink, ReqwestTransport, ScrapeTransport, TransportSettings,
};
use crate::{EngineEvent, FailureKind, TransportError};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub endpoints: ServerEndpoints,
    pub transport: TransportSettings,
    pub export: ExportSettings,
}

enum EngineCommand {
    Scrape { url: String },
    Export { payload: Value },
}

/// Runs scrape and export requests on a background tokio runtime.
///
/// Each scrape ends with exactly one `StreamFinished` or `StreamFailed` event,
/// after all of its `StreamText` events.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new(config.endpoints.clone(), &config.transport)?;
        let exporter = ReqwestExporter::new(config.endpoints, &config.transport, config.export)?;
        Ok(Self::with_backends(Arc::new(transport), Arc::new(exporter)))
    }

    pub fn with_backends(
        transport: Arc<dyn ScrapeTransport>,
        exporter: Arc<dyn Exporter>,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                let transport = transport.clone();
                let exporter = exporter.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(supervise(transport, exporter, command, event_tx));
            }
        });

        Self { cmd_tx, event_rx }
    }

    pub fn scrape(&self, url: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Scrape { url: url.into() });
    }

    pub fn export(&self, payload: Value) {
        let _ = self.cmd_tx.send(EngineCommand::Export { payload });
    }

    /// Wait up to `timeout` for the next event. `Ok(None)` means nothing
    /// arrived in time; `Err` means the engine thread is gone.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<EngineEvent>, EngineStopped> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(EngineStopped),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("scrape engine stopped")]
pub struct EngineStopped;

/// Runs one command in its own task so a panicking backend still yields the
/// terminal event its caller is waiting for.
async fn supervise(
    transport: Arc<dyn ScrapeTransport>,
    exporter: Arc<dyn Exporter>,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let is_scrape = matches!(command, EngineCommand::Scrape { .. });
    let task_tx = event_tx.clone();
    let task = tokio::spawn(async move {
        handle_command(transport.as_ref(), exporter.as_ref(), command, task_tx).await;
    });

    let Err(err) = task.await else {
        return;
    };
    scrape_error!("Engine task ended abnormally: {}", err);
    let event = if is_scrape {
        EngineEvent::StreamFailed(TransportError::new(FailureKind::Aborted, err.to_string()))
    } else {
        EngineEvent::ExportFinished(Err(ExportError::Aborted(err.to_string())))
    };
    let _ = event_tx.send(event);
}

async fn handle_command(
    transport: &dyn ScrapeTransport,
    exporter: &dyn Exporter,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Scrape { url } => {
            let sink = ChannelEventSink::new(event_tx.clone());
            let event = match transport.stream_scrape(&url, &sink).await {
                Ok(summary) => {
                    scrape_info!(
                        "Scrape stream closed: {} chunks, {} bytes",
                        summary.chunks,
                        summary.bytes
                    );
                    EngineEvent::StreamFinished(summary)
                }
                Err(err) => {
                    scrape_error!("Scrape of {} failed: {}", url, err);
                    EngineEvent::StreamFailed(err)
                }
            };
            sink.emit(event);
        }
        EngineCommand::Export { payload } => {
            let result = exporter.export(&payload).await;
            if let Err(err) = &result {
                scrape_error!("Export failed: {}", err);
            }
            let _ = event_tx.send(EngineEvent::ExportFinished(result));
        }
    }
}
