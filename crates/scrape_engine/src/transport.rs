use std::sync::mpsc;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use scrape_logging::{scrape_debug, scrape_info};
use serde_json::json;

use crate::decode::StreamDecoder;
use crate::endpoints::ServerEndpoints;
use crate::types::map_reqwest_error;
use crate::{EngineEvent, FailureKind, StreamSummary, TransportError};

#[derive(Debug, Clone)]
pub struct TransportSettings {
    pub connect_timeout: Duration,
    /// Whole-request deadline. `None` lets a stream run until the server closes it.
    pub request_timeout: Option<Duration>,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
        }
    }
}

impl TransportSettings {
    pub(crate) fn build_client(&self) -> Result<reqwest::Client, TransportError> {
        let mut builder = reqwest::Client::builder().connect_timeout(self.connect_timeout);
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|err| TransportError::new(FailureKind::Network, err.to_string()))
    }
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[async_trait::async_trait]
pub trait ScrapeTransport: Send + Sync {
    /// Stream the scrape of `url`, emitting `EngineEvent::StreamText` per decoded chunk.
    async fn stream_scrape(
        &self,
        url: &str,
        sink: &dyn EventSink,
    ) -> Result<StreamSummary, TransportError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    endpoints: ServerEndpoints,
}

impl ReqwestTransport {
    pub fn new(
        endpoints: ServerEndpoints,
        settings: &TransportSettings,
    ) -> Result<Self, TransportError> {
        Ok(Self {
            client: settings.build_client()?,
            endpoints,
        })
    }
}

#[async_trait::async_trait]
impl ScrapeTransport for ReqwestTransport {
    async fn stream_scrape(
        &self,
        url: &str,
        sink: &dyn EventSink,
    ) -> Result<StreamSummary, TransportError> {
        let body = json!({ "url": url }).to_string();
        let response = self
            .client
            .post(self.endpoints.scrape_url().clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "text/event-stream")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let mut decoder = StreamDecoder::for_content_type(content_type.as_deref());
        scrape_info!(
            "Scrape stream opened url={} encoding={}",
            url,
            decoder.encoding_name()
        );

        let mut summary = StreamSummary {
            encoding: decoder.encoding_name().to_string(),
            ..StreamSummary::default()
        };
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            summary.bytes += chunk.len() as u64;
            summary.chunks += 1;
            scrape_debug!(
                "Stream chunk #{} {} bytes (total {})",
                summary.chunks,
                chunk.len(),
                summary.bytes
            );
            let text = decoder.decode(&chunk);
            if !text.is_empty() {
                sink.emit(EngineEvent::StreamText(text));
            }
        }

        let tail = decoder.finish();
        if !tail.is_empty() {
            sink.emit(EngineEvent::StreamText(tail));
        }
        Ok(summary)
    }
}
