use std::path::PathBuf;

use reqwest::header::CONTENT_TYPE;
use scrape_logging::scrape_info;
use serde_json::Value;

use crate::endpoints::ServerEndpoints;
use crate::persist::{AtomicFileWriter, PersistError};
use crate::transport::TransportSettings;
use crate::TransportError;

pub const DEFAULT_CSV_FILENAME: &str = "hotel_rooms.csv";

#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub output_dir: PathBuf,
    pub filename: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            filename: DEFAULT_CSV_FILENAME.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("export request failed: {0}")]
    Request(#[from] TransportError),
    #[error("export endpoint returned http status {0}")]
    HttpStatus(u16),
    #[error("failed to save export: {0}")]
    Persist(#[from] PersistError),
    #[error("export task aborted: {0}")]
    Aborted(String),
}

#[async_trait::async_trait]
pub trait Exporter: Send + Sync {
    /// Submit the structured payload and save the returned body; returns the saved path.
    async fn export(&self, payload: &Value) -> Result<PathBuf, ExportError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestExporter {
    client: reqwest::Client,
    endpoints: ServerEndpoints,
    settings: ExportSettings,
}

impl ReqwestExporter {
    pub fn new(
        endpoints: ServerEndpoints,
        transport: &TransportSettings,
        settings: ExportSettings,
    ) -> Result<Self, TransportError> {
        Ok(Self {
            client: transport.build_client()?,
            endpoints,
            settings,
        })
    }
}

#[async_trait::async_trait]
impl Exporter for ReqwestExporter {
    async fn export(&self, payload: &Value) -> Result<PathBuf, ExportError> {
        let response = self
            .client
            .post(self.endpoints.export_url().clone())
            .header(CONTENT_TYPE, "application/json")
            .body(payload.to_string())
            .send()
            .await
            .map_err(crate::types::map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExportError::HttpStatus(status.as_u16()));
        }

        // The body is opaque; it is saved byte for byte.
        let blob = response
            .bytes()
            .await
            .map_err(crate::types::map_reqwest_error)?;

        let writer = AtomicFileWriter::new(self.settings.output_dir.clone());
        let path = writer.write(&self.settings.filename, &blob)?;
        scrape_info!("Export saved {} bytes to {:?}", blob.len(), path);
        Ok(path)
    }
}
