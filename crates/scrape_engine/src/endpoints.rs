use url::Url;

use crate::types::{FailureKind, TransportError};

const SCRAPE_PATH: &str = "stream_scrape";
const EXPORT_PATH: &str = "download_csv";

/// Scrape and export endpoints resolved against the backend base URL.
///
/// A base with a path prefix (`http://host/app`) keeps it: endpoints become
/// `http://host/app/stream_scrape` and `http://host/app/download_csv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerEndpoints {
    scrape: Url,
    export: Url,
}

impl ServerEndpoints {
    pub fn parse(base: &str) -> Result<Self, TransportError> {
        let invalid = |err: url::ParseError| TransportError::new(FailureKind::InvalidUrl, err.to_string());

        let mut base = Url::parse(base.trim()).map_err(invalid)?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(TransportError::new(
                FailureKind::InvalidUrl,
                format!("unsupported scheme {}", base.scheme()),
            ));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            scrape: base.join(SCRAPE_PATH).map_err(invalid)?,
            export: base.join(EXPORT_PATH).map_err(invalid)?,
        })
    }

    pub fn scrape_url(&self) -> &Url {
        &self.scrape
    }

    pub fn export_url(&self) -> &Url {
        &self.export
    }
}
