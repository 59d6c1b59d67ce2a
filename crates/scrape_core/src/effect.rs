use serde_json::Value;

use crate::{ScrapeRejection, ScrapeRequest};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    StartScrape(ScrapeRequest),
    /// A scrape was requested but not started.
    ScrapeRejected(ScrapeRejection),
    ExportCsv { payload: Value },
}
