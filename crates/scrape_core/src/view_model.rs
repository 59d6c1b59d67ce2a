use std::path::PathBuf;

use crate::SessionState;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub session: SessionState,
    pub is_loading: bool,
    /// The scrape trigger is disabled while a stream is being read.
    pub scrape_enabled: bool,
    pub url_input: String,
    pub raw_content_html: String,
    pub analysis_html: String,
    pub results_log: Vec<String>,
    pub download_enabled: bool,
    pub last_export: Option<PathBuf>,
}
