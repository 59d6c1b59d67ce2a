use std::path::PathBuf;

use scrape_logging::{scrape_debug, scrape_info, scrape_warn};
use serde_json::Value;

use crate::event::{EventParser, ParseError, StreamEvent};
use crate::render::{plan_event, Panels, RenderOp};
use crate::view_model::AppViewModel;

/// Shown when the scrape request or its stream fails.
pub const TRANSPORT_ERROR_MESSAGE: &str = "An error occurred while analyzing the URL";
/// Shown when the CSV export fails.
pub const EXPORT_ERROR_MESSAGE: &str = "Failed to download CSV file";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Loading,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeRequest {
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScrapeRejection {
    #[error("no URL entered")]
    EmptyUrl,
    #[error("a scrape is already in progress")]
    AlreadyInProgress,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    session: SessionState,
    url_input: String,
    panels: Panels,
    structured_data: Option<Value>,
    parser: EventParser,
    pending_ops: Vec<RenderOp>,
    last_export: Option<PathBuf>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let is_loading = self.session == SessionState::Loading;
        AppViewModel {
            session: self.session,
            is_loading,
            scrape_enabled: !is_loading,
            url_input: self.url_input.clone(),
            raw_content_html: self.panels.raw_content_html().to_string(),
            analysis_html: self.panels.analysis_html().to_string(),
            results_log: self.panels.results_log().to_vec(),
            download_enabled: self.structured_data.is_some(),
            last_export: self.last_export.clone(),
        }
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn is_loading(&self) -> bool {
        self.session == SessionState::Loading
    }

    pub fn structured_data(&self) -> Option<&Value> {
        self.structured_data.as_ref()
    }

    pub fn panels(&self) -> &Panels {
        &self.panels
    }

    /// Drain the render instructions produced since the last call, in order.
    pub fn take_render_ops(&mut self) -> Vec<RenderOp> {
        std::mem::take(&mut self.pending_ops)
    }

    pub(crate) fn set_url_input(&mut self, text: String) {
        self.url_input = text;
    }

    /// Accept a new scrape for the current input, clearing the previous run.
    pub(crate) fn begin_scrape(&mut self) -> Result<ScrapeRequest, ScrapeRejection> {
        let url = self.url_input.trim();
        if url.is_empty() {
            return Err(ScrapeRejection::EmptyUrl);
        }
        if self.is_loading() {
            return Err(ScrapeRejection::AlreadyInProgress);
        }

        let request = ScrapeRequest {
            url: url.to_string(),
        };
        self.session = SessionState::Loading;
        self.structured_data = None;
        self.parser.reset();
        self.render(RenderOp::SetLoading(true));
        self.render(RenderOp::ClearAll);
        scrape_info!("Scrape accepted url={}", request.url);
        Ok(request)
    }

    pub(crate) fn apply_stream_text(&mut self, chunk: &str) {
        if !self.is_loading() {
            scrape_debug!("Ignoring {} bytes of stream text while idle", chunk.len());
            return;
        }
        for result in self.parser.push(chunk) {
            self.apply_parsed(result);
        }
    }

    pub(crate) fn finish_stream(&mut self) {
        if !self.is_loading() {
            return;
        }
        if let Some(result) = self.parser.finish() {
            self.apply_parsed(result);
        }
        self.end_loading();
        scrape_info!(
            "Scrape stream finished; structured data {}",
            if self.structured_data.is_some() {
                "received"
            } else {
                "missing"
            }
        );
    }

    pub(crate) fn fail_stream(&mut self, reason: &str) {
        if !self.is_loading() {
            return;
        }
        scrape_warn!("Scrape stream failed: {}", reason);
        self.parser.reset();
        self.end_loading();
        self.render(RenderOp::AppendError(TRANSPORT_ERROR_MESSAGE.to_string()));
    }

    pub(crate) fn apply_event(&mut self, event: StreamEvent) {
        let ops = plan_event(&event);
        match event {
            StreamEvent::Final { structured_data } if !structured_data.is_null() => {
                self.structured_data = Some(structured_data);
            }
            StreamEvent::Final { .. } => {
                scrape_warn!("Final record carried no structured data");
            }
            StreamEvent::Error { ref error } => {
                scrape_info!("Server reported error: {}", error);
            }
            StreamEvent::Progress(ref progress) => {
                scrape_debug!("Progress step={} url={}", progress.step, progress.url);
            }
        }
        for op in ops {
            self.render(op);
        }
    }

    pub(crate) fn record_export(&mut self, path: PathBuf) {
        scrape_info!("CSV saved to {:?}", path);
        self.last_export = Some(path);
    }

    pub(crate) fn fail_export(&mut self, reason: &str) {
        scrape_warn!("CSV export failed: {}", reason);
        self.render(RenderOp::AppendError(EXPORT_ERROR_MESSAGE.to_string()));
    }

    fn apply_parsed(&mut self, result: Result<StreamEvent, ParseError>) {
        match result {
            Ok(event) => self.apply_event(event),
            Err(err) => scrape_warn!("Skipping stream record: {}", err),
        }
    }

    fn end_loading(&mut self) {
        self.session = SessionState::Idle;
        self.render(RenderOp::SetLoading(false));
    }

    fn render(&mut self, op: RenderOp) {
        self.panels.apply(&op);
        self.pending_ops.push(op);
    }
}
