use crate::escape::escape_html;
use crate::event::StreamEvent;

/// A single change to the display regions. Text carried here is raw; each
/// render target escapes it for its own output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOp {
    /// Empty all three regions and hide the export control.
    ClearAll,
    SetLoading(bool),
    AppendStep { step: String, url: String },
    AppendError(String),
    ReplaceRawContent(String),
    ReplaceAnalysis(String),
    SetDownloadVisible(bool),
    ScrollResultsToEnd,
}

/// Plan the render instructions for one stream event.
pub fn plan_event(event: &StreamEvent) -> Vec<RenderOp> {
    match event {
        StreamEvent::Error { error } => vec![RenderOp::AppendError(error.clone())],
        StreamEvent::Final { structured_data } => {
            if structured_data.is_null() {
                Vec::new()
            } else {
                vec![RenderOp::SetDownloadVisible(true)]
            }
        }
        StreamEvent::Progress(progress) => {
            let mut ops = vec![RenderOp::AppendStep {
                step: progress.step.to_string(),
                url: progress.url.clone(),
            }];
            if let Some(raw) = progress.raw_content.as_ref().filter(|s| !s.is_empty()) {
                ops.push(RenderOp::ReplaceRawContent(raw.clone()));
            }
            if let Some(analysis) = progress.analysis.as_ref().filter(|s| !s.is_empty()) {
                ops.push(RenderOp::ReplaceAnalysis(analysis.clone()));
            }
            ops.push(RenderOp::ScrollResultsToEnd);
            ops
        }
    }
}

/// Markup state of the display regions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Panels {
    raw_content_html: String,
    analysis_html: String,
    results_log: Vec<String>,
    loading_visible: bool,
    download_visible: bool,
    scroll_offset: usize,
}

impl Panels {
    pub fn apply(&mut self, op: &RenderOp) {
        match op {
            RenderOp::ClearAll => {
                self.raw_content_html.clear();
                self.analysis_html.clear();
                self.results_log.clear();
                self.download_visible = false;
                self.scroll_offset = 0;
            }
            RenderOp::SetLoading(visible) => self.loading_visible = *visible,
            RenderOp::AppendStep { step, url } => {
                self.results_log.push(format!(
                    "<div class=\"step-indicator\">Step {}</div>\n<div class=\"url-display\">{}</div>",
                    escape_html(step),
                    escape_html(url)
                ));
            }
            RenderOp::AppendError(message) => {
                self.results_log.push(format!(
                    "<div class=\"error\">Error: {}</div>",
                    escape_html(message)
                ));
            }
            RenderOp::ReplaceRawContent(text) => {
                self.raw_content_html = code_block(text);
            }
            RenderOp::ReplaceAnalysis(text) => {
                self.analysis_html = code_block(text);
            }
            RenderOp::SetDownloadVisible(visible) => self.download_visible = *visible,
            RenderOp::ScrollResultsToEnd => self.scroll_offset = self.results_log.len(),
        }
    }

    pub fn raw_content_html(&self) -> &str {
        &self.raw_content_html
    }

    pub fn analysis_html(&self) -> &str {
        &self.analysis_html
    }

    pub fn results_log(&self) -> &[String] {
        &self.results_log
    }

    pub fn loading_visible(&self) -> bool {
        self.loading_visible
    }

    pub fn download_visible(&self) -> bool {
        self.download_visible
    }

    /// Index of the log entry the results view is scrolled to.
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }
}

fn code_block(text: &str) -> String {
    format!("<div class=\"code-text\">{}</div>", escape_html(text))
}
