use std::io::{self, Write};

use scrape_core::RenderOp;

const TRUNCATED_MARKER: &str = "\n.[truncated]";

/// Applies render instructions as plain terminal text.
pub struct TerminalRenderer<W: Write> {
    out: W,
    panel_limit: usize,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, panel_limit: usize) -> Self {
        Self { out, panel_limit }
    }

    pub fn apply_all(&mut self, ops: &[RenderOp]) -> io::Result<()> {
        for op in ops {
            self.apply(op)?;
        }
        self.out.flush()
    }

    pub fn apply(&mut self, op: &RenderOp) -> io::Result<()> {
        match op {
            RenderOp::ClearAll => Ok(()),
            RenderOp::SetLoading(true) => writeln!(self.out, "Analyzing..."),
            RenderOp::SetLoading(false) => writeln!(self.out, "Finished."),
            RenderOp::AppendStep { step, url } => writeln!(
                self.out,
                "Step {}\n  {}",
                sanitize(step),
                sanitize(url)
            ),
            RenderOp::AppendError(message) => writeln!(self.out, "Error: {}", sanitize(message)),
            RenderOp::ReplaceRawContent(text) => self.panel("Raw content", text),
            RenderOp::ReplaceAnalysis(text) => self.panel("Analysis", text),
            RenderOp::SetDownloadVisible(true) => {
                writeln!(self.out, "Structured data received; CSV export available.")
            }
            RenderOp::SetDownloadVisible(false) => Ok(()),
            RenderOp::ScrollResultsToEnd => self.out.flush(),
        }
    }

    fn panel(&mut self, title: &str, text: &str) -> io::Result<()> {
        writeln!(self.out, "--- {title} ---")?;
        writeln!(self.out, "{}", preview(&sanitize(text), self.panel_limit))?;
        writeln!(self.out, "--- end {} ---", title.to_lowercase())
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

/// Replace control characters other than newline and tab, so server text cannot
/// drive the terminal.
fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_control() && c != '\n' && c != '\t' {
                '\u{FFFD}'
            } else {
                c
            }
        })
        .collect()
}

fn preview(text: &str, limit: usize) -> String {
    if text.len() <= limit {
        return text.to_string();
    }
    let mut end = limit;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{TRUNCATED_MARKER}", &text[..end])
}
