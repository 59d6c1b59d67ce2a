use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the URL input.
    InputChanged(String),
    /// User triggered a scrape of the current input.
    ScrapeClicked,
    /// Engine decoded another piece of the scrape stream.
    StreamText(String),
    /// The scrape stream closed normally.
    StreamFinished,
    /// The scrape request or stream failed; carries the transport error text for logs.
    StreamFailed(String),
    /// User asked for the CSV export.
    DownloadClicked,
    /// Engine saved the exported CSV.
    ExportSaved(PathBuf),
    /// Engine failed to fetch or save the CSV.
    ExportFailed(String),
}
