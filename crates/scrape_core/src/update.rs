use scrape_logging::scrape_warn;

use crate::{AppState, Effect, Msg, ScrapeRejection};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_url_input(text);
            Vec::new()
        }
        Msg::ScrapeClicked => match state.begin_scrape() {
            Ok(request) => vec![Effect::StartScrape(request)],
            // An empty input is a silent no-op.
            Err(ScrapeRejection::EmptyUrl) => Vec::new(),
            Err(rejection) => {
                scrape_warn!("Scrape request rejected: {}", rejection);
                vec![Effect::ScrapeRejected(rejection)]
            }
        },
        Msg::StreamText(chunk) => {
            state.apply_stream_text(&chunk);
            Vec::new()
        }
        Msg::StreamFinished => {
            state.finish_stream();
            Vec::new()
        }
        Msg::StreamFailed(reason) => {
            state.fail_stream(&reason);
            Vec::new()
        }
        Msg::DownloadClicked => match state.structured_data() {
            Some(payload) => vec![Effect::ExportCsv {
                payload: payload.clone(),
            }],
            None => Vec::new(),
        },
        Msg::ExportSaved(path) => {
            state.record_export(path);
            Vec::new()
        }
        Msg::ExportFailed(reason) => {
            state.fail_export(&reason);
            Vec::new()
        }
    };

    (state, effects)
}
