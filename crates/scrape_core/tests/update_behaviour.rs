use std::sync::Once;

use scrape_core::{
    update, AppState, Effect, Msg, RenderOp, ScrapeRejection, ScrapeRequest, SessionState,
    TRANSPORT_ERROR_MESSAGE,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(scrape_logging::initialize_for_tests);
}

fn submit_url(state: AppState, input: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::InputChanged(input.to_string()));
    update(state, Msg::ScrapeClicked)
}

#[test]
fn scrape_trims_input_and_starts_loading() {
    init_logging();
    let (mut state, effects) = submit_url(AppState::new(), "  https://hotel.example  ");

    assert_eq!(
        effects,
        vec![Effect::StartScrape(ScrapeRequest {
            url: "https://hotel.example".to_string(),
        })]
    );
    let view = state.view();
    assert_eq!(view.session, SessionState::Loading);
    assert!(view.is_loading);
    assert!(!view.scrape_enabled);
    assert_eq!(
        state.take_render_ops(),
        vec![RenderOp::SetLoading(true), RenderOp::ClearAll]
    );
}

#[test]
fn empty_url_is_a_silent_noop() {
    init_logging();
    let (mut state, effects) = submit_url(AppState::new(), "   ");

    assert!(effects.is_empty());
    assert!(!state.view().is_loading);
    assert!(state.take_render_ops().is_empty());
    assert!(!state.panels().loading_visible());
}

#[test]
fn second_scrape_while_loading_is_rejected() {
    init_logging();
    let (state, _) = submit_url(AppState::new(), "https://a.example");
    let (state, _) = update(
        state,
        Msg::StreamText("data: {\"step\":1,\"url\":\"https://a.example\"}\n".to_string()),
    );

    let (state, effects) = submit_url(state, "https://b.example");

    assert_eq!(
        effects,
        vec![Effect::ScrapeRejected(ScrapeRejection::AlreadyInProgress)]
    );
    let view = state.view();
    assert!(view.is_loading);
    assert_eq!(view.url_input, "https://b.example");
    assert_eq!(view.results_log.len(), 1);
}

#[test]
fn loading_clears_on_stream_end() {
    init_logging();
    let (state, _) = submit_url(AppState::new(), "https://a.example");
    let (mut state, effects) = update(state, Msg::StreamFinished);

    assert!(effects.is_empty());
    assert!(!state.view().is_loading);
    assert!(state.view().scrape_enabled);
    assert_eq!(
        state.take_render_ops().last(),
        Some(&RenderOp::SetLoading(false))
    );
}

#[test]
fn loading_clears_on_stream_failure_with_generic_message() {
    init_logging();
    let (state, _) = submit_url(AppState::new(), "https://a.example");
    let (state, _) = update(
        state,
        Msg::StreamText("data: {\"step\":1,\"url\":\"https://a.example\"}\n".to_string()),
    );
    let (state, effects) = update(state, Msg::StreamFailed("connection reset".to_string()));

    assert!(effects.is_empty());
    let view = state.view();
    assert!(!view.is_loading);
    assert_eq!(view.results_log.len(), 2);
    assert!(view.results_log[1].contains(&format!("Error: {TRANSPORT_ERROR_MESSAGE}")));
    assert!(!view.results_log[1].contains("connection reset"));
}

#[test]
fn new_scrape_resets_previous_results() {
    init_logging();
    let (state, _) = submit_url(AppState::new(), "https://a.example");
    let (state, _) = update(
        state,
        Msg::StreamText(
            "data: {\"step\":1,\"url\":\"u\",\"raw_content\":\"old\"}\n\
             data: {\"step\":\"final\",\"structured_data\":{\"rooms\":[]}}\n"
                .to_string(),
        ),
    );
    let (state, _) = update(state, Msg::StreamFinished);
    assert!(state.view().download_enabled);

    let (state, effects) = update(state, Msg::ScrapeClicked);
    assert_eq!(effects.len(), 1);
    let view = state.view();
    assert!(view.results_log.is_empty());
    assert!(view.raw_content_html.is_empty());
    assert!(!view.download_enabled);
    assert!(state.structured_data().is_none());
}

#[test]
fn stream_text_while_idle_is_ignored() {
    init_logging();
    let state = AppState::new();
    let before = state.view();

    let (next, effects) = update(
        state,
        Msg::StreamText("data: {\"error\":\"stale\"}\n".to_string()),
    );

    assert_eq!(next.view(), before);
    assert!(effects.is_empty());
}
