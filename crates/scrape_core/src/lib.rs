//! Scrape client core: pure state machine, stream event parsing and render planning.
mod effect;
mod escape;
mod event;
mod msg;
mod render;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use escape::escape_html;
pub use event::{parse_line, EventParser, ParseError, ProgressEvent, Step, StreamEvent, DATA_PREFIX};
pub use msg::Msg;
pub use render::{plan_event, Panels, RenderOp};
pub use state::{
    AppState, ScrapeRejection, ScrapeRequest, SessionState, EXPORT_ERROR_MESSAGE,
    TRANSPORT_ERROR_MESSAGE,
};
pub use update::update;
pub use view_model::AppViewModel;
