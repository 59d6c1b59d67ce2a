//! Terminal front-end: wires the core state machine to the engine.
mod app;
mod cli;
mod config;
mod effects;
mod report;
mod terminal;

pub use app::run_app;
