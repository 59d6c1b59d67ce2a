use std::io::{self, BufRead, Stdout, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use scrape_core::{update, AppState, Msg};
use scrape_engine::EngineHandle;
use scrape_logging::{scrape_debug, scrape_info, LogDestination};

use super::cli::Args;
use super::config::{ClientConfig, DEFAULT_CONFIG_FILENAME};
use super::effects::EffectRunner;
use super::report::{build_report, write_report};
use super::terminal::TerminalRenderer;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub fn run_app() -> anyhow::Result<()> {
    let args = Args::parse();

    let source = ClientConfig::locate(args.config.as_deref(), Path::new(DEFAULT_CONFIG_FILENAME));
    let mut config = ClientConfig::load(source.as_deref())?;
    config.apply_args(&args);
    let level = config.level_filter()?;
    let destination = match &config.log_file {
        Some(path) => LogDestination::File(path.clone()),
        None => LogDestination::Terminal,
    };
    scrape_logging::initialize(destination, level);
    match &source {
        Some(path) => scrape_info!("Loaded config from {:?}", path),
        None => scrape_debug!("No config file found; using defaults"),
    }

    let engine = EngineHandle::new(config.engine_config()?)
        .context("failed to create HTTP client")?;

    let url = match args.url.clone() {
        Some(url) => url,
        None => prompt_for_url()?,
    };

    let mut session = Session {
        state: AppState::new(),
        runner: EffectRunner::new(engine),
        renderer: TerminalRenderer::new(io::stdout(), config.panel_preview_bytes),
    };

    session.dispatch(Msg::InputChanged(url))?;
    session.dispatch(Msg::ScrapeClicked)?;
    if !session.state.is_loading() {
        println!("No URL entered.");
        return Ok(());
    }
    session.run_until(|state| !state.is_loading())?;

    let view = session.state.view();
    if view.download_enabled && !args.no_export {
        session.dispatch(Msg::DownloadClicked)?;
        session.wait_for_export()?;
    }

    let view = session.state.view();
    if let Some(path) = &view.last_export {
        println!("CSV saved to {}", path.display());
    }
    if let Some(report_path) = &args.report {
        let generated = chrono::Utc::now().to_rfc3339();
        let written = write_report(report_path, &build_report(&view, &generated))?;
        println!("Report written to {}", written.display());
    }

    Ok(())
}

struct Session {
    state: AppState,
    runner: EffectRunner,
    renderer: TerminalRenderer<Stdout>,
}

impl Session {
    fn dispatch(&mut self, msg: Msg) -> anyhow::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let ops = state.take_render_ops();
        self.state = state;
        self.renderer
            .apply_all(&ops)
            .context("failed to write to terminal")?;
        self.runner.enqueue(effects);
        Ok(())
    }

    /// Feed engine events into the state machine until `done` holds.
    fn run_until(&mut self, done: impl Fn(&AppState) -> bool) -> anyhow::Result<()> {
        while !done(&self.state) {
            if let Some(msg) = self.runner.next_msg(POLL_INTERVAL)? {
                self.dispatch(msg)?;
            }
        }
        Ok(())
    }

    fn wait_for_export(&mut self) -> anyhow::Result<()> {
        loop {
            let Some(msg) = self.runner.next_msg(POLL_INTERVAL)? else {
                continue;
            };
            let finished = matches!(msg, Msg::ExportSaved(_) | Msg::ExportFailed(_));
            self.dispatch(msg)?;
            if finished {
                scrape_info!("Export round-trip complete");
                return Ok(());
            }
        }
    }
}

fn prompt_for_url() -> anyhow::Result<String> {
    print!("Please enter the hotel website URL: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read URL from stdin")?;
    Ok(line.trim().to_string())
}
