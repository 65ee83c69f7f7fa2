use std::io;
use std::path::Path;

use crossterm::event::{self, Event, KeyEventKind};

use crate::log_store::LogStore;
use crate::manifest::{self, ProcessDefinition};
use crate::process_manager::ProcessSupervisor;

mod config;
mod events;
mod layout;
mod lifecycle;
mod render;
mod state;
mod terminal_text;
mod view_model;

use config::TICK_INTERVAL;
use events::{handle_key, LoopControl};
use state::ViewState;
use view_model::build_frame_model;

#[derive(Debug)]
pub enum DashboardError {
    Io(io::Error),
}

impl std::fmt::Display for DashboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DashboardError::Io(error) => write!(f, "terminal error: {error}"),
        }
    }
}

impl std::error::Error for DashboardError {}

impl From<io::Error> for DashboardError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Runs the dashboard until the operator quits. Manifest problems do not
/// return an error: they become a resident error screen, and the session
/// still ends through the normal quit path.
pub fn run_dashboard(procfile: &Path) -> Result<(), DashboardError> {
    let (definitions, startup_error) = match manifest::parse_file(procfile) {
        Ok(definitions) => (definitions, None),
        Err(error) => (Vec::new(), Some(error.to_string())),
    };

    let store = LogStore::new();
    let supervisor = ProcessSupervisor::new(store.clone());
    let names: Vec<String> = definitions
        .iter()
        .map(|definition| definition.name.clone())
        .collect();
    let mut state = ViewState::new(&names, startup_error);

    supervisor.start_all(&definitions);

    let mut terminal = lifecycle::init_terminal()?;
    let size = terminal.size()?;
    state.width = size.width;
    state.height = size.height;

    run_event_loop(&mut terminal, &mut state, &store, &supervisor, &definitions)?;

    lifecycle::shutdown_and_render_summary(&mut terminal, &supervisor)?;
    Ok(())
}

fn run_event_loop(
    terminal: &mut lifecycle::TuiTerminal,
    state: &mut ViewState,
    store: &LogStore,
    supervisor: &ProcessSupervisor,
    definitions: &[ProcessDefinition],
) -> Result<(), DashboardError> {
    loop {
        let model = build_frame_model(state, store, supervisor);
        terminal.draw(|frame| render::render_ui(frame, state, &model, supervisor))?;

        if !event::poll(TICK_INTERVAL)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let LoopControl::Quit =
                    handle_key(&key, state, supervisor, definitions, model.active_max_scroll)
                {
                    return Ok(());
                }
            }
            Event::Resize(width, height) => {
                state.width = width;
                state.height = height;
            }
            _ => {}
        }
    }
}
