use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::manifest::ProcessDefinition;
use crate::process_manager::ProcessSupervisor;

use super::state::{next_index, prev_index, Mode, ViewState};

pub(super) enum LoopControl {
    Continue,
    Quit,
}

/// The `(state, key) -> (state, control)` transition. `max_scroll` is the
/// bound for the active view, computed by the last frame model.
pub(super) fn handle_key(
    key: &KeyEvent,
    state: &mut ViewState,
    supervisor: &ProcessSupervisor,
    definitions: &[ProcessDefinition],
    max_scroll: usize,
) -> LoopControl {
    if state.startup_error.is_some() {
        return handle_error_key(key, supervisor);
    }
    match state.mode {
        Mode::Filter => handle_filter_key(key, state, supervisor),
        Mode::Split => handle_split_key(key, state, supervisor, max_scroll),
        Mode::Normal => handle_normal_key(key, state, supervisor, definitions, max_scroll),
    }
}

fn quit(supervisor: &ProcessSupervisor) -> LoopControl {
    supervisor.stop_all();
    LoopControl::Quit
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c'))
}

fn handle_error_key(key: &KeyEvent, supervisor: &ProcessSupervisor) -> LoopControl {
    if is_interrupt(key) || matches!(key.code, KeyCode::Char('q')) {
        return quit(supervisor);
    }
    LoopControl::Continue
}

fn handle_normal_key(
    key: &KeyEvent,
    state: &mut ViewState,
    supervisor: &ProcessSupervisor,
    definitions: &[ProcessDefinition],
    max_scroll: usize,
) -> LoopControl {
    if is_interrupt(key) {
        return quit(supervisor);
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('u') => {
                state.auto_scroll = false;
                state.scroll_offset = state.scroll_offset.saturating_sub(state.visible_log_lines());
            }
            KeyCode::Char('d') => {
                state.scroll_offset = state
                    .scroll_offset
                    .saturating_add(state.visible_log_lines())
                    .min(max_scroll);
                state.auto_scroll = state.scroll_offset >= max_scroll;
            }
            _ => {}
        }
        return LoopControl::Continue;
    }
    match key.code {
        KeyCode::Char('q') => return quit(supervisor),
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => {
            state.select_tab(next_index(state.active_tab, state.tabs.len()));
        }
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => {
            state.select_tab(prev_index(state.active_tab, state.tabs.len()));
        }
        KeyCode::Char(digit @ '0'..='9') => {
            let index = digit as usize - '0' as usize;
            if index < state.tabs.len() {
                state.select_tab(index);
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.auto_scroll = false;
            state.scroll_offset = state.scroll_offset.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.scroll_offset = state.scroll_offset.saturating_add(1).min(max_scroll);
            state.auto_scroll = state.scroll_offset >= max_scroll;
        }
        KeyCode::PageUp => {
            state.auto_scroll = false;
            state.scroll_offset = state.scroll_offset.saturating_sub(state.visible_log_lines());
        }
        KeyCode::PageDown => {
            state.scroll_offset = state
                .scroll_offset
                .saturating_add(state.visible_log_lines())
                .min(max_scroll);
            state.auto_scroll = state.scroll_offset >= max_scroll;
        }
        KeyCode::Home | KeyCode::Char('g') => {
            state.auto_scroll = false;
            state.scroll_offset = 0;
        }
        KeyCode::End | KeyCode::Char('G') => {
            state.auto_scroll = true;
            state.scroll_offset = max_scroll;
        }
        KeyCode::Char('/') => {
            state.mode = Mode::Filter;
            state.filter_text.clear();
        }
        KeyCode::Esc => {
            state.filter_text.clear();
        }
        KeyCode::Char('a') => {
            state.auto_scroll = !state.auto_scroll;
            if state.auto_scroll {
                state.scroll_offset = max_scroll;
            }
        }
        KeyCode::Char('v') => {
            state.enter_split();
        }
        KeyCode::Char('r') => {
            if !state.is_all_tab() {
                supervisor.restart(state.active_tab_name());
            }
        }
        KeyCode::Char('s') => {
            if !state.is_all_tab() {
                supervisor.stop(state.active_tab_name());
            }
        }
        KeyCode::Char('S') => {
            if !state.is_all_tab() {
                let name = state.active_tab_name().to_owned();
                if let Some(definition) = definitions
                    .iter()
                    .find(|definition| definition.name == name)
                {
                    supervisor.start(
                        &name,
                        &definition.command,
                        supervisor.process_color(&name),
                        supervisor.process_background(&name),
                    );
                }
            }
        }
        _ => {}
    }
    LoopControl::Continue
}

fn handle_filter_key(
    key: &KeyEvent,
    state: &mut ViewState,
    supervisor: &ProcessSupervisor,
) -> LoopControl {
    if is_interrupt(key) {
        return quit(supervisor);
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if matches!(key.code, KeyCode::Char('u')) {
            state.filter_text.clear();
        }
        return LoopControl::Continue;
    }
    match key.code {
        KeyCode::Enter | KeyCode::Esc => {
            state.mode = Mode::Normal;
        }
        KeyCode::Backspace => {
            state.filter_text.pop();
        }
        KeyCode::Char(ch) => {
            state.filter_text.push(ch);
        }
        _ => {}
    }
    LoopControl::Continue
}

fn handle_split_key(
    key: &KeyEvent,
    state: &mut ViewState,
    supervisor: &ProcessSupervisor,
    max_scroll: usize,
) -> LoopControl {
    if is_interrupt(key) {
        return quit(supervisor);
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('u') => {
                state.auto_scroll = false;
                state.scroll_active_pane_by(-(state.split_body_rows() as isize), max_scroll);
            }
            KeyCode::Char('d') => {
                state.scroll_active_pane_by(state.split_body_rows() as isize, max_scroll);
            }
            _ => {}
        }
        return LoopControl::Continue;
    }
    match key.code {
        KeyCode::Char('q') => return quit(supervisor),
        KeyCode::Char('v') | KeyCode::Esc => {
            if state.focused {
                state.focused = false;
            } else {
                state.leave_split();
            }
        }
        KeyCode::Char('f') => {
            state.focused = !state.focused;
        }
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => {
            state.active_pane = next_index(state.active_pane, state.split_panes.len());
        }
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => {
            state.active_pane = prev_index(state.active_pane, state.split_panes.len());
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.auto_scroll = false;
            state.scroll_active_pane_by(-1, max_scroll);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.scroll_active_pane_by(1, max_scroll);
        }
        KeyCode::PageUp => {
            state.auto_scroll = false;
            state.scroll_active_pane_by(-(state.split_body_rows() as isize), max_scroll);
        }
        KeyCode::PageDown => {
            state.scroll_active_pane_by(state.split_body_rows() as isize, max_scroll);
        }
        KeyCode::Char('a') => {
            state.auto_scroll = !state.auto_scroll;
        }
        KeyCode::Char('r') => {
            if let Some(name) = state.active_pane_name() {
                supervisor.restart(name);
            }
        }
        _ => {}
    }
    LoopControl::Continue
}
