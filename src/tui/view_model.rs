use ratatui::style::Color;

use crate::log_store::{LogLine, LogStore};
use crate::process_manager::ProcessSupervisor;

use super::layout::max_scroll;
use super::state::{Mode, ViewState};
use super::terminal_text::filter_lines;

pub(crate) struct PaneModel {
    pub(crate) name: String,
    pub(crate) lines: Vec<LogLine>,
    pub(crate) scroll: usize,
    pub(crate) running: bool,
    pub(crate) color: Color,
}

/// Per-frame snapshot of everything rendering needs. Building it is also
/// where auto-scroll recomputation and offset clamping happen, so every
/// offset the renderer sees is already within bounds.
pub(crate) struct FrameModel {
    /// Filtered snapshot of the active tab (Normal/Filter modes).
    pub(crate) tab_lines: Vec<LogLine>,
    pub(crate) filtered_total: usize,
    pub(crate) tab_max_scroll: usize,
    /// One entry per split pane, in snapshot order (Split mode).
    pub(crate) panes: Vec<PaneModel>,
    /// Bound for scroll keys: the active tab's max in Normal/Filter, the
    /// active pane's max in Split.
    pub(crate) active_max_scroll: usize,
}

pub(crate) fn build_frame_model(
    state: &mut ViewState,
    store: &LogStore,
    supervisor: &ProcessSupervisor,
) -> FrameModel {
    match state.mode {
        Mode::Split => build_split_model(state, store, supervisor),
        Mode::Normal | Mode::Filter => build_tab_model(state, store),
    }
}

fn build_tab_model(state: &mut ViewState, store: &LogStore) -> FrameModel {
    let raw = if state.is_all_tab() {
        store.global_lines()
    } else {
        store.lines_for(state.active_tab_name())
    };
    let tab_lines = filter_lines(&raw, &state.filter_text);
    let filtered_total = tab_lines.len();
    let max = max_scroll(filtered_total, state.visible_log_lines());
    state.scroll_offset = if state.auto_scroll {
        max
    } else {
        state.scroll_offset.min(max)
    };
    FrameModel {
        tab_lines,
        filtered_total,
        tab_max_scroll: max,
        panes: Vec::new(),
        active_max_scroll: max,
    }
}

fn build_split_model(
    state: &mut ViewState,
    store: &LogStore,
    supervisor: &ProcessSupervisor,
) -> FrameModel {
    let body_rows = state.split_body_rows();
    let mut active_max_scroll = 0usize;
    let panes = state
        .split_panes
        .clone()
        .into_iter()
        .enumerate()
        .map(|(index, name)| {
            let lines = store.lines_for(&name);
            let max = max_scroll(lines.len(), body_rows);
            let stored = state.pane_scrolls.get(&name).copied().unwrap_or(0);
            let scroll = if state.auto_scroll { max } else { stored.min(max) };
            state.pane_scrolls.insert(name.clone(), scroll);
            if index == state.active_pane {
                active_max_scroll = max;
            }
            PaneModel {
                running: supervisor.is_running(&name),
                color: supervisor.process_color(&name),
                name,
                lines,
                scroll,
            }
        })
        .collect();
    FrameModel {
        tab_lines: Vec::new(),
        filtered_total: 0,
        tab_max_scroll: 0,
        panes,
        active_max_scroll,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_store::LogStore;

    fn seeded_store(process: &str, count: usize) -> LogStore {
        let store = LogStore::new();
        for index in 0..count {
            store.append(LogLine::output(
                process,
                format!("line-{index}"),
                Color::Cyan,
                Color::Black,
            ));
        }
        store
    }

    fn state_for(names: &[&str]) -> ViewState {
        let names: Vec<String> = names.iter().map(|name| (*name).to_owned()).collect();
        let mut state = ViewState::new(&names, None);
        state.width = 80;
        state.height = 15;
        state
    }

    #[test]
    fn auto_scroll_pins_the_tab_offset_to_the_bottom() {
        let store = seeded_store("web", 50);
        let supervisor = ProcessSupervisor::new(store.clone());
        let mut state = state_for(&["web"]);
        state.select_tab(1);

        let model = build_frame_model(&mut state, &store, &supervisor);
        assert_eq!(
            state.scroll_offset,
            50 - state.visible_log_lines()
        );
        assert_eq!(model.active_max_scroll, state.scroll_offset);
    }

    #[test]
    fn manual_offsets_are_clamped_to_the_filtered_length() {
        let store = seeded_store("web", 50);
        let supervisor = ProcessSupervisor::new(store.clone());
        let mut state = state_for(&["web"]);
        state.select_tab(1);
        state.auto_scroll = false;
        state.scroll_offset = 9999;
        state.filter_text = "line-1".to_owned();

        let model = build_frame_model(&mut state, &store, &supervisor);
        // line-1 and line-10..line-19 survive the filter.
        assert_eq!(model.filtered_total, 11);
        assert!(state.scroll_offset <= model.tab_max_scroll);
        assert_eq!(model.tab_max_scroll, max_scroll(11, state.visible_log_lines()));
    }

    #[test]
    fn auto_scroll_pins_every_split_pane() {
        let store = seeded_store("web", 40);
        for index in 0..5 {
            store.append(LogLine::output(
                "worker",
                format!("w-{index}"),
                Color::Cyan,
                Color::Black,
            ));
        }
        let supervisor = ProcessSupervisor::new(store.clone());
        let mut state = state_for(&["web", "worker"]);
        state.enter_split();

        build_frame_model(&mut state, &store, &supervisor);
        let body_rows = state.split_body_rows();
        assert_eq!(state.pane_scrolls["web"], max_scroll(40, body_rows));
        assert_eq!(state.pane_scrolls["worker"], max_scroll(5, body_rows));
    }

    #[test]
    fn split_model_reports_the_active_pane_bound() {
        let store = seeded_store("web", 40);
        let supervisor = ProcessSupervisor::new(store.clone());
        let mut state = state_for(&["web", "worker"]);
        state.enter_split();
        state.auto_scroll = false;

        let model = build_frame_model(&mut state, &store, &supervisor);
        assert_eq!(
            model.active_max_scroll,
            max_scroll(40, state.split_body_rows())
        );
        assert_eq!(model.panes.len(), 2);
        assert_eq!(model.panes[1].lines.len(), 0);
    }
}
