use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::process_manager::ProcessSupervisor;

use super::super::state::{Mode, ViewState, TAB_ALL};
use super::super::view_model::FrameModel;
use super::{ACCENT_BG, MUTED, RUNNING_FG, STOPPED_FG, TEXT_DARK, TITLE_BG, TITLE_FG};

/// Title row: app name, running count, mode label, and a right-aligned
/// Lines / Scroll% / AUTO status for the active view.
pub(super) fn render_header(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &ViewState,
    model: &FrameModel,
    supervisor: &ProcessSupervisor,
) {
    let muted = Style::default().fg(MUTED);
    let mut left = vec![
        Span::styled(
            " stagehand ",
            Style::default()
                .fg(TITLE_FG)
                .bg(TITLE_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                "  {}/{} running",
                supervisor.running_count(),
                supervisor.known_count()
            ),
            muted,
        ),
    ];
    if state.mode == Mode::Split {
        left.push(Span::raw("  "));
        left.push(Span::styled(
            " SPLIT VIEW ",
            Style::default()
                .fg(TITLE_FG)
                .bg(ACCENT_BG)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let right = status_spans(state, model);
    let left_width: usize = left.iter().map(|span| span.content.chars().count()).sum();
    let right_width: usize = right.iter().map(|span| span.content.chars().count()).sum();
    let padding = (area.width as usize)
        .saturating_sub(left_width)
        .saturating_sub(right_width)
        .saturating_sub(2);

    let mut spans = left;
    spans.push(Span::raw(" ".repeat(padding)));
    spans.extend(right);
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn status_spans(state: &ViewState, model: &FrameModel) -> Vec<Span<'static>> {
    let muted = Style::default().fg(MUTED);
    let auto_span = if state.auto_scroll {
        Span::styled("AUTO", Style::default().fg(RUNNING_FG))
    } else {
        Span::styled("auto", muted)
    };

    if state.mode == Mode::Split {
        let pane = state.active_pane_name().unwrap_or("");
        let total = model
            .panes
            .get(state.active_pane)
            .map(|pane| pane.lines.len())
            .unwrap_or(0);
        let scroll = state
            .active_pane_name()
            .and_then(|name| state.pane_scrolls.get(name))
            .copied()
            .unwrap_or(0);
        let max = super::super::layout::max_scroll(total, state.split_body_rows());
        vec![
            Span::styled(format!("Pane: {pane}"), muted),
            Span::styled(format!("  Lines: {total:>5}"), muted),
            Span::styled(
                format!("  Scroll: {:>4}", percent_label(scroll, max)),
                muted,
            ),
            Span::raw("  "),
            auto_span,
        ]
    } else {
        vec![
            Span::styled(format!("Lines: {:>5}", model.filtered_total), muted),
            Span::styled(
                format!(
                    "  Scroll: {:>4}",
                    percent_label(state.scroll_offset, model.tab_max_scroll)
                ),
                muted,
            ),
            Span::raw("  "),
            auto_span,
        ]
    }
}

fn percent_label(offset: usize, max: usize) -> String {
    if max == 0 {
        return "100%".to_owned();
    }
    format!("{}%", offset * 100 / max)
}

pub(super) fn render_tab_bar(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &ViewState,
    supervisor: &ProcessSupervisor,
) {
    let muted = Style::default().fg(MUTED);
    let mut spans: Vec<Span<'static>> = Vec::new();
    for (index, tab) in state.tabs.iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw("  "));
        }
        let is_active = index == state.active_tab;
        if tab == TAB_ALL {
            let style = if is_active {
                Style::default()
                    .fg(TITLE_FG)
                    .bg(ACCENT_BG)
                    .add_modifier(Modifier::BOLD)
            } else {
                muted
            };
            spans.push(Span::styled(" All ", style));
            continue;
        }
        let color = supervisor.process_color(tab);
        let running = supervisor.is_running(tab);
        if is_active {
            spans.push(Span::styled(
                format!(" ● {tab} "),
                Style::default()
                    .fg(TEXT_DARK)
                    .bg(color)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled("● ", Style::default().fg(color)));
            spans.push(Span::styled(tab.clone(), muted));
        }
        if !running {
            spans.push(Span::styled(" ✗", Style::default().fg(STOPPED_FG)));
        }
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
