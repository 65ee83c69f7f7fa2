use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::super::state::{Mode, ViewState};
use super::super::view_model::FrameModel;
use super::{FILTER_FG, HELP_KEY, MUTED};

pub(super) fn render_filter_bar(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &ViewState,
    model: &FrameModel,
) {
    let filter = Style::default().fg(FILTER_FG);
    let line = if state.mode == Mode::Filter {
        Line::from(vec![
            Span::styled("  / ", filter),
            Span::raw(state.filter_text.clone()),
            Span::styled("█", filter),
        ])
    } else {
        Line::from(vec![
            Span::styled("  Filter: ", filter),
            Span::raw(state.filter_text.clone()),
            Span::styled(
                format!(" ({} matches)", model.filtered_total),
                Style::default().fg(MUTED),
            ),
        ])
    };
    frame.render_widget(Paragraph::new(line), area);
}

pub(super) fn render_help(frame: &mut Frame<'_>, area: Rect, state: &ViewState) {
    let bindings: &[(&str, &str)] = match state.mode {
        Mode::Filter => &[("enter/esc", "done"), ("ctrl+u", "clear")],
        Mode::Split if state.focused => &[
            ("↑/↓", "scroll"),
            ("a", "auto"),
            ("r", "restart"),
            ("f/esc", "unfocus"),
            ("q", "quit"),
        ],
        Mode::Split => &[
            ("←/→", "pane"),
            ("↑/↓", "scroll"),
            ("f", "focus"),
            ("a", "auto"),
            ("r", "restart"),
            ("v/esc", "exit split"),
            ("q", "quit"),
        ],
        Mode::Normal => &[
            ("←/→", "tabs"),
            ("↑/↓", "scroll"),
            ("/", "filter"),
            ("v", "split"),
            ("a", "auto"),
            ("r", "restart"),
            ("q", "quit"),
        ],
    };

    let key_style = Style::default().fg(HELP_KEY);
    let muted = Style::default().fg(MUTED);
    let mut spans = vec![Span::raw("  ")];
    for (index, (key, description)) in bindings.iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(" │ ", muted));
        }
        spans.push(Span::styled(*key, key_style));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(*description, muted));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
