use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::symbols::border;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use super::super::config::HINT_COLUMN_WIDTH;
use super::super::layout::{clip_line, split_columns, visible_window, ColumnKind};
use super::super::state::{ViewState, TAB_ALL};
use super::super::terminal_text::{highlight_spans, pad_to_width};
use super::super::view_model::{FrameModel, PaneModel};
use super::{system_style, ACCENT_BG, DIM, INACTIVE_BG, MUTED, TEXT_DARK, TITLE_FG};

/// The tab view's log box: a tail window of the (filtered) active-tab
/// snapshot, with a per-process gutter on the All tab.
pub(super) fn render_logs(frame: &mut Frame<'_>, area: Rect, state: &ViewState, model: &FrameModel) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(Style::default().fg(DIM));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if model.tab_lines.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled("  No logs yet...", Style::default().fg(MUTED))),
            inner,
        );
        return;
    }

    let rows = inner.height as usize;
    let width = inner.width as usize;
    let (start, end) = visible_window(model.tab_lines.len(), state.scroll_offset, rows);
    let highlight = Style::default().fg(TITLE_FG).bg(ACCENT_BG);
    let name_width = state
        .tabs
        .iter()
        .filter(|tab| tab.as_str() != TAB_ALL)
        .map(|tab| tab.chars().count())
        .max()
        .unwrap_or(8);

    let lines: Vec<Line> = model.tab_lines[start..end]
        .iter()
        .map(|log| {
            let mut spans: Vec<Span<'static>> = Vec::new();
            let text_width;
            let base;
            if state.is_all_tab() {
                let (prefix_style, separator_style) = if log.system {
                    (
                        Style::default()
                            .fg(TEXT_DARK)
                            .bg(DIM)
                            .add_modifier(Modifier::BOLD),
                        Style::default().fg(DIM),
                    )
                } else {
                    (
                        Style::default()
                            .fg(TEXT_DARK)
                            .bg(log.color)
                            .add_modifier(Modifier::BOLD),
                        Style::default().fg(TITLE_FG),
                    )
                };
                spans.push(Span::styled(
                    format!(" {} ", pad_to_width(&log.process, name_width)),
                    prefix_style,
                ));
                spans.push(Span::styled(" │ ", separator_style));
                text_width = width.saturating_sub(name_width + 5);
                base = if log.system {
                    system_style()
                } else {
                    Style::default().fg(log.color).bg(log.background)
                };
            } else {
                spans.push(Span::raw(" "));
                text_width = width.saturating_sub(1);
                base = if log.system {
                    system_style()
                } else {
                    Style::default()
                };
            }
            let clipped = clip_line(&log.text, text_width);
            let shown = clipped.chars().count();
            spans.extend(highlight_spans(&clipped, &state.filter_text, base, highlight));
            if shown < text_width {
                spans.push(Span::styled(" ".repeat(text_width - shown), base));
            }
            Line::from(spans)
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

/// The split view: columns from the layout engine, one header row plus a
/// body window per pane, hint columns as orientation-only markers.
pub(super) fn render_split(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &ViewState,
    model: &FrameModel,
) {
    let columns = split_columns(
        model.panes.len(),
        state.active_pane,
        state.focused,
        area.width as usize,
        HINT_COLUMN_WIDTH,
    );
    if columns.is_empty() || area.height == 0 {
        return;
    }

    let rows = area.height as usize;
    let body_rows = rows.saturating_sub(1);
    let separator = Span::styled("│", Style::default().fg(DIM));
    let mut grid: Vec<Vec<Span<'static>>> = vec![Vec::new(); rows];

    for (column_index, column) in columns.iter().enumerate() {
        let pane = &model.panes[column.pane_index];
        let is_active = column.pane_index == state.active_pane;
        if column_index > 0 {
            for row in grid.iter_mut() {
                row.push(separator.clone());
            }
        }
        match column.kind {
            ColumnKind::Main => {
                push_main_column(&mut grid, pane, is_active, column.width, body_rows);
            }
            ColumnKind::Hint => {
                push_hint_column(&mut grid, pane, column.width, body_rows);
            }
        }
    }

    let lines: Vec<Line> = grid.into_iter().map(Line::from).collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn push_main_column(
    grid: &mut [Vec<Span<'static>>],
    pane: &PaneModel,
    is_active: bool,
    width: usize,
    body_rows: usize,
) {
    let indicator = if pane.running { "●" } else { "✗" };
    let header_style = if is_active {
        Style::default()
            .fg(TEXT_DARK)
            .bg(pane.color)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DIM).bg(INACTIVE_BG)
    };
    let header = format!(" {} {indicator} ", pane.name);
    grid[0].push(Span::styled(
        pad_to_width(&clip_line(&header, width), width),
        header_style,
    ));

    let (start, end) = visible_window(pane.lines.len(), pane.scroll, body_rows);
    for row in 0..body_rows {
        let cell = match (start + row < end).then(|| &pane.lines[start + row]) {
            Some(log) => {
                let text = format!(" {}", clip_line(&log.text, width.saturating_sub(1)));
                let style = if log.system {
                    system_style()
                } else if is_active {
                    Style::default()
                } else {
                    Style::default().fg(DIM)
                };
                Span::styled(pad_to_width(&text, width), style)
            }
            None => Span::raw(" ".repeat(width)),
        };
        grid[row + 1].push(cell);
    }
}

fn push_hint_column(
    grid: &mut [Vec<Span<'static>>],
    pane: &PaneModel,
    width: usize,
    body_rows: usize,
) {
    grid[0].push(Span::styled(
        pad_to_width(" …", width),
        Style::default().fg(DIM).bg(INACTIVE_BG),
    ));
    let (start, end) = visible_window(pane.lines.len(), pane.scroll, body_rows);
    for row in 0..body_rows {
        let cell = if start + row < end {
            Span::styled(pad_to_width(" …", width), Style::default().fg(DIM))
        } else {
            Span::raw(" ".repeat(width))
        };
        grid[row + 1].push(cell);
    }
}
