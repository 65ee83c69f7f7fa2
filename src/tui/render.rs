use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::process_manager::ProcessSupervisor;

use super::state::{Mode, ViewState};
use super::view_model::FrameModel;

mod footer;
mod header;
mod panes;

// Dashboard chrome palette, matching the process palettes' register.
pub(super) const TITLE_FG: Color = Color::Rgb(0xFF, 0xFD, 0xF5);
pub(super) const TITLE_BG: Color = Color::Rgb(0xFF, 0x55, 0x55);
pub(super) const ACCENT_BG: Color = Color::Rgb(0x6C, 0x50, 0xFF);
pub(super) const MUTED: Color = Color::Rgb(0x62, 0x62, 0x62);
pub(super) const HELP_KEY: Color = Color::Rgb(0x90, 0x90, 0x90);
pub(super) const DIM: Color = Color::Rgb(0x62, 0x72, 0xA4);
pub(super) const TEXT_DARK: Color = Color::Rgb(0x28, 0x2A, 0x36);
pub(super) const INACTIVE_BG: Color = Color::Rgb(0x44, 0x47, 0x5A);
pub(super) const FILTER_FG: Color = Color::Rgb(0xF1, 0xFA, 0x8C);
pub(super) const RUNNING_FG: Color = Color::Rgb(0x50, 0xFA, 0x7B);
pub(super) const STOPPED_FG: Color = Color::Rgb(0xFF, 0x55, 0x55);

pub(super) fn system_style() -> Style {
    Style::default().fg(DIM).add_modifier(Modifier::ITALIC)
}

pub(super) fn render_ui(
    frame: &mut Frame<'_>,
    state: &ViewState,
    model: &FrameModel,
    supervisor: &ProcessSupervisor,
) {
    if let Some(message) = &state.startup_error {
        render_error_view(frame, message);
        return;
    }

    if state.mode == Mode::Split {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(frame.area());
        header::render_header(frame, chunks[0], state, model, supervisor);
        panes::render_split(frame, chunks[1], state, model);
        footer::render_help(frame, chunks[2], state);
        return;
    }

    let filter_rows = u16::from(state.filter_bar_visible());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(filter_rows),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());
    header::render_header(frame, chunks[0], state, model, supervisor);
    header::render_tab_bar(frame, chunks[1], state, supervisor);
    if filter_rows > 0 {
        footer::render_filter_bar(frame, chunks[2], state, model);
    }
    panes::render_logs(frame, chunks[3], state, model);
    footer::render_help(frame, chunks[4], state);
}

fn render_error_view(frame: &mut Frame<'_>, message: &str) {
    let lines = vec![
        Line::from(Span::styled(
            " stagehand ",
            Style::default()
                .fg(TITLE_FG)
                .bg(TITLE_BG)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Error: {message}"),
            Style::default().fg(STOPPED_FG).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press q to quit",
            Style::default().fg(MUTED),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), frame.area());
}
