use std::io;
use std::io::IsTerminal;

use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnableLineWrap, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;
use ratatui::Terminal;

use crate::process_manager::{ProcessSupervisor, ShutdownProgress};
use crate::ui::theme::{resolve_color_enabled, Theme};
use crate::ui::{KeyValue, OutputMode, PlainRenderer};

use super::config::SHUTDOWN_GRACE_TIMEOUT;

pub(super) type TuiTerminal = Terminal<CrosstermBackend<std::io::Stdout>>;

pub(super) fn init_terminal() -> Result<TuiTerminal, io::Error> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok(terminal)
}

/// Tears the session down: graceful stop with painted progress, terminal
/// restore, then a plain "Process Results" block on stdout.
pub(super) fn shutdown_and_render_summary(
    terminal: &mut TuiTerminal,
    supervisor: &ProcessSupervisor,
) -> Result<(), io::Error> {
    supervisor.shutdown(SHUTDOWN_GRACE_TIMEOUT, |progress| {
        let label = match progress {
            ShutdownProgress::SendingTerm => "Shutdown: stopping managed processes...",
            ShutdownProgress::Waiting => "Shutdown: waiting for managed processes to exit...",
            ShutdownProgress::ForceKilling => {
                "Shutdown: forcing remaining managed processes to stop..."
            }
            ShutdownProgress::Complete { .. } => "Shutdown: complete.",
        };
        let _ = draw_shutdown_status(terminal, label);
    });

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, EnableLineWrap)?;
    terminal.show_cursor()?;

    if supervisor.known_count() == 0 {
        return Ok(());
    }

    let mode = OutputMode::from_env();
    let color_enabled = resolve_color_enabled(mode, std::io::stdout().is_terminal());
    let theme = Theme::default();
    let mut renderer = PlainRenderer::stdout(mode);
    renderer.section("Process Results")?;
    for (name, diagnostic) in supervisor.exit_summary() {
        let status = if diagnostic == "exit=0" || diagnostic == "stopped" {
            if color_enabled {
                format!(
                    "{} {}",
                    styled(theme.success, "✓ OK"),
                    styled(theme.muted, &diagnostic)
                )
            } else {
                format!("OK {diagnostic}")
            }
        } else if color_enabled {
            styled(theme.error, &diagnostic)
        } else {
            diagnostic
        };
        renderer.key_values(&[KeyValue::new(name, status)])?;
    }
    renderer.text("")?;
    Ok(())
}

fn styled(style: anstyle::Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}

fn draw_shutdown_status(terminal: &mut TuiTerminal, status: &str) -> Result<(), io::Error> {
    terminal.draw(|frame| {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(area);
        let footer = Paragraph::new(status.to_owned()).style(Style::default().fg(Color::Yellow));
        frame.render_widget(footer, chunks[1]);
    })?;
    Ok(())
}
