use std::io;
use std::io::{IsTerminal, Write};

use anstream::{AutoStream, ColorChoice};
use anstyle::Style;

use crate::ui::theme::{resolve_color_enabled, OutputMode, Theme};
use crate::ui::widgets::{KeyValue, MessageBlock};

/// Styled line-oriented output for everything printed outside the
/// alternate screen: usage errors and the post-session results block.
pub struct PlainRenderer<W: Write> {
    writer: W,
    color_enabled: bool,
    theme: Theme,
}

impl<W: Write> PlainRenderer<W> {
    pub fn new(writer: W, color_enabled: bool) -> Self {
        Self {
            writer,
            color_enabled,
            theme: Theme::default(),
        }
    }

    fn style_text(&self, style: Style, text: &str) -> String {
        if !self.color_enabled {
            return text.to_owned();
        }
        format!("{}{}{}", style.render(), text, style.render_reset())
    }

    pub fn text(&mut self, body: &str) -> io::Result<()> {
        writeln!(self.writer, "{body}")
    }

    pub fn section(&mut self, title: &str) -> io::Result<()> {
        let heading = self.style_text(self.theme.accent, title);
        writeln!(self.writer, "\n{heading}")
    }

    pub fn key_values(&mut self, pairs: &[KeyValue]) -> io::Result<()> {
        let label_width = pairs
            .iter()
            .map(|pair| pair.key.chars().count())
            .max()
            .unwrap_or(0);
        for pair in pairs {
            let padded = format!("{:<label_width$}", pair.key);
            let label = self.style_text(self.theme.muted, &padded);
            writeln!(self.writer, "  {label}  {}", pair.value)?;
        }
        Ok(())
    }

    pub fn error_block(&mut self, block: &MessageBlock) -> io::Result<()> {
        let marker = self.style_text(self.theme.error, "error");
        writeln!(self.writer, "{marker} {}", block.title)?;
        writeln!(self.writer, "  {}", block.body)?;
        if let Some(hint) = &block.hint {
            let hint_label = self.style_text(self.theme.muted, "hint");
            writeln!(self.writer, "  {hint_label}: {hint}")?;
        }
        Ok(())
    }
}

impl PlainRenderer<AutoStream<std::io::Stdout>> {
    pub fn stdout(mode: OutputMode) -> Self {
        let choice = match mode {
            OutputMode::Auto => ColorChoice::Auto,
            OutputMode::Always => ColorChoice::AlwaysAnsi,
            OutputMode::Never => ColorChoice::Never,
        };
        let stream = AutoStream::new(std::io::stdout(), choice);
        let color_enabled = resolve_color_enabled(mode, std::io::stdout().is_terminal());
        Self::new(stream, color_enabled)
    }
}

impl PlainRenderer<AutoStream<std::io::Stderr>> {
    pub fn stderr(mode: OutputMode) -> Self {
        let choice = match mode {
            OutputMode::Auto => ColorChoice::Auto,
            OutputMode::Always => ColorChoice::AlwaysAnsi,
            OutputMode::Never => ColorChoice::Never,
        };
        let stream = AutoStream::new(std::io::stderr(), choice);
        let color_enabled = resolve_color_enabled(mode, std::io::stderr().is_terminal());
        Self::new(stream, color_enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_values_align_labels() {
        let mut renderer = PlainRenderer::new(Vec::new(), false);
        renderer
            .key_values(&[
                KeyValue::new("web", "exit=0"),
                KeyValue::new("worker", "running"),
            ])
            .expect("write");
        let output = String::from_utf8(renderer.writer).expect("utf8");
        assert!(output.contains("  web     exit=0"));
        assert!(output.contains("  worker  running"));
    }

    #[test]
    fn error_block_includes_hint_when_present() {
        let mut renderer = PlainRenderer::new(Vec::new(), false);
        renderer
            .error_block(
                &MessageBlock::new("Invalid arguments", "missing Procfile path")
                    .with_hint("run `stagehand --help`"),
            )
            .expect("write");
        let output = String::from_utf8(renderer.writer).expect("utf8");
        assert!(output.contains("error Invalid arguments"));
        assert!(output.contains("hint: run `stagehand --help`"));
    }
}
