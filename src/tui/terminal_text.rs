use ratatui::style::Style;
use ratatui::text::Span;

use crate::log_store::LogLine;

pub(crate) fn line_matches(text: &str, filter: &str) -> bool {
    filter.is_empty() || text.to_lowercase().contains(&filter.to_lowercase())
}

/// Case-insensitive substring filter; an empty filter passes everything
/// through untouched.
pub(crate) fn filter_lines(lines: &[LogLine], filter: &str) -> Vec<LogLine> {
    if filter.is_empty() {
        return lines.to_vec();
    }
    lines
        .iter()
        .filter(|line| line_matches(&line.text, filter))
        .cloned()
        .collect()
}

/// Splits `text` into spans with every case-insensitive `filter` match
/// rendered in `highlight`. Matching is char-wise so multi-byte input
/// never lands on a broken boundary.
pub(crate) fn highlight_spans(
    text: &str,
    filter: &str,
    base: Style,
    highlight: Style,
) -> Vec<Span<'static>> {
    if filter.is_empty() {
        return vec![Span::styled(text.to_owned(), base)];
    }
    let needle: Vec<char> = filter.to_lowercase().chars().collect();
    let chars: Vec<char> = text.chars().collect();
    let mut spans = Vec::new();
    let mut plain = String::new();
    let mut i = 0usize;
    while i < chars.len() {
        if matches_at(&chars, i, &needle) {
            if !plain.is_empty() {
                spans.push(Span::styled(std::mem::take(&mut plain), base));
            }
            let matched: String = chars[i..i + needle.len()].iter().collect();
            spans.push(Span::styled(matched, highlight));
            i += needle.len();
        } else {
            plain.push(chars[i]);
            i += 1;
        }
    }
    if !plain.is_empty() || spans.is_empty() {
        spans.push(Span::styled(plain, base));
    }
    spans
}

fn matches_at(chars: &[char], start: usize, needle: &[char]) -> bool {
    if needle.is_empty() || start + needle.len() > chars.len() {
        return false;
    }
    needle
        .iter()
        .enumerate()
        .all(|(offset, expected)| chars[start + offset].to_lowercase().eq(expected.to_lowercase()))
}

/// Left-pads or clips to exactly `width` display columns.
pub(crate) fn pad_to_width(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count >= width {
        return text.chars().take(width).collect();
    }
    let mut padded = text.to_owned();
    padded.extend(std::iter::repeat(' ').take(width - count));
    padded
}
