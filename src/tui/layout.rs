//! Pure geometry for the split view: column descriptors, tail windows,
//! and line clipping. No state, no I/O.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnKind {
    Main,
    Hint,
}

/// One rendered column, in left-to-right order. `pane_index` points back
/// into the split-pane snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PaneColumn {
    pub(crate) kind: ColumnKind,
    pub(crate) pane_index: usize,
    pub(crate) width: usize,
}

/// Builds the ordered column list for one frame. Tiled layout shares the
/// width equally; focus layout gives the active pane everything except a
/// narrow hint column per other pane. One separator column sits between
/// adjacent panes in both layouts.
pub(crate) fn split_columns(
    pane_count: usize,
    active_pane: usize,
    focused: bool,
    total_width: usize,
    hint_width: usize,
) -> Vec<PaneColumn> {
    if pane_count == 0 {
        return Vec::new();
    }
    if focused {
        let others = pane_count - 1;
        let main_width = total_width.saturating_sub(others * (hint_width + 1));
        return (0..pane_count)
            .map(|index| {
                if index == active_pane {
                    PaneColumn {
                        kind: ColumnKind::Main,
                        pane_index: index,
                        width: main_width,
                    }
                } else {
                    PaneColumn {
                        kind: ColumnKind::Hint,
                        pane_index: index,
                        width: hint_width,
                    }
                }
            })
            .collect();
    }
    let separators = pane_count - 1;
    let pane_width = total_width.saturating_sub(separators) / pane_count;
    (0..pane_count)
        .map(|index| PaneColumn {
            kind: ColumnKind::Main,
            pane_index: index,
            width: pane_width,
        })
        .collect()
}

pub(crate) fn max_scroll(len: usize, rows: usize) -> usize {
    len.saturating_sub(rows)
}

/// The `[start, end)` slice of a sequence shown at `offset` with `rows`
/// visible. The offset is clamped so the window never runs past the end.
pub(crate) fn visible_window(len: usize, offset: usize, rows: usize) -> (usize, usize) {
    let start = offset.min(max_scroll(len, rows));
    let end = (start + rows).min(len);
    (start, end)
}

/// Truncates to `width` columns with a trailing ellipsis; never wraps.
pub(crate) fn clip_line(text: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let count = text.chars().count();
    if count <= width {
        return text.to_owned();
    }
    let mut clipped: String = text.chars().take(width - 1).collect();
    clipped.push('…');
    clipped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiled_columns_share_width_equally() {
        let columns = split_columns(3, 0, false, 121, 3);
        assert_eq!(columns.len(), 3);
        assert!(columns.iter().all(|column| column.kind == ColumnKind::Main));
        // 121 minus 2 separator columns, divided by 3.
        assert!(columns.iter().all(|column| column.width == 39));
        assert_eq!(
            columns.iter().map(|column| column.pane_index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn focus_layout_keeps_left_to_right_order() {
        let columns = split_columns(4, 2, true, 120, 3);
        let kinds: Vec<ColumnKind> = columns.iter().map(|column| column.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ColumnKind::Hint,
                ColumnKind::Hint,
                ColumnKind::Main,
                ColumnKind::Hint,
            ]
        );
        assert_eq!(columns[2].width, 120 - 3 * 4);
        assert!(columns
            .iter()
            .filter(|column| column.kind == ColumnKind::Hint)
            .all(|column| column.width == 3));
    }

    #[test]
    fn single_pane_focus_takes_the_full_width() {
        let columns = split_columns(1, 0, true, 80, 3);
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].width, 80);
    }

    #[test]
    fn window_tracks_the_tail_and_clamps_overscroll() {
        assert_eq!(visible_window(100, 95, 10), (90, 100));
        assert_eq!(visible_window(100, 40, 10), (40, 50));
        assert_eq!(visible_window(5, 0, 10), (0, 5));
        assert_eq!(visible_window(0, 7, 10), (0, 0));
    }

    #[test]
    fn max_scroll_is_zero_for_short_content() {
        assert_eq!(max_scroll(3, 10), 0);
        assert_eq!(max_scroll(25, 10), 15);
    }

    #[test]
    fn clip_marks_truncation_with_an_ellipsis() {
        assert_eq!(clip_line("short", 10), "short");
        assert_eq!(clip_line("exactly-10", 10), "exactly-10");
        assert_eq!(clip_line("a-very-long-line", 10), "a-very-lo…");
        assert_eq!(clip_line("anything", 0), "");
    }
}
