use std::time::Duration;

/// Redraw cadence; also drives auto-scroll recomputation.
pub(super) const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// How long `shutdown` waits for exit watchers before force-killing.
pub(super) const SHUTDOWN_GRACE_TIMEOUT: Duration = Duration::from_secs(3);

/// Width of the placeholder columns rendered for unfocused panes.
pub(super) const HINT_COLUMN_WIDTH: usize = 3;

/// Rows consumed by chrome around the log area in the tab view:
/// header, tab bar, help line, and the log box borders.
pub(super) const NORMAL_CHROME_ROWS: usize = 5;

/// Extra row consumed when the filter bar is visible.
pub(super) const FILTER_BAR_ROWS: usize = 1;

/// Rows consumed by chrome around the panes in the split view:
/// header and help line.
pub(super) const SPLIT_CHROME_ROWS: usize = 2;
