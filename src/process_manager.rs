use std::io::{BufRead, BufReader};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use portable_pty::{native_pty_system, CommandBuilder, MasterPty, PtySize};
use ratatui::style::Color;

use crate::log_store::{LogLine, LogStore};
use crate::manifest::ProcessDefinition;

pub const PROCESS_COLORS: [Color; 8] = [
    Color::Rgb(0xFF, 0x79, 0xC6),
    Color::Rgb(0x8B, 0xE9, 0xFD),
    Color::Rgb(0x50, 0xFA, 0x7B),
    Color::Rgb(0xFF, 0xB8, 0x6C),
    Color::Rgb(0xBD, 0x93, 0xF9),
    Color::Rgb(0xF1, 0xFA, 0x8C),
    Color::Rgb(0xFF, 0x55, 0x55),
    Color::Rgb(0x62, 0x72, 0xA4),
];

pub const PROCESS_BACKGROUNDS: [Color; 8] = [
    Color::Rgb(0x2D, 0x1F, 0x2B),
    Color::Rgb(0x1F, 0x2D, 0x2D),
    Color::Rgb(0x1F, 0x2D, 0x1F),
    Color::Rgb(0x2D, 0x2A, 0x1F),
    Color::Rgb(0x25, 0x20, 0x33),
    Color::Rgb(0x2D, 0x2D, 0x1F),
    Color::Rgb(0x2D, 0x1F, 0x1F),
    Color::Rgb(0x1F, 0x20, 0x29),
];

const RESTART_NOTICE_COLOR: Color = Color::Rgb(0xFF, 0x55, 0x55);

pub const STOP_GRACE_PERIOD: Duration = Duration::from_secs(2);
pub const RESTART_SETTLE_DELAY: Duration = Duration::from_millis(500);
const EXIT_POLL_WAIT: Duration = Duration::from_millis(40);

const PTY_ROWS: u16 = 24;
const PTY_COLS: u16 = 120;

struct ProcessHandle {
    command: String,
    pid: Option<u32>,
    // Kept so the PTY stays open for the reader while the process runs;
    // replaced (and therefore closed) on restart.
    _pty_master: Box<dyn MasterPty + Send>,
    color: Color,
    background: Color,
    running: bool,
    exit_seen: bool,
    last_status: Option<u32>,
    generation: u64,
}

type HandleTable = IndexMap<String, ProcessHandle>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownProgress {
    SendingTerm,
    Waiting,
    ForceKilling,
    Complete { total: usize, forced: usize },
}

/// Owns process lifecycle: spawn on a PTY, one output-reader thread and one
/// exit-watcher thread per running process, graceful stop with a forceful
/// escalation after `STOP_GRACE_PERIOD`. All log traffic goes through the
/// injected `LogStore`.
#[derive(Clone)]
pub struct ProcessSupervisor {
    handles: Arc<Mutex<HandleTable>>,
    store: LogStore,
}

impl ProcessSupervisor {
    pub fn new(store: LogStore) -> Self {
        Self {
            handles: Arc::new(Mutex::new(IndexMap::new())),
            store,
        }
    }

    /// Spawns `command` on a fresh PTY under `name`. A no-op if a process
    /// with that name is already running. Spawn failures are reported as a
    /// system log line and never halt the rest of the dashboard.
    pub fn start(&self, name: &str, command: &str, color: Color, background: Color) {
        {
            let handles = self.handles.lock().expect("handle table lock");
            if handles.get(name).is_some_and(|handle| handle.running) {
                return;
            }
        }

        let pty = native_pty_system();
        let pair = match pty.openpty(PtySize {
            rows: PTY_ROWS,
            cols: PTY_COLS,
            pixel_width: 0,
            pixel_height: 0,
        }) {
            Ok(pair) => pair,
            Err(error) => {
                self.report_spawn_failure(name, &error.to_string(), color, background);
                return;
            }
        };

        let mut builder = CommandBuilder::new("sh");
        builder.arg("-c");
        builder.arg(command);
        let child = match pair.slave.spawn_command(builder) {
            Ok(child) => child,
            Err(error) => {
                self.report_spawn_failure(name, &error.to_string(), color, background);
                return;
            }
        };
        drop(pair.slave);

        let reader = match pair.master.try_clone_reader() {
            Ok(reader) => reader,
            Err(error) => {
                self.report_spawn_failure(name, &error.to_string(), color, background);
                return;
            }
        };

        let pid = child.process_id();
        let generation = {
            let mut handles = self.handles.lock().expect("handle table lock");
            let generation = handles
                .get(name)
                .map(|handle| handle.generation + 1)
                .unwrap_or(1);
            handles.insert(
                name.to_owned(),
                ProcessHandle {
                    command: command.to_owned(),
                    pid,
                    _pty_master: pair.master,
                    color,
                    background,
                    running: true,
                    exit_seen: false,
                    last_status: None,
                    generation,
                },
            );
            generation
        };

        self.store.append(LogLine::system(
            name,
            format!("[started: {command}]"),
            color,
            background,
        ));

        {
            let store = self.store.clone();
            let name = name.to_owned();
            thread::spawn(move || {
                let reader = BufReader::new(reader);
                for line in reader.lines().map_while(Result::ok) {
                    store.append(LogLine::output(
                        &name,
                        sanitize_output_line(&line),
                        color,
                        background,
                    ));
                }
                // PTY closed: the normal end-of-life signal, not a failure.
            });
        }

        {
            let store = self.store.clone();
            let handles = Arc::clone(&self.handles);
            let name = name.to_owned();
            let mut child = child;
            thread::spawn(move || {
                let status = child.wait();
                {
                    let mut table = handles.lock().expect("handle table lock");
                    if let Some(handle) = table.get_mut(&name) {
                        if handle.generation == generation {
                            handle.running = false;
                            handle.exit_seen = true;
                            if let Ok(status) = &status {
                                handle.last_status = Some(status.exit_code());
                            }
                        }
                    }
                }
                if let Ok(status) = status {
                    store.append(LogLine::system(
                        &name,
                        format!("[exited with status {}]", status.exit_code()),
                        color,
                        background,
                    ));
                }
            });
        }
    }

    /// Graceful stop: SIGTERM now, `running` flipped immediately so the UI
    /// reflects the request, SIGKILL after the grace period unless the
    /// exit-watcher has seen the process die in the meantime.
    pub fn stop(&self, name: &str) {
        let Some((pid, generation, color, background)) = ({
            let mut handles = self.handles.lock().expect("handle table lock");
            handles.get_mut(name).and_then(|handle| {
                if !handle.running {
                    return None;
                }
                handle.running = false;
                Some((handle.pid, handle.generation, handle.color, handle.background))
            })
        }) else {
            return;
        };

        if let Some(pid) = pid {
            let _ = kill(Pid::from_raw(pid as i32), Signal::SIGTERM);
        }

        self.store.append(LogLine::system(
            name,
            "[stopped]".to_owned(),
            color,
            background,
        ));

        let handles = Arc::clone(&self.handles);
        let name = name.to_owned();
        thread::spawn(move || {
            thread::sleep(STOP_GRACE_PERIOD);
            let escalate = {
                let table = handles.lock().expect("handle table lock");
                table
                    .get(&name)
                    .is_some_and(|handle| handle.generation == generation && !handle.exit_seen)
            };
            if escalate {
                if let Some(pid) = pid {
                    let _ = kill(Pid::from_raw(pid as i32), Signal::SIGKILL);
                }
            }
        });
    }

    /// Stop, settle, start again with the same command and colors. The
    /// settle delay runs off-thread so the caller never blocks.
    pub fn restart(&self, name: &str) {
        let Some((command, color, background)) = ({
            let handles = self.handles.lock().expect("handle table lock");
            handles
                .get(name)
                .map(|handle| (handle.command.clone(), handle.color, handle.background))
        }) else {
            return;
        };

        self.store.append(LogLine::system(
            name,
            "[restarting...]".to_owned(),
            RESTART_NOTICE_COLOR,
            background,
        ));
        self.stop(name);

        let supervisor = self.clone();
        let name = name.to_owned();
        thread::spawn(move || {
            thread::sleep(RESTART_SETTLE_DELAY);
            supervisor.start(&name, &command, color, background);
        });
    }

    pub fn stop_all(&self) {
        for name in self.known_names() {
            self.stop(&name);
        }
    }

    /// Starts every definition in manifest order, assigning display colors
    /// cyclically from the two fixed palettes.
    pub fn start_all(&self, definitions: &[ProcessDefinition]) {
        for (index, definition) in definitions.iter().enumerate() {
            self.start(
                &definition.name,
                &definition.command,
                PROCESS_COLORS[index % PROCESS_COLORS.len()],
                PROCESS_BACKGROUNDS[index % PROCESS_BACKGROUNDS.len()],
            );
        }
    }

    pub fn is_running(&self, name: &str) -> bool {
        let handles = self.handles.lock().expect("handle table lock");
        handles.get(name).is_some_and(|handle| handle.running)
    }

    pub fn all_running(&self) -> bool {
        let handles = self.handles.lock().expect("handle table lock");
        handles.values().all(|handle| handle.running)
    }

    pub fn any_running(&self) -> bool {
        let handles = self.handles.lock().expect("handle table lock");
        handles.values().any(|handle| handle.running)
    }

    pub fn running_count(&self) -> usize {
        let handles = self.handles.lock().expect("handle table lock");
        handles.values().filter(|handle| handle.running).count()
    }

    pub fn known_count(&self) -> usize {
        self.handles.lock().expect("handle table lock").len()
    }

    pub fn process_color(&self, name: &str) -> Color {
        let handles = self.handles.lock().expect("handle table lock");
        handles
            .get(name)
            .map(|handle| handle.color)
            .unwrap_or(PROCESS_COLORS[0])
    }

    pub fn process_background(&self, name: &str) -> Color {
        let handles = self.handles.lock().expect("handle table lock");
        handles
            .get(name)
            .map(|handle| handle.background)
            .unwrap_or(PROCESS_BACKGROUNDS[0])
    }

    /// Per-process diagnostic for the post-session results block, in
    /// manifest order: `running`, `exit=N`, or `stopped` when no exit
    /// status was observed.
    pub fn exit_summary(&self) -> Vec<(String, String)> {
        let handles = self.handles.lock().expect("handle table lock");
        handles
            .iter()
            .map(|(name, handle)| {
                let diagnostic = if handle.running {
                    "running".to_owned()
                } else {
                    match handle.last_status {
                        Some(status) => format!("exit={status}"),
                        None => "stopped".to_owned(),
                    }
                };
                (name.clone(), diagnostic)
            })
            .collect()
    }

    /// Final teardown: stop everything, wait up to `grace` for the exit
    /// watchers to confirm, then force-kill whatever is left.
    pub fn shutdown<F>(&self, grace: Duration, mut on_progress: F)
    where
        F: FnMut(ShutdownProgress),
    {
        on_progress(ShutdownProgress::SendingTerm);
        self.stop_all();

        on_progress(ShutdownProgress::Waiting);
        let deadline = Instant::now() + grace;
        while Instant::now() < deadline {
            if self.all_exits_seen() {
                on_progress(ShutdownProgress::Complete {
                    total: self.known_count(),
                    forced: 0,
                });
                return;
            }
            thread::sleep(EXIT_POLL_WAIT);
        }

        on_progress(ShutdownProgress::ForceKilling);
        let mut forced = 0usize;
        {
            let handles = self.handles.lock().expect("handle table lock");
            for handle in handles.values() {
                if handle.exit_seen {
                    continue;
                }
                if let Some(pid) = handle.pid {
                    let _ = kill(Pid::from_raw(pid as i32), Signal::SIGKILL);
                    forced += 1;
                }
            }
        }
        on_progress(ShutdownProgress::Complete {
            total: self.known_count(),
            forced,
        });
    }

    fn all_exits_seen(&self) -> bool {
        let handles = self.handles.lock().expect("handle table lock");
        handles
            .values()
            .all(|handle| handle.exit_seen || handle.pid.is_none())
    }

    fn known_names(&self) -> Vec<String> {
        let handles = self.handles.lock().expect("handle table lock");
        handles.keys().cloned().collect()
    }

    fn report_spawn_failure(&self, name: &str, reason: &str, color: Color, background: Color) {
        self.store.append(LogLine::system(
            name,
            format!("[failed to start: {reason}]"),
            color,
            background,
        ));
    }
}

/// Strips ANSI escape sequences and stray control bytes from a captured
/// PTY line. Stored lines are plain text; display styling comes from the
/// process palette, not from the child.
fn sanitize_output_line(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len());
    let mut i = 0usize;
    while i < chars.len() {
        let ch = chars[i];
        if ch == '\u{1b}' && i + 1 < chars.len() {
            match chars[i + 1] {
                '[' => {
                    i += 2;
                    while i < chars.len() && !('@'..='~').contains(&chars[i]) {
                        i += 1;
                    }
                }
                ']' => {
                    i += 2;
                    while i < chars.len() {
                        if chars[i] == '\u{0007}' {
                            break;
                        }
                        if chars[i] == '\u{1b}' && i + 1 < chars.len() && chars[i + 1] == '\\' {
                            i += 1;
                            break;
                        }
                        i += 1;
                    }
                }
                _ => {
                    i += 1;
                }
            }
        } else if !ch.is_control() || ch == '\t' {
            out.push(ch);
        }
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_sgr_sequences() {
        assert_eq!(
            sanitize_output_line("\u{1b}[31merror\u{1b}[0m ok"),
            "error ok"
        );
    }

    #[test]
    fn sanitize_strips_osc_titles_and_control_bytes() {
        assert_eq!(
            sanitize_output_line("\u{1b}]0;title\u{0007}ready\r"),
            "ready"
        );
        assert_eq!(sanitize_output_line("a\u{0008}b"), "ab");
    }

    #[test]
    fn sanitize_keeps_tabs() {
        assert_eq!(sanitize_output_line("a\tb"), "a\tb");
    }

    #[test]
    fn palettes_hold_eight_entries_each() {
        assert_eq!(PROCESS_COLORS.len(), 8);
        assert_eq!(PROCESS_BACKGROUNDS.len(), 8);
    }
}
