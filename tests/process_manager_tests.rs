use std::thread;
use std::time::{Duration, Instant};

use stagehand::log_store::{LogLine, LogStore};
use stagehand::manifest::ProcessDefinition;
use stagehand::process_manager::{
    ProcessSupervisor, PROCESS_BACKGROUNDS, PROCESS_COLORS,
};

const POLL_WAIT: Duration = Duration::from_millis(50);
const DEADLINE: Duration = Duration::from_secs(5);

fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + DEADLINE;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(POLL_WAIT);
    }
    false
}

fn has_line(lines: &[LogLine], fragment: &str) -> bool {
    lines.iter().any(|line| line.text.contains(fragment))
}

#[test]
fn start_marks_running_and_logs_the_command() {
    let store = LogStore::new();
    let supervisor = ProcessSupervisor::new(store.clone());
    supervisor.start("web", "sleep 5", PROCESS_COLORS[0], PROCESS_BACKGROUNDS[0]);

    assert!(supervisor.is_running("web"));
    let lines = store.lines_for("web");
    assert!(has_line(&lines, "[started: sleep 5]"));
    assert!(lines.iter().any(|line| line.system));

    supervisor.stop("web");
}

#[test]
fn output_is_captured_into_both_sequences() {
    let store = LogStore::new();
    let supervisor = ProcessSupervisor::new(store.clone());
    supervisor.start(
        "echoer",
        "printf 'hello from pty\\n'",
        PROCESS_COLORS[1],
        PROCESS_BACKGROUNDS[1],
    );

    assert!(wait_for(|| has_line(
        &store.lines_for("echoer"),
        "hello from pty"
    )));
    assert!(has_line(&store.global_lines(), "hello from pty"));
    let captured = store.lines_for("echoer");
    let output = captured
        .iter()
        .find(|line| line.text.contains("hello from pty"))
        .expect("captured output line");
    assert!(!output.system);
}

#[test]
fn natural_exit_is_recorded_and_flips_running() {
    let store = LogStore::new();
    let supervisor = ProcessSupervisor::new(store.clone());
    supervisor.start("oneshot", "true", PROCESS_COLORS[0], PROCESS_BACKGROUNDS[0]);

    assert!(wait_for(|| has_line(
        &store.lines_for("oneshot"),
        "[exited with status 0]"
    )));
    assert!(!supervisor.is_running("oneshot"));
}

#[test]
fn missing_command_surfaces_a_shell_exit_status() {
    let store = LogStore::new();
    let supervisor = ProcessSupervisor::new(store.clone());
    supervisor.start(
        "ghost",
        "definitely-not-a-command-xyz",
        PROCESS_COLORS[2],
        PROCESS_BACKGROUNDS[2],
    );

    assert!(wait_for(|| has_line(
        &store.lines_for("ghost"),
        "[exited with status 127]"
    )));
    assert!(!supervisor.is_running("ghost"));
}

#[test]
fn stop_flips_running_immediately_and_logs_it() {
    let store = LogStore::new();
    let supervisor = ProcessSupervisor::new(store.clone());
    supervisor.start("napper", "sleep 30", PROCESS_COLORS[0], PROCESS_BACKGROUNDS[0]);
    assert!(supervisor.is_running("napper"));

    supervisor.stop("napper");
    assert!(!supervisor.is_running("napper"));
    assert!(has_line(&store.lines_for("napper"), "[stopped]"));

    // SIGTERM lands well before the kill escalation would.
    assert!(wait_for(|| has_line(
        &store.lines_for("napper"),
        "[exited with status"
    )));
}

#[test]
fn kill_escalation_fires_when_term_is_ignored() {
    let store = LogStore::new();
    let supervisor = ProcessSupervisor::new(store.clone());
    supervisor.start(
        "stubborn",
        "trap '' TERM; sleep 3",
        PROCESS_COLORS[0],
        PROCESS_BACKGROUNDS[0],
    );
    // Give the shell a moment to install the trap.
    thread::sleep(Duration::from_millis(300));

    supervisor.stop("stubborn");
    assert!(!supervisor.is_running("stubborn"));

    // TERM is ignored, so only the SIGKILL escalation after the grace
    // period produces an exit.
    assert!(wait_for(|| has_line(
        &store.lines_for("stubborn"),
        "[exited with status"
    )));
}

#[test]
fn stopping_a_stopped_process_is_a_no_op() {
    let store = LogStore::new();
    let supervisor = ProcessSupervisor::new(store.clone());
    supervisor.stop("unknown");
    assert!(store.global_lines().is_empty());
}

#[test]
fn starting_a_running_process_is_a_no_op() {
    let store = LogStore::new();
    let supervisor = ProcessSupervisor::new(store.clone());
    supervisor.start("web", "sleep 5", PROCESS_COLORS[0], PROCESS_BACKGROUNDS[0]);
    supervisor.start("web", "sleep 5", PROCESS_COLORS[0], PROCESS_BACKGROUNDS[0]);

    let started_lines = store
        .lines_for("web")
        .iter()
        .filter(|line| line.text.starts_with("[started:"))
        .count();
    assert_eq!(started_lines, 1);

    supervisor.stop("web");
}

#[test]
fn start_all_assigns_palette_colors_by_manifest_order() {
    let store = LogStore::new();
    let supervisor = ProcessSupervisor::new(store.clone());
    let definitions: Vec<ProcessDefinition> = ["one", "two", "three"]
        .iter()
        .map(|name| ProcessDefinition {
            name: (*name).to_owned(),
            command: "sleep 5".to_owned(),
        })
        .collect();
    supervisor.start_all(&definitions);

    assert_eq!(supervisor.process_color("one"), PROCESS_COLORS[0]);
    assert_eq!(supervisor.process_color("two"), PROCESS_COLORS[1]);
    assert_eq!(supervisor.process_color("three"), PROCESS_COLORS[2]);
    assert_eq!(supervisor.process_background("two"), PROCESS_BACKGROUNDS[1]);
    assert!(supervisor.all_running());
    assert_eq!(supervisor.running_count(), 3);

    supervisor.stop_all();
    assert!(!supervisor.any_running());
}

#[test]
fn unknown_names_fall_back_to_the_first_palette_slot() {
    let supervisor = ProcessSupervisor::new(LogStore::new());
    assert_eq!(supervisor.process_color("nobody"), PROCESS_COLORS[0]);
    assert_eq!(
        supervisor.process_background("nobody"),
        PROCESS_BACKGROUNDS[0]
    );
    assert!(!supervisor.is_running("nobody"));
}

#[test]
fn restart_brings_the_process_back_with_the_same_color() {
    let store = LogStore::new();
    let supervisor = ProcessSupervisor::new(store.clone());
    supervisor.start("web", "sleep 30", PROCESS_COLORS[3], PROCESS_BACKGROUNDS[3]);
    assert!(supervisor.is_running("web"));

    supervisor.restart("web");
    assert!(has_line(&store.lines_for("web"), "[restarting...]"));

    // Old incarnation reported stopped right away; the settle delay plus
    // respawn brings it back.
    assert!(wait_for(|| supervisor.is_running("web")));
    assert_eq!(supervisor.process_color("web"), PROCESS_COLORS[3]);
    let started_lines = store
        .lines_for("web")
        .iter()
        .filter(|line| line.text.starts_with("[started:"))
        .count();
    assert_eq!(started_lines, 2);

    supervisor.stop("web");
}

#[test]
fn shutdown_reports_progress_and_ends_with_complete() {
    let store = LogStore::new();
    let supervisor = ProcessSupervisor::new(store.clone());
    supervisor.start("a", "sleep 30", PROCESS_COLORS[0], PROCESS_BACKGROUNDS[0]);
    supervisor.start("b", "sleep 30", PROCESS_COLORS[1], PROCESS_BACKGROUNDS[1]);

    let mut stages = Vec::new();
    supervisor.shutdown(Duration::from_secs(5), |progress| {
        stages.push(progress);
    });

    use stagehand::process_manager::ShutdownProgress;
    assert_eq!(stages.first(), Some(&ShutdownProgress::SendingTerm));
    assert!(matches!(
        stages.last(),
        Some(ShutdownProgress::Complete { total: 2, .. })
    ));
    assert!(!supervisor.any_running());
}
