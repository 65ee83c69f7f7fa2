use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use stagehand::manifest::{parse, parse_file, ManifestError, ProcessDefinition};

#[test]
fn parses_names_and_commands_in_order() {
    let definitions = parse("web: sleep 100\n# comment\n\nworker: ruby run.rb\n");
    assert_eq!(
        definitions,
        vec![
            ProcessDefinition {
                name: "web".to_owned(),
                command: "sleep 100".to_owned(),
            },
            ProcessDefinition {
                name: "worker".to_owned(),
                command: "ruby run.rb".to_owned(),
            },
        ]
    );
}

#[test]
fn missing_file_is_reported_as_not_found() {
    let path = PathBuf::from("/definitely/not/here/Procfile");
    match parse_file(&path) {
        Err(ManifestError::NotFound(rendered)) => {
            assert!(rendered.contains("Procfile"));
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn file_with_no_definitions_is_reported_as_empty() {
    let path = temp_procfile("empty", "# only comments\n\n");
    match parse_file(&path) {
        Err(ManifestError::Empty(_)) => {}
        other => panic!("expected Empty, got {other:?}"),
    }
}

#[test]
fn file_with_definitions_round_trips() {
    let path = temp_procfile("ok", "api: cargo run\ndb: postgres -D data\n");
    let definitions = parse_file(&path).expect("parse");
    assert_eq!(definitions.len(), 2);
    assert_eq!(definitions[0].name, "api");
    assert_eq!(definitions[1].command, "postgres -D data");
}

fn temp_procfile(tag: &str, content: &str) -> PathBuf {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time")
        .as_nanos();
    let path = std::env::temp_dir().join(format!("stagehand-procfile-{tag}-{ts}"));
    fs::write(&path, content).expect("write procfile");
    path
}
