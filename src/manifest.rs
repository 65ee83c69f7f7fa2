use std::fs;
use std::io;
use std::path::Path;

/// One `name: command` entry, in Procfile order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessDefinition {
    pub name: String,
    pub command: String,
}

#[derive(Debug)]
pub enum ManifestError {
    NotFound(String),
    Unreadable { path: String, error: io::Error },
    Empty(String),
}

impl std::fmt::Display for ManifestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ManifestError::NotFound(path) => write!(f, "Procfile not found: {path}"),
            ManifestError::Unreadable { path, error } => {
                write!(f, "failed to read Procfile `{path}`: {error}")
            }
            ManifestError::Empty(path) => {
                write!(f, "no processes defined in Procfile: {path}")
            }
        }
    }
}

impl std::error::Error for ManifestError {}

/// Parses Procfile text: one `name: command` per line, `#` comments and
/// blank lines ignored, lines that do not match the grammar skipped.
pub fn parse(content: &str) -> Vec<ProcessDefinition> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(parse_line)
        .collect()
}

pub fn parse_file(path: &Path) -> Result<Vec<ProcessDefinition>, ManifestError> {
    let rendered = path.display().to_string();
    if !path.exists() {
        return Err(ManifestError::NotFound(rendered));
    }
    let content = fs::read_to_string(path).map_err(|error| ManifestError::Unreadable {
        path: rendered.clone(),
        error,
    })?;
    let definitions = parse(&content);
    if definitions.is_empty() {
        return Err(ManifestError::Empty(rendered));
    }
    Ok(definitions)
}

fn parse_line(line: &str) -> Option<ProcessDefinition> {
    let (name, command) = line.split_once(':')?;
    let command = command.trim();
    if !is_valid_name(name) || command.is_empty() {
        return None;
    }
    Some(ProcessDefinition {
        name: name.to_owned(),
        command: command.to_owned(),
    })
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_alphabetic() && first != '_' {
        return false;
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_entries_in_manifest_order() {
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
    fn command_keeps_everything_after_first_colon() {
        let definitions = parse("api: sh -c 'echo a: b'");
        assert_eq!(definitions[0].command, "sh -c 'echo a: b'");
    }

    #[test]
    fn rejects_names_outside_the_grammar() {
        assert!(parse("1web: run").is_empty());
        assert!(parse("we b: run").is_empty());
        assert!(parse("web run").is_empty());
        assert_eq!(parse("_job-2: run").len(), 1);
    }

    #[test]
    fn skips_entries_with_empty_commands() {
        assert!(parse("web:").is_empty());
        assert!(parse("web:   ").is_empty());
    }
}
