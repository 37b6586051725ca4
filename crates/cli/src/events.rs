//! JSON Lines event reader for the `run` command.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use contracts::EventRecord;

use crate::error::{CliError, Result};

/// Read one [`EventRecord`] per non-blank line
///
/// Lines starting with `#` are comments. Line numbers in errors are 1-based.
pub fn read_events(path: &Path) -> Result<Vec<EventRecord>> {
    let reader = BufReader::new(File::open(path)?);
    parse_lines(reader)
}

fn parse_lines(reader: impl BufRead) -> Result<Vec<EventRecord>> {
    let mut events = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let event = serde_json::from_str(trimmed)
            .map_err(|e| CliError::event_parse(index + 1, e.to_string()))?;
        events.push(event);
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_events_skips_blank_and_comments() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# session 1").unwrap();
        writeln!(file, r#"{{"type":"identify","userId":"u1","traits":{{"plan":"pro"}}}}"#).unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"type":"track","userId":"u1","event":"Signed Up"}}"#).unwrap();

        let events = read_events(file.path()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind(), "identify");
        assert_eq!(events[1], EventRecord::track("u1", "Signed Up"));
    }

    #[test]
    fn test_bad_line_reports_line_number() {
        let input = "{\"type\":\"track\",\"userId\":\"u1\",\"event\":\"ok\"}\n{\"type\":\"unknown\"}\n";
        let err = parse_lines(input.as_bytes()).unwrap_err();
        assert!(matches!(err, CliError::EventParse { line: 2, .. }));
    }
}
