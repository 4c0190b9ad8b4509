//! Reader for the qualified-component class index.
//!
//! The index is a line-oriented UTF-8 file, one fully-qualified binary class
//! name per line, written under a build-output location by the build-time
//! index generator. Discovery reads it at startup to learn which candidate
//! classes exist before any publisher is attached.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use smol_str::SmolStr;

use crate::error::{LocatorError, Result};

/// Conventional index location inside a build-output directory.
pub const INDEX_PATH: &str = "META-INF/lodestone/qualified";

/// Read the index at its conventional location under `output_dir`.
pub fn read_index_dir(output_dir: &Path) -> Result<Vec<SmolStr>> {
    read_index(&output_dir.join(INDEX_PATH))
}

/// Read a qualified-component index file.
pub fn read_index(path: &Path) -> Result<Vec<SmolStr>> {
    parse_index(BufReader::new(File::open(path)?))
}

/// Parse index content: blank lines are skipped, duplicates keep their first
/// position, an entry containing whitespace is malformed.
pub fn parse_index(reader: impl BufRead) -> Result<Vec<SmolStr>> {
    let mut names: Vec<SmolStr> = Vec::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let entry = line.trim();
        if entry.is_empty() {
            continue;
        }
        if entry.split_whitespace().nth(1).is_some() {
            return Err(LocatorError::MalformedIndex {
                line: number + 1,
                text: entry.to_string(),
            });
        }
        if !names.iter().any(|name| name.as_str() == entry) {
            names.push(SmolStr::from(entry));
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_one_name_per_line() {
        let names = parse_index("acme.Widget\nacme.Gadget\n".as_bytes()).unwrap();
        assert_eq!(names, ["acme.Widget", "acme.Gadget"]);
    }

    #[test]
    fn skips_blanks_and_keeps_first_duplicate_position() {
        let content = "acme.Widget\n\n  \nacme.Gadget\nacme.Widget\n";
        let names = parse_index(content.as_bytes()).unwrap();
        assert_eq!(names, ["acme.Widget", "acme.Gadget"]);
    }

    #[test]
    fn rejects_entries_with_embedded_whitespace() {
        let err = parse_index("acme.Widget\nnot a name\n".as_bytes()).unwrap_err();
        match err {
            LocatorError::MalformedIndex { line, text } => {
                assert_eq!(line, 2);
                assert_eq!(text, "not a name");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn reads_from_the_conventional_location() {
        let dir = tempfile::tempdir().unwrap();
        let index = dir.path().join(INDEX_PATH);
        std::fs::create_dir_all(index.parent().unwrap()).unwrap();
        std::fs::write(&index, "acme.Widget\n").unwrap();

        let names = read_index_dir(dir.path()).unwrap();
        assert_eq!(names, ["acme.Widget"]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_index_dir(dir.path()),
            Err(LocatorError::Io(_))
        ));
    }
}
