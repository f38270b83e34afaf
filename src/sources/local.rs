//! Loader for processed transcript JSON files.
//!
//! Reads the cleaned output of the upstream preprocessing step: one
//! `processed_*.json` file per call, holding the transcript id and its
//! cleaned utterances. Parsing and anonymizing the raw transcripts is
//! that step's job, not ours.

use std::path::Path;

use serde::Deserialize;
use walkdir::WalkDir;

use crate::error::SourceError;
use crate::models::TranscriptRecord;

const FILE_PREFIX: &str = "processed_";
const FILE_SUFFIX: &str = ".json";

#[derive(Debug, Deserialize)]
struct ProcessedTranscript {
    id: Option<String>,
    #[serde(default)]
    processed_data: Vec<ProcessedUtterance>,
}

#[derive(Debug, Deserialize)]
struct ProcessedUtterance {
    #[serde(default)]
    processed_text: String,
}

impl ProcessedTranscript {
    fn full_text(&self) -> String {
        self.processed_data
            .iter()
            .map(|u| u.processed_text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Load every processed transcript under `dir`.
///
/// Files without an id or with no processed text are skipped with a
/// warning; an unreadable file skips that file, not the run. An empty
/// result is an error so the operator notices a wrong path immediately.
pub fn load_processed_dir(dir: &Path) -> Result<Vec<TranscriptRecord>, SourceError> {
    if !dir.is_dir() {
        return Err(SourceError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("not a directory: {}", dir.display()),
        )));
    }

    let mut records = Vec::new();

    for entry in WalkDir::new(dir).max_depth(1).follow_links(false) {
        let entry = entry.map_err(|e| {
            SourceError::IoError(std::io::Error::other(e.to_string()))
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.starts_with(FILE_PREFIX) || !name.ends_with(FILE_SUFFIX) {
            continue;
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(file = name, error = %e, "unreadable transcript file; skipping");
                continue;
            }
        };

        let transcript: ProcessedTranscript = match serde_json::from_str(&content) {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(file = name, error = %e, "invalid transcript JSON; skipping");
                continue;
            }
        };

        let Some(id) = transcript.id.clone().filter(|id| !id.is_empty()) else {
            tracing::warn!(file = name, "transcript has no id; skipping");
            continue;
        };

        let full_text = transcript.full_text();
        if full_text.is_empty() {
            tracing::warn!(file = name, id = %id, "transcript has no processed text; skipping");
            continue;
        }

        records.push(TranscriptRecord::new(id, full_text));
    }

    if records.is_empty() {
        return Err(SourceError::NoTranscripts(dir.display().to_string()));
    }

    tracing::info!(count = records.len(), dir = %dir.display(), "loaded processed transcripts");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_file(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_loads_valid_transcripts() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "processed_001.json",
            r#"{"id": "t-1", "processed_data": [
                {"processed_text": "buenos días"},
                {"processed_text": ""},
                {"processed_text": "mi internet no funciona"}
            ]}"#,
        );

        let records = load_processed_dir(dir.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "t-1");
        assert_eq!(records[0].full_text, "buenos días mi internet no funciona");
    }

    #[test]
    fn test_skips_records_without_id_or_text() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "processed_a.json",
            r#"{"processed_data": [{"processed_text": "sin id"}]}"#,
        );
        write_file(
            dir.path(),
            "processed_b.json",
            r#"{"id": "t-2", "processed_data": []}"#,
        );
        write_file(
            dir.path(),
            "processed_c.json",
            r#"{"id": "t-3", "processed_data": [{"processed_text": "válido"}]}"#,
        );

        let records = load_processed_dir(dir.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "t-3");
    }

    #[test]
    fn test_ignores_non_matching_files_and_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "notes.txt", "not a transcript");
        write_file(dir.path(), "raw_001.json", r#"{"id": "raw"}"#);
        write_file(dir.path(), "processed_bad.json", "{ not json");
        write_file(
            dir.path(),
            "processed_ok.json",
            r#"{"id": "t-1", "processed_data": [{"processed_text": "hola"}]}"#,
        );

        let records = load_processed_dir(dir.path()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_processed_dir(dir.path()),
            Err(SourceError::NoTranscripts(_))
        ));
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        assert!(load_processed_dir(Path::new("/definitely/not/here")).is_err());
    }
}
