// Streaming reader for line-delimited JSON speech files.
//
// The file is read twice: once up front to count records (so the progress
// bar has a total), then lazily record by record. Neither pass holds more
// than one line in memory; transcripts for a full legislature run to
// hundreds of megabytes.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One speech, one JSON object per line.
///
/// The input file is assumed pre-sorted by author: all of an author's
/// speeches are contiguous. The grouping stage depends on this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechRecord {
    pub author: String,
    pub document_text: String,
}

/// A speech transcript file with a known record count.
pub struct SpeechFile {
    path: PathBuf,
    record_count: usize,
}

impl SpeechFile {
    /// Open the file and count its lines without retaining them.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open speech file {}", path.display()))?;
        let record_count = BufReader::new(file).lines().count();

        Ok(Self {
            path: path.to_path_buf(),
            record_count,
        })
    }

    /// Number of records (lines) in the file.
    pub fn len(&self) -> usize {
        self.record_count
    }

    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }

    /// A lazy iterator over parsed records, restarting from the top of
    /// the file. Any malformed line yields a fatal `Err` naming it.
    pub fn records(&self) -> Result<Records> {
        let file = File::open(&self.path)
            .with_context(|| format!("Failed to reopen speech file {}", self.path.display()))?;
        Ok(Records {
            lines: BufReader::new(file).lines(),
            line_number: 0,
        })
    }
}

/// Iterator over parsed speech records.
pub struct Records {
    lines: std::io::Lines<BufReader<File>>,
    line_number: usize,
}

impl Iterator for Records {
    type Item = Result<SpeechRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.lines.next()?;
        self.line_number += 1;
        let parsed = line
            .map_err(anyhow::Error::from)
            .and_then(|text| {
                serde_json::from_str::<SpeechRecord>(&text).map_err(anyhow::Error::from)
            })
            .with_context(|| format!("Malformed speech record at line {}", self.line_number));
        Some(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(f, "{line}").unwrap();
        }
        f.flush().unwrap();
        f
    }

    #[test]
    fn test_counts_and_streams_records() {
        let f = write_file(&[
            r#"{"author": "A", "document_text": "first speech"}"#,
            r#"{"author": "B", "document_text": "second speech"}"#,
        ]);
        let speeches = SpeechFile::open(f.path()).unwrap();
        assert_eq!(speeches.len(), 2);

        let records: Vec<SpeechRecord> = speeches
            .records()
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(records[0].author, "A");
        assert_eq!(records[1].document_text, "second speech");
    }

    #[test]
    fn test_records_restart_from_the_top() {
        let f = write_file(&[r#"{"author": "A", "document_text": "x"}"#]);
        let speeches = SpeechFile::open(f.path()).unwrap();
        // Two independent passes both see the record
        assert_eq!(speeches.records().unwrap().count(), 1);
        assert_eq!(speeches.records().unwrap().count(), 1);
    }

    #[test]
    fn test_malformed_line_is_an_error_with_line_number() {
        let f = write_file(&[
            r#"{"author": "A", "document_text": "ok"}"#,
            "not json at all",
        ]);
        let speeches = SpeechFile::open(f.path()).unwrap();
        let results: Vec<_> = speeches.records().unwrap().collect();
        assert!(results[0].is_ok());
        let err = results[1].as_ref().unwrap_err();
        assert!(format!("{err:#}").contains("line 2"), "got: {err:#}");
    }
}
