// LogQuery - core/model.rs
//
// Core data model types. Pure data definitions with no I/O.

use serde::Serialize;
use std::path::{Path, PathBuf};

// =============================================================================
// Corpus
// =============================================================================

/// Where a corpus line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineOrigin {
    /// Index into `Corpus::sources`.
    pub source: usize,

    /// 1-based line number within that source.
    pub line_number: u64,
}

/// Ordered log lines plus the file and line number each one came from.
///
/// Every line has exactly one entry in the origin index.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    lines: Vec<String>,
    index: OriginIndex,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every line of `content` under the source name `source`.
    ///
    /// Accepts `\n` and `\r\n` line endings. Returns the number of lines added.
    pub fn push_source(&mut self, source: impl Into<PathBuf>, content: &str) -> usize {
        let source_idx = self.index.sources.len();
        self.index.sources.push(source.into());

        let before = self.lines.len();
        for (i, line) in content.lines().enumerate() {
            self.lines.push(line.to_string());
            self.index.origins.push(LineOrigin {
                source: source_idx,
                line_number: i as u64 + 1,
            });
        }
        self.lines.len() - before
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.index.sources
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Source path and line number of line `idx`.
    pub fn origin(&self, idx: usize) -> Option<(&Path, u64)> {
        self.index.origin(idx)
    }

    /// Split into the bare lines (for the query engine) and the index that
    /// still resolves origins by line position.
    pub fn into_parts(self) -> (Vec<String>, OriginIndex) {
        (self.lines, self.index)
    }
}

/// Origin lookup kept after the lines have been handed to the querier.
#[derive(Debug, Clone, Default)]
pub struct OriginIndex {
    origins: Vec<LineOrigin>,
    sources: Vec<PathBuf>,
}

impl OriginIndex {
    /// Source path and line number of line `idx`.
    pub fn origin(&self, idx: usize) -> Option<(&Path, u64)> {
        let origin = self.origins.get(idx)?;
        let path = self.sources.get(origin.source)?;
        Some((path.as_path(), origin.line_number))
    }

    /// Output record for line `idx` with text `text`.
    pub fn record<'a>(&'a self, idx: usize, text: &'a str) -> MatchRecord<'a> {
        match self.origin(idx) {
            Some((source, line_number)) => MatchRecord {
                source: Some(source),
                line_number: Some(line_number),
                text,
            },
            None => MatchRecord::bare(text),
        }
    }
}

// =============================================================================
// Results
// =============================================================================

/// One matched line, ready for output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord<'a> {
    /// File the line was read from, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<&'a Path>,

    /// 1-based line number within `source`, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u64>,

    pub text: &'a str,
}

impl<'a> MatchRecord<'a> {
    /// A record with no origin information.
    pub fn bare(text: &'a str) -> Self {
        Self {
            source: None,
            line_number: None,
            text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_source_tracks_origins() {
        let mut corpus = Corpus::new();
        assert_eq!(corpus.push_source("a.log", "one\ntwo\n"), 2);
        assert_eq!(corpus.push_source("b.log", "three\r\nfour"), 2);

        assert_eq!(corpus.len(), 4);
        assert_eq!(corpus.lines()[2], "three");
        assert_eq!(corpus.origin(1), Some((Path::new("a.log"), 2)));
        assert_eq!(corpus.origin(3), Some((Path::new("b.log"), 2)));
        assert_eq!(corpus.origin(4), None);
    }

    #[test]
    fn test_empty_source_is_recorded_without_lines() {
        let mut corpus = Corpus::new();
        assert_eq!(corpus.push_source("empty.log", ""), 0);
        assert!(corpus.is_empty());
        assert_eq!(corpus.sources().len(), 1);
    }

    #[test]
    fn test_into_parts_keeps_origins_aligned() {
        let mut corpus = Corpus::new();
        corpus.push_source("a.log", "x\ny");
        let (lines, index) = corpus.into_parts();
        assert_eq!(lines, vec!["x", "y"]);
        assert_eq!(index.origin(1), Some((Path::new("a.log"), 2)));
    }
}
