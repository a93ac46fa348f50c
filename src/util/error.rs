// LogQuery - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Every error keeps its cause reachable through `source()` for logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all LogQuery operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum LogQueryError {
    /// Query construction or evaluation failed.
    Query(QueryError),

    /// Loading the log corpus failed.
    Corpus(CorpusError),

    /// Writing results failed.
    Export(ExportError),

    /// Configuration loading or validation failed.
    Config(ConfigError),
}

impl fmt::Display for LogQueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query(e) => write!(f, "Query error: {e}"),
            Self::Corpus(e) => write!(f, "Corpus error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl std::error::Error for LogQueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Query(e) => Some(e),
            Self::Corpus(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Query errors
// ---------------------------------------------------------------------------

/// Errors raised while building or evaluating a query.
#[derive(Debug)]
pub enum QueryError {
    /// A binary operator or closing parenthesis appeared where a term was
    /// expected. Aborts the whole query.
    InvalidToken { token: String, position: usize },

    /// NOT and group operators are nested deeper than the evaluator allows.
    NestingTooDeep { max_depth: usize, position: usize },

    /// An operator literal (or the quote marker) is empty.
    EmptyLiteral { operator: &'static str },

    /// An operator literal (or the quote marker) exceeds the length limit.
    LiteralTooLong {
        operator: &'static str,
        length: usize,
        max_length: usize,
    },

    /// Two operators share the same literal, so tokens cannot be classified.
    DuplicateLiteral {
        literal: String,
        first: &'static str,
        second: &'static str,
    },

    /// The operator alternation pattern failed to compile.
    Pattern {
        pattern: String,
        source: regex::Error,
    },
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidToken { token, position } => write!(
                f,
                "Invalid operation token '{token}' at position {position}: \
                 expected a search term, NOT or an opening group"
            ),
            Self::NestingTooDeep {
                max_depth,
                position,
            } => write!(
                f,
                "Query nesting exceeds maximum depth of {max_depth} at position {position}"
            ),
            Self::EmptyLiteral { operator } => {
                write!(f, "Literal for '{operator}' must not be empty")
            }
            Self::LiteralTooLong {
                operator,
                length,
                max_length,
            } => write!(
                f,
                "Literal for '{operator}' is {length} chars, exceeds maximum of {max_length}"
            ),
            Self::DuplicateLiteral {
                literal,
                first,
                second,
            } => write!(
                f,
                "Operators '{first}' and '{second}' share the literal '{literal}'"
            ),
            Self::Pattern { pattern, source } => {
                write!(f, "Cannot compile operator pattern '{pattern}': {source}")
            }
        }
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Pattern { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<QueryError> for LogQueryError {
    fn from(e: QueryError) -> Self {
        Self::Query(e)
    }
}

// ---------------------------------------------------------------------------
// Corpus errors
// ---------------------------------------------------------------------------

/// Errors related to discovering and reading log files.
#[derive(Debug)]
pub enum CorpusError {
    /// An input path does not exist.
    NotFound { path: PathBuf },

    /// Maximum file count exceeded while expanding a directory.
    MaxFilesExceeded { max: usize },

    /// Walkdir traversal error on the root itself.
    Traversal {
        path: PathBuf,
        source: walkdir::Error,
    },

    /// I/O error while reading a log file or standard input.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for CorpusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => {
                write!(f, "Input path '{}' does not exist", path.display())
            }
            Self::MaxFilesExceeded { max } => write!(
                f,
                "Corpus exceeds maximum of {max} files. \
                 Increase [corpus] max_files in config or narrow the input path."
            ),
            Self::Traversal { path, source } => {
                write!(f, "Error traversing '{}': {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "'{}': I/O error: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for CorpusError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Traversal { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<CorpusError> for LogQueryError {
    fn from(e: CorpusError) -> Self {
        Self::Corpus(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to writing query results.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the output.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Output I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV output error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON output error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for LogQueryError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for LogQueryError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for LogQuery results.
pub type Result<T> = std::result::Result<T, LogQueryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_invalid_token_message_names_token_and_position() {
        let e = QueryError::InvalidToken {
            token: "&&".to_string(),
            position: 0,
        };
        let msg = e.to_string();
        assert!(msg.contains("'&&'"));
        assert!(msg.contains("position 0"));
    }

    #[test]
    fn test_nesting_message_names_limit() {
        let e = QueryError::NestingTooDeep {
            max_depth: 256,
            position: 256,
        };
        assert!(e.to_string().contains("maximum depth of 256"));
    }

    #[test]
    fn test_top_level_error_preserves_source_chain() {
        let io = io::Error::new(io::ErrorKind::NotFound, "gone");
        let e: LogQueryError = CorpusError::Io {
            path: PathBuf::from("app.log"),
            source: io,
        }
        .into();
        let corpus = e.source().expect("corpus source");
        assert!(corpus.source().is_some());
        assert!(e.to_string().starts_with("Corpus error:"));
    }
}
