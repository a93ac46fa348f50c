// LogQuery - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "LogQuery";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "LogQuery";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Query syntax defaults
// =============================================================================

/// Default AND operator literal.
pub const DEFAULT_AND: &str = "&&";

/// Default OR operator literal.
pub const DEFAULT_OR: &str = "||";

/// Default NOT operator literal.
pub const DEFAULT_NOT: &str = "!!";

/// Default group-opening literal.
pub const DEFAULT_LEFT_PARENTHESIS: &str = "((";

/// Default group-closing literal.
pub const DEFAULT_RIGHT_PARENTHESIS: &str = "))";

/// Default quote marker wrapped around operands that contain operator text.
pub const DEFAULT_QUOTE_MARKER: &str = "\"\"";

/// Maximum length of a single operator literal or the quote marker.
pub const MAX_OPERATOR_LITERAL_LENGTH: usize = 16;

// =============================================================================
// Evaluation
// =============================================================================

/// Maximum nesting of NOT and group operators in one query.
///
/// Each level is a recursive call in the evaluator; deeper queries are
/// rejected with `QueryError::NestingTooDeep` instead of exhausting the stack.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Corpus size (in lines) at or above which lines are evaluated in parallel.
///
/// Below this the rayon fork/join overhead outweighs the per-line work for
/// typical queries.
pub const PARALLEL_EVALUATION_THRESHOLD: usize = 4_096;

// =============================================================================
// Corpus discovery limits
// =============================================================================

/// Maximum directory recursion depth when a directory is given as input.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Hard upper bound on max depth (prevents runaway traversal).
pub const ABSOLUTE_MAX_DEPTH: usize = 50;

/// Minimum sensible value for the max-files limit.
pub const MIN_MAX_FILES: usize = 1;

/// Maximum number of files loaded into one corpus.
pub const DEFAULT_MAX_FILES: usize = 500;

/// Hard upper bound on max files.
pub const ABSOLUTE_MAX_FILES: usize = 10_000;

/// Default include glob patterns for directory inputs.
pub const DEFAULT_INCLUDE_PATTERNS: &[&str] = &["*.log", "*.log.[0-9]*", "*.txt"];

/// Default exclude glob patterns for directory inputs.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[
    "*.gz",
    "*.zip",
    "*.bak",
    "*.tmp",
    "node_modules",
    ".git",
    "__pycache__",
];

// =============================================================================
// File reading
// =============================================================================

/// Files at or above this size are memory-mapped instead of read into a buffer.
pub const DEFAULT_LARGE_FILE_THRESHOLD: u64 = 64 * 1024 * 1024; // 64 MB

/// Backoff delays (ms) between attempts when a read fails transiently.
/// The number of entries is the number of retries.
pub const READ_RETRY_DELAYS_MS: &[u64] = &[50, 100, 200];

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Maximum length of a log line included in debug output.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
