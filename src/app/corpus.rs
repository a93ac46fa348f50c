// LogQuery - app/corpus.rs
//
// Turns command-line inputs into a queryable corpus.
//
// Directory inputs are walked with `walkdir` and filtered by include/exclude
// glob patterns. Exclude patterns without wildcards also prune directory
// descent (e.g. node_modules/, .git/), so excluded subtrees are never walked.
//
// Per-file problems found during directory expansion are non-fatal and come
// back as warnings. A path named explicitly on the command line that cannot
// be read is fatal.

use crate::core::model::Corpus;
use crate::platform::fs;
use crate::util::constants;
use crate::util::error::CorpusError;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Source name recorded for lines read from standard input.
pub const STDIN_SOURCE: &str = "(standard input)";

// =============================================================================
// Configuration
// =============================================================================

/// Limits and patterns applied while building a corpus.
#[derive(Debug, Clone)]
pub struct CorpusConfig {
    /// Maximum directory recursion depth.
    pub max_depth: usize,

    /// Maximum number of files a single directory input may expand to.
    pub max_files: usize,

    /// Glob patterns (filename-only) that a file MUST match to be included.
    /// An empty list means "include everything that is not excluded".
    pub include_patterns: Vec<String>,

    /// Glob patterns matched against filenames AND directory component names.
    pub exclude_patterns: Vec<String>,

    /// Files at or above this size (bytes) are memory-mapped.
    pub large_file_threshold: u64,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            max_depth: constants::DEFAULT_MAX_DEPTH,
            max_files: constants::DEFAULT_MAX_FILES,
            include_patterns: constants::DEFAULT_INCLUDE_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            exclude_patterns: constants::DEFAULT_EXCLUDE_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            large_file_threshold: constants::DEFAULT_LARGE_FILE_THRESHOLD,
        }
    }
}

// =============================================================================
// Discovery
// =============================================================================

/// Find log files under `root`, sorted by path.
///
/// Inaccessible entries and non-UTF-8 filenames are returned as warnings.
/// Returns `Err` if `root` does not exist, cannot itself be traversed, or
/// expands to more than `max_files` files.
pub fn discover_files(
    root: &Path,
    config: &CorpusConfig,
) -> Result<(Vec<PathBuf>, Vec<String>), CorpusError> {
    if !root.exists() {
        return Err(CorpusError::NotFound {
            path: root.to_path_buf(),
        });
    }

    let max_files = config.max_files.min(constants::ABSOLUTE_MAX_FILES);
    let max_depth = config.max_depth.min(constants::ABSOLUTE_MAX_DEPTH);

    tracing::debug!(
        root = %root.display(),
        max_depth,
        max_files,
        include = ?config.include_patterns,
        exclude = ?config.exclude_patterns,
        "Discovery starting"
    );

    let include_pats = compile_patterns(&config.include_patterns, "include");
    let exclude_pats = compile_patterns(&config.exclude_patterns, "exclude");

    let mut files: Vec<PathBuf> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    let walker = walkdir::WalkDir::new(root)
        .max_depth(max_depth)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            if e.file_type().is_dir() && e.depth() > 0 {
                let name = e.file_name().to_str().unwrap_or("");
                return !is_excluded_component(name, &exclude_pats);
            }
            true
        });

    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            Err(e) if e.depth() == 0 => {
                return Err(CorpusError::Traversal {
                    path: root.to_path_buf(),
                    source: e,
                });
            }
            Err(e) => {
                let path_str = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<unknown>".to_string());
                let msg = format!("Cannot access '{path_str}': {e}");
                tracing::debug!(warning = %msg, "Discovery warning");
                warnings.push(msg);
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }

        let path = entry.path();
        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n,
            None => {
                warnings.push(format!("Skipping '{}': non-UTF-8 filename", path.display()));
                continue;
            }
        };

        if is_excluded_filename(file_name, &exclude_pats) {
            tracing::trace!(file = file_name, "Excluded by pattern");
            continue;
        }
        if !is_included(file_name, &include_pats) {
            tracing::trace!(file = file_name, "Not matched by include patterns");
            continue;
        }

        files.push(path.to_path_buf());
        if files.len() > max_files {
            return Err(CorpusError::MaxFilesExceeded { max: max_files });
        }
    }

    files.sort();

    tracing::debug!(
        files = files.len(),
        warnings = warnings.len(),
        "Discovery complete"
    );

    Ok((files, warnings))
}

// =============================================================================
// Loading
// =============================================================================

/// Read every input into one corpus, in argument order.
///
/// Files are appended as given. Directories are expanded with
/// [`discover_files`] and their files appended in path order. Returns the
/// corpus and any non-fatal warnings.
pub fn load_corpus(
    paths: &[PathBuf],
    config: &CorpusConfig,
) -> Result<(Corpus, Vec<String>), CorpusError> {
    let mut corpus = Corpus::new();
    let mut warnings: Vec<String> = Vec::new();

    for path in paths {
        if path.is_dir() {
            let (files, discovery_warnings) = discover_files(path, config)?;
            warnings.extend(discovery_warnings);
            if files.is_empty() {
                warnings.push(format!(
                    "No log files matched in directory '{}'",
                    path.display()
                ));
            }
            for file in files {
                match fs::read_file_content(&file, config.large_file_threshold) {
                    Ok(content) => {
                        push_file(&mut corpus, file, &content);
                    }
                    Err(e) => {
                        let msg = format!("Cannot read '{}': {e}", file.display());
                        tracing::warn!("{}", msg);
                        warnings.push(msg);
                    }
                }
            }
        } else {
            if !path.exists() {
                return Err(CorpusError::NotFound { path: path.clone() });
            }
            let content = fs::read_file_content(path, config.large_file_threshold).map_err(
                |e| CorpusError::Io {
                    path: path.clone(),
                    source: e,
                },
            )?;
            push_file(&mut corpus, path.clone(), &content);
        }
    }

    tracing::info!(
        files = corpus.sources().len(),
        lines = corpus.len(),
        warnings = warnings.len(),
        "Corpus loaded"
    );

    Ok((corpus, warnings))
}

/// Read all of `reader` as a single-source corpus named [`STDIN_SOURCE`].
pub fn load_reader<R: Read>(reader: R) -> Result<Corpus, CorpusError> {
    let content = fs::read_all_lossy(reader).map_err(|e| CorpusError::Io {
        path: PathBuf::from(STDIN_SOURCE),
        source: e,
    })?;
    let mut corpus = Corpus::new();
    let lines = corpus.push_source(STDIN_SOURCE, &content);
    tracing::info!(lines, "Corpus loaded from standard input");
    Ok(corpus)
}

fn push_file(corpus: &mut Corpus, path: PathBuf, content: &str) {
    let shown = path.display().to_string();
    let lines = corpus.push_source(path, content);
    tracing::debug!(file = %shown, lines, "File added to corpus");
}

// =============================================================================
// Glob helpers
// =============================================================================

/// Compile glob pattern strings, logging and skipping any that fail.
fn compile_patterns(patterns: &[String], kind: &str) -> Vec<glob::Pattern> {
    patterns
        .iter()
        .filter_map(|p| match glob::Pattern::new(p) {
            Ok(compiled) => Some(compiled),
            Err(e) => {
                tracing::warn!(pattern = p, kind, error = %e, "Invalid glob pattern, skipping");
                None
            }
        })
        .collect()
}

/// Literal exclude patterns (no wildcards) name directories to skip entirely.
fn is_excluded_component(dir_name: &str, exclude_pats: &[glob::Pattern]) -> bool {
    exclude_pats.iter().any(|p| {
        let s = p.as_str();
        !s.contains('*') && !s.contains('?') && !s.contains('[') && p.matches(dir_name)
    })
}

fn is_excluded_filename(file_name: &str, exclude_pats: &[glob::Pattern]) -> bool {
    exclude_pats.iter().any(|p| p.matches(file_name))
}

/// An empty include list includes everything.
fn is_included(file_name: &str, include_pats: &[glob::Pattern]) -> bool {
    include_pats.is_empty() || include_pats.iter().any(|p| p.matches(file_name))
}
