// LogQuery - platform/config.rs
//
// Platform config directory resolution and config.toml loading with
// validation. Invalid values produce warnings and fall back to defaults.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::operators::{OperatorSet, QuerySyntax};
use crate::core::query::SortOrder;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for LogQuery configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/logquery/ or %APPDATA%\LogQuery\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Default location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[operators]` section.
    pub operators: OperatorsSection,
    /// `[query]` section.
    pub query: QuerySection,
    /// `[corpus]` section.
    pub corpus: CorpusSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[operators]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct OperatorsSection {
    pub and: Option<String>,
    pub or: Option<String>,
    pub not: Option<String>,
    pub left_parenthesis: Option<String>,
    pub right_parenthesis: Option<String>,
    /// Quote marker stripped from operands.
    pub quote: Option<String>,
}

/// `[query]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct QuerySection {
    /// "asc" or "desc".
    pub ordering: Option<String>,
    /// Default result limit (0 = unbounded).
    pub limit: Option<usize>,
    pub case_insensitive: Option<bool>,
}

/// `[corpus]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct CorpusSection {
    /// Maximum directory recursion depth.
    pub max_depth: Option<usize>,
    /// Maximum files loaded from directory inputs.
    pub max_files: Option<usize>,
    /// Include glob patterns.
    pub include_patterns: Option<Vec<String>>,
    /// Exclude glob patterns.
    pub exclude_patterns: Option<Vec<String>>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Query syntax --
    pub syntax: QuerySyntax,

    // -- Query defaults --
    pub ordering: SortOrder,
    pub limit: Option<usize>,
    pub case_insensitive: bool,

    // -- Corpus --
    pub max_depth: usize,
    pub max_files: usize,
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Log file path.
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            syntax: QuerySyntax::default(),
            ordering: SortOrder::default(),
            limit: None,
            case_insensitive: false,
            max_depth: constants::DEFAULT_MAX_DEPTH,
            max_files: constants::DEFAULT_MAX_FILES,
            include_patterns: to_strings(constants::DEFAULT_INCLUDE_PATTERNS),
            exclude_patterns: to_strings(constants::DEFAULT_EXCLUDE_PATTERNS),
            log_level: None,
            log_file: None,
        }
    }
}

fn to_strings(patterns: &[&str]) -> Vec<String> {
    patterns.iter().map(|s| (*s).to_string()).collect()
}

/// Load and validate a config file.
///
/// Returns the validated config and a list of non-fatal warnings.
///
/// When `required` is false (the platform default location), a missing file
/// yields defaults with no warnings and an unreadable or unparseable file
/// yields defaults plus a warning. When `required` is true (an explicit
/// `--config` path), those cases are errors.
pub fn load_config(path: &Path, required: bool) -> Result<(AppConfig, Vec<String>), ConfigError> {
    if !required && !path.exists() {
        tracing::debug!(path = %path.display(), "No config.toml found; using defaults");
        return Ok((AppConfig::default(), Vec::new()));
    }

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if required => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        }
        Err(e) => {
            let msg = format!(
                "Could not read config file '{}': {e}. Using defaults.",
                path.display()
            );
            tracing::warn!("{}", msg);
            return Ok((AppConfig::default(), vec![msg]));
        }
    };

    match parse_config(&content, path) {
        Ok(loaded) => {
            tracing::info!(path = %path.display(), "Loaded config.toml");
            Ok(loaded)
        }
        Err(e) if required => Err(e),
        Err(e) => {
            let msg = format!(
                "{e}. Using defaults. See config.example.toml for the expected format."
            );
            tracing::warn!("{}", msg);
            Ok((AppConfig::default(), vec![msg]))
        }
    }
}

/// Parse and validate config.toml content.
///
/// Only a TOML syntax or type error is fatal; every out-of-range value is
/// reported as a warning and replaced by its default.
pub fn parse_config(content: &str, path: &Path) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let raw: RawConfig = toml::from_str(content).map_err(|e| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut config = AppConfig::default();
    let mut warnings: Vec<String> = Vec::new();

    // -- Operators --
    let defaults = OperatorSet::default();
    let ops = raw.operators;
    let syntax = QuerySyntax::new(
        OperatorSet {
            and: ops.and.unwrap_or(defaults.and),
            or: ops.or.unwrap_or(defaults.or),
            not: ops.not.unwrap_or(defaults.not),
            left_parenthesis: ops.left_parenthesis.unwrap_or(defaults.left_parenthesis),
            right_parenthesis: ops.right_parenthesis.unwrap_or(defaults.right_parenthesis),
        },
        ops.quote
            .unwrap_or_else(|| constants::DEFAULT_QUOTE_MARKER.to_string()),
    );
    match syntax.validate() {
        Ok(()) => config.syntax = syntax,
        Err(e) => warnings.push(format!(
            "[operators] {e}. Using default operators (&&, ||, !!, ((, ))."
        )),
    }

    // -- Query: ordering --
    if let Some(ref ordering) = raw.query.ordering {
        match ordering.parse::<SortOrder>() {
            Ok(o) => config.ordering = o,
            Err(_) => warnings.push(
                ConfigError::ValueOutOfRange {
                    field: "[query] ordering".to_string(),
                    value: ordering.clone(),
                    expected: "\"asc\" or \"desc\"; using default (asc)".to_string(),
                }
                .to_string(),
            ),
        }
    }

    // -- Query: limit --
    if let Some(limit) = raw.query.limit {
        config.limit = (limit > 0).then_some(limit);
    }

    // -- Query: case_insensitive --
    if let Some(ci) = raw.query.case_insensitive {
        config.case_insensitive = ci;
    }

    // -- Corpus: max_depth --
    if let Some(depth) = raw.corpus.max_depth {
        if (1..=constants::ABSOLUTE_MAX_DEPTH).contains(&depth) {
            config.max_depth = depth;
        } else {
            warnings.push(
                ConfigError::ValueOutOfRange {
                    field: "[corpus] max_depth".to_string(),
                    value: depth.to_string(),
                    expected: format!(
                        "1-{}; using default ({})",
                        constants::ABSOLUTE_MAX_DEPTH,
                        constants::DEFAULT_MAX_DEPTH
                    ),
                }
                .to_string(),
            );
        }
    }

    // -- Corpus: max_files --
    if let Some(files) = raw.corpus.max_files {
        if (constants::MIN_MAX_FILES..=constants::ABSOLUTE_MAX_FILES).contains(&files) {
            config.max_files = files;
        } else {
            warnings.push(
                ConfigError::ValueOutOfRange {
                    field: "[corpus] max_files".to_string(),
                    value: files.to_string(),
                    expected: format!(
                        "{}-{}; using default ({})",
                        constants::MIN_MAX_FILES,
                        constants::ABSOLUTE_MAX_FILES,
                        constants::DEFAULT_MAX_FILES
                    ),
                }
                .to_string(),
            );
        }
    }

    // -- Corpus: patterns --
    if let Some(patterns) = raw.corpus.include_patterns {
        config.include_patterns = patterns;
    }
    if let Some(patterns) = raw.corpus.exclude_patterns {
        config.exclude_patterns = patterns;
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (warn).",
            ));
        }
    }

    // -- Logging: file --
    if let Some(ref file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file.clone());
        }
    }

    Ok((config, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn parse(content: &str) -> (AppConfig, Vec<String>) {
        parse_config(content, Path::new("config.toml")).unwrap()
    }

    #[test]
    fn test_empty_config_is_default() {
        let (config, warnings) = parse("");
        assert!(warnings.is_empty());
        assert_eq!(config.syntax, QuerySyntax::default());
        assert_eq!(config.ordering, SortOrder::Asc);
        assert_eq!(config.limit, None);
        assert_eq!(config.max_files, constants::DEFAULT_MAX_FILES);
    }

    #[test]
    fn test_full_config() {
        let (config, warnings) = parse(
            r#"
            [operators]
            and = "AND"
            or = "OR"
            not = "NOT"
            left_parenthesis = "["
            right_parenthesis = "]"
            quote = "'"

            [query]
            ordering = "desc"
            limit = 50
            case_insensitive = true

            [corpus]
            max_depth = 3
            max_files = 20
            include_patterns = ["*.out"]

            [logging]
            level = "DEBUG"
            "#,
        );
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        assert_eq!(config.syntax.operators.and, "AND");
        assert_eq!(config.syntax.quote_marker, "'");
        assert_eq!(config.ordering, SortOrder::Desc);
        assert_eq!(config.limit, Some(50));
        assert!(config.case_insensitive);
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.max_files, 20);
        assert_eq!(config.include_patterns, vec!["*.out"]);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_example_config_matches_defaults() {
        let (config, warnings) = parse(include_str!("../../config.example.toml"));
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        assert_eq!(config.syntax, QuerySyntax::default());
        assert_eq!(config.limit, None);
        assert_eq!(config.log_file, None);
        assert_eq!(
            config.exclude_patterns,
            AppConfig::default().exclude_patterns
        );
    }

    #[test]
    fn test_partial_operators_keep_other_defaults() {
        let (config, warnings) = parse("[operators]\nand = \"+\"\n");
        assert!(warnings.is_empty());
        assert_eq!(config.syntax.operators.and, "+");
        assert_eq!(config.syntax.operators.or, "||");
    }

    #[test]
    fn test_duplicate_operators_fall_back_with_warning() {
        let (config, warnings) = parse("[operators]\nand = \"||\"\n");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("[operators]"));
        assert_eq!(config.syntax, QuerySyntax::default());
    }

    #[test]
    fn test_out_of_range_values_warn() {
        let (config, warnings) = parse(
            "[query]\nordering = \"sideways\"\n[corpus]\nmax_depth = 0\nmax_files = 999999\n",
        );
        assert_eq!(warnings.len(), 3);
        assert_eq!(config.ordering, SortOrder::Asc);
        assert_eq!(config.max_depth, constants::DEFAULT_MAX_DEPTH);
        assert_eq!(config.max_files, constants::DEFAULT_MAX_FILES);
    }

    #[test]
    fn test_zero_limit_means_unbounded() {
        let (config, _) = parse("[query]\nlimit = 0\n");
        assert_eq!(config.limit, None);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let (_, warnings) = parse("[future]\nflag = true\n[query]\nnew_key = 1\n");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let result = parse_config("[query\n", Path::new("bad.toml"));
        assert!(matches!(result, Err(ConfigError::TomlParse { .. })));
    }

    #[test]
    fn test_missing_optional_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_config(&dir.path().join("config.toml"), false).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(config.syntax, QuerySyntax::default());
    }

    #[test]
    fn test_missing_required_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(&dir.path().join("config.toml"), true);
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_unparseable_optional_file_warns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "not = [valid").unwrap();
        let (_, warnings) = load_config(&path, false).unwrap();
        assert_eq!(warnings.len(), 1);
    }
}
