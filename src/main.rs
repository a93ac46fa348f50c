// LogQuery - main.rs
//
// Command-line entry point. Handles:
// 1. CLI argument parsing
// 2. Config loading (platform default or --config)
// 3. Logging initialisation (debug mode support)
// 4. Corpus loading, query evaluation and output

use logquery::app::corpus::{self, CorpusConfig};
use logquery::core::export::{self, OutputFormat};
use logquery::core::{LogQuerier, QueryOptions, SortOrder};
use logquery::platform::config::{self, AppConfig, PlatformPaths};
use logquery::util::error::{ExportError, Result};
use logquery::util::{constants, logging};

use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

/// LogQuery - boolean search over log lines.
///
/// Evaluates a query such as `error && (( disk || network ))` against every
/// line of the given files and directories (or standard input) and prints
/// the lines that match.
#[derive(Parser, Debug)]
#[command(name = "logquery", version, about)]
struct Cli {
    /// Log files or directories to search. Reads standard input if omitted.
    paths: Vec<PathBuf>,

    /// Query expression. An empty query matches every line.
    #[arg(short = 'q', long = "query", default_value = "")]
    query: String,

    /// Maximum number of lines to return (0 = unlimited).
    #[arg(short = 'n', long = "limit")]
    limit: Option<usize>,

    /// Result ordering when a limit applies: asc keeps the latest matches,
    /// desc returns the earliest matches newest-first.
    #[arg(long = "order")]
    order: Option<SortOrder>,

    /// Match operands case-insensitively.
    #[arg(short = 'i', long = "ignore-case")]
    ignore_case: bool,

    /// Output format.
    #[arg(long = "format", default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Prefix text output with `file:line:`.
    #[arg(short = 'H', long = "with-origin")]
    with_origin: bool,

    /// Write results to this file instead of standard output.
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Configuration file (defaults to the platform config directory).
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    // Config is read before logging starts so [logging] can take effect;
    // its warnings are replayed once the subscriber is installed.
    let (app_config, config_warnings) = match cli.config.as_deref() {
        Some(path) => match config::load_config(path, true) {
            Ok(loaded) => loaded,
            Err(e) => {
                eprintln!("logquery: {e}");
                std::process::exit(1);
            }
        },
        None => {
            let paths = PlatformPaths::resolve();
            // With required = false every failure is folded into warnings.
            config::load_config(&paths.config_file(), false)
                .unwrap_or_else(|e| (AppConfig::default(), vec![e.to_string()]))
        }
    };

    logging::init(
        cli.debug,
        app_config.log_level.as_deref(),
        app_config.log_file.as_deref(),
    );

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        "LogQuery starting"
    );

    for warning in &config_warnings {
        tracing::warn!("{}", warning);
        eprintln!("logquery: warning: {warning}");
    }

    match run(&cli, &app_config) {
        Ok(count) => tracing::info!(matched = count, "Query complete"),
        Err(e) => {
            tracing::error!(error = %e, "Query failed");
            eprintln!("logquery: {e}");
            std::process::exit(1);
        }
    }
}

/// Load the corpus, evaluate the query and write the results.
/// Returns the number of lines written.
fn run(cli: &Cli, app_config: &AppConfig) -> Result<usize> {
    let corpus_config = CorpusConfig {
        max_depth: app_config.max_depth,
        max_files: app_config.max_files,
        include_patterns: app_config.include_patterns.clone(),
        exclude_patterns: app_config.exclude_patterns.clone(),
        ..CorpusConfig::default()
    };

    let corpus = if cli.paths.is_empty() {
        corpus::load_reader(io::stdin().lock())?
    } else {
        let (corpus, warnings) = corpus::load_corpus(&cli.paths, &corpus_config)?;
        for warning in &warnings {
            eprintln!("logquery: warning: {warning}");
        }
        corpus
    };

    let (lines, origins) = corpus.into_parts();
    let querier = LogQuerier::with_syntax(lines, app_config.syntax.clone())?;

    let options = QueryOptions::new()
        .limit(cli.limit.or(app_config.limit))
        .ordering(cli.order.unwrap_or(app_config.ordering))
        .case_insensitive(cli.ignore_case || app_config.case_insensitive);

    let indices = querier.query_indices(&cli.query, &options)?;
    let records: Vec<_> = indices
        .iter()
        .map(|&i| origins.record(i, &querier.lines()[i]))
        .collect();

    let written = match cli.output.as_deref() {
        Some(path) => {
            let file = File::create(path).map_err(|e| ExportError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;
            export::export(&records, cli.format, BufWriter::new(file), path, cli.with_origin)?
        }
        None => export::export(
            &records,
            cli.format,
            BufWriter::new(io::stdout().lock()),
            Path::new("<stdout>"),
            cli.with_origin,
        )?,
    };

    Ok(written)
}
