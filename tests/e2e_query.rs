// LogQuery - tests/e2e_query.rs
//
// End-to-end tests for the load -> query -> export pipeline.
//
// These tests exercise the real filesystem, real walkdir traversal, real
// config parsing and the real `logquery` binary. No mocks.

use logquery::app::corpus::{discover_files, load_corpus, CorpusConfig};
use logquery::core::export::{export, OutputFormat};
use logquery::core::{LogQuerier, QueryOptions, SortOrder};
use logquery::platform::config::parse_config;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

// =============================================================================
// Helpers
// =============================================================================

/// Absolute path to an on-disk fixture file.
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn fixture_querier() -> LogQuerier {
    let (corpus, warnings) =
        load_corpus(&[fixture("service.log")], &CorpusConfig::default()).unwrap();
    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    let (lines, _) = corpus.into_parts();
    LogQuerier::new(lines).unwrap()
}

/// Run the binary with an empty config file so the user's own config.toml
/// never leaks into the test.
fn logquery(dir: &Path, args: &[&str], stdin: Option<&str>) -> std::process::Output {
    let config = dir.join("config.toml");
    if !config.exists() {
        fs::write(&config, "").unwrap();
    }

    let mut child = Command::new(env!("CARGO_BIN_EXE_logquery"))
        .arg("--config")
        .arg(&config)
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn logquery");

    {
        let mut handle = child.stdin.take().expect("stdin");
        if let Some(input) = stdin {
            handle.write_all(input.as_bytes()).expect("write stdin");
        }
    }

    child.wait_with_output().expect("wait for logquery")
}

fn stdout_lines(output: &std::process::Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

// =============================================================================
// Library pipeline
// =============================================================================

#[test]
fn e2e_and_query_over_fixture() {
    let q = fixture_querier();
    let indices = q
        .query_indices("ERROR && disk", &QueryOptions::default())
        .unwrap();
    assert_eq!(indices, vec![3, 8]);
}

#[test]
fn e2e_not_and_group_over_fixture() {
    let q = fixture_querier();
    let opts = QueryOptions::default();
    assert_eq!(q.query_indices("ERROR && !!disk", &opts).unwrap(), vec![5]);
    assert_eq!(
        q.query_indices("WARN || ((ERROR && network))", &opts).unwrap(),
        vec![2, 5, 6]
    );
}

#[test]
fn e2e_limit_and_ordering_over_fixture() {
    let q = fixture_querier();

    let asc = QueryOptions::new().limit(Some(2));
    assert_eq!(q.query_indices("ERROR", &asc).unwrap(), vec![5, 8]);

    let desc = QueryOptions::new().limit(Some(2)).ordering(SortOrder::Desc);
    assert_eq!(q.query_indices("ERROR", &desc).unwrap(), vec![5, 3]);
}

#[test]
fn e2e_case_insensitive_over_fixture() {
    let q = fixture_querier();
    let opts = QueryOptions::new().case_insensitive(true);
    assert_eq!(q.query_indices("error && DISK", &opts).unwrap(), vec![3, 8]);
}

#[test]
fn e2e_directory_corpus_keeps_origins() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.log"), "boot ok\nerror: disk full\n").unwrap();
    fs::write(dir.path().join("b.log"), "error: network down\n").unwrap();
    fs::write(dir.path().join("c.gz"), "error: compressed\n").unwrap();

    let config = CorpusConfig::default();
    let (files, _) = discover_files(dir.path(), &config).unwrap();
    assert_eq!(files.len(), 2);

    let (corpus, _) = load_corpus(&[dir.path().to_path_buf()], &config).unwrap();
    let (lines, origins) = corpus.into_parts();
    let q = LogQuerier::new(lines).unwrap();

    let indices = q.query_indices("error", &QueryOptions::default()).unwrap();
    let records: Vec<_> = indices
        .iter()
        .map(|&i| origins.record(i, &q.lines()[i]))
        .collect();

    let mut buf = Vec::new();
    export(&records, OutputFormat::Text, &mut buf, Path::new("-"), true).unwrap();
    let output = String::from_utf8(buf).unwrap();

    let expected = format!(
        "{}:2:error: disk full\n{}:1:error: network down\n",
        dir.path().join("a.log").display(),
        dir.path().join("b.log").display()
    );
    assert_eq!(output, expected);
}

#[test]
fn e2e_config_operators_drive_querier() {
    let (config, warnings) = parse_config(
        "[operators]\nand = \" AND \"\nor = \" OR \"\nnot = \"NOT \"\n",
        Path::new("config.toml"),
    )
    .unwrap();
    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");

    let (corpus, _) = load_corpus(&[fixture("service.log")], &CorpusConfig::default()).unwrap();
    let (lines, _) = corpus.into_parts();
    let q = LogQuerier::with_syntax(lines, config.syntax).unwrap();

    assert_eq!(
        q.query_indices("ERROR AND NOT disk", &QueryOptions::default())
            .unwrap(),
        vec![5]
    );
}

// =============================================================================
// Binary
// =============================================================================

#[test]
fn e2e_cli_queries_file() {
    let dir = tempfile::tempdir().unwrap();
    let fixture_path = fixture("service.log");
    let output = logquery(
        dir.path(),
        &[fixture_path.to_str().unwrap(), "-q", "ERROR && disk"],
        None,
    );

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("disk full while writing"));
    assert!(lines[1].contains("disk full while rotating"));
}

#[test]
fn e2e_cli_reads_stdin_with_limit_desc() {
    let dir = tempfile::tempdir().unwrap();
    let input = "error: disk full\ninfo: ok\nwarn: disk slow\nerror: network down\n";
    let output = logquery(
        dir.path(),
        &["-q", "error || warn", "-n", "2", "--order", "desc"],
        Some(input),
    );

    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec!["warn: disk slow", "error: disk full"]);
}

#[test]
fn e2e_cli_json_output_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("matches.json");
    let fixture_path = fixture("service.log");
    let output = logquery(
        dir.path(),
        &[
            fixture_path.to_str().unwrap(),
            "-q",
            "network",
            "--format",
            "json",
            "-o",
            out.to_str().unwrap(),
        ],
        None,
    );

    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(value.as_array().map(Vec::len), Some(1));
    assert_eq!(value[0]["line_number"], 6);
}

#[test]
fn e2e_cli_invalid_query_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = logquery(dir.path(), &["-q", "&& error"], Some("error here\n"));

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("&&"));
}

#[test]
fn e2e_cli_missing_input_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.log");
    let output = logquery(dir.path(), &[missing.to_str().unwrap(), "-q", "x"], None);
    assert_eq!(output.status.code(), Some(1));
}
