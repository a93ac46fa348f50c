// LogQuery - core/export.rs
//
// Plain text, CSV and JSON output of matched lines.
// Core layer: writes to any Write trait object.

use crate::core::model::MatchRecord;
use crate::util::error::ExportError;
use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

/// Output encoding for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One line per match; prefixed with `file:line:` when origins are shown.
    #[default]
    Text,
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!(
                "unknown output format '{other}'. Valid values are: text, csv, json"
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Write `records` in `format`. `export_path` is only used in error messages.
pub fn export<W: Write>(
    records: &[MatchRecord<'_>],
    format: OutputFormat,
    writer: W,
    export_path: &Path,
    show_origin: bool,
) -> Result<usize, ExportError> {
    match format {
        OutputFormat::Text => export_text(records, writer, export_path, show_origin),
        OutputFormat::Csv => export_csv(records, writer, export_path),
        OutputFormat::Json => export_json(records, writer, export_path),
    }
}

/// Write one matched line per output line.
pub fn export_text<W: Write>(
    records: &[MatchRecord<'_>],
    mut writer: W,
    export_path: &Path,
    show_origin: bool,
) -> Result<usize, ExportError> {
    let io_err = |e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    };

    for record in records {
        let written = match (show_origin, record.source, record.line_number) {
            (true, Some(source), Some(line)) => {
                writeln!(writer, "{}:{line}:{}", source.display(), record.text)
            }
            _ => writeln!(writer, "{}", record.text),
        };
        written.map_err(io_err)?;
    }
    writer.flush().map_err(io_err)?;

    Ok(records.len())
}

/// Export matches to CSV.
///
/// Writes: source, line, text
pub fn export_csv<W: Write>(
    records: &[MatchRecord<'_>],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let csv_err = |e| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };

    csv_writer
        .write_record(["source", "line", "text"])
        .map_err(csv_err)?;

    for record in records {
        let source = record
            .source
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let line = record
            .line_number
            .map(|n| n.to_string())
            .unwrap_or_default();
        csv_writer
            .write_record([source.as_str(), line.as_str(), record.text])
            .map_err(csv_err)?;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(records.len())
}

/// Export matches to JSON (array of objects).
pub fn export_json<W: Write>(
    records: &[MatchRecord<'_>],
    mut writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(&mut writer, records).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    let io_err = |e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    };
    writeln!(writer).map_err(io_err)?;
    writer.flush().map_err(io_err)?;
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<MatchRecord<'static>> {
        vec![
            MatchRecord {
                source: Some(Path::new("app.log")),
                line_number: Some(3),
                text: "error: disk full",
            },
            MatchRecord::bare("error: network down"),
        ]
    }

    #[test]
    fn test_text_export_with_origin() {
        let mut buf = Vec::new();
        let count = export_text(&records(), &mut buf, Path::new("-"), true).unwrap();
        assert_eq!(count, 2);
        let output = String::from_utf8(buf).unwrap();
        assert_eq!(output, "app.log:3:error: disk full\nerror: network down\n");
    }

    #[test]
    fn test_text_export_without_origin() {
        let mut buf = Vec::new();
        export_text(&records(), &mut buf, Path::new("-"), false).unwrap();
        let output = String::from_utf8(buf).unwrap();
        assert_eq!(output, "error: disk full\nerror: network down\n");
    }

    #[test]
    fn test_csv_export() {
        let mut buf = Vec::new();
        let count = export_csv(&records(), &mut buf, Path::new("out.csv")).unwrap();
        assert_eq!(count, 2);

        let output = String::from_utf8(buf).unwrap();
        assert!(output.starts_with("source,line,text\n"));
        assert!(output.contains("app.log,3,error: disk full"));
        assert!(output.contains(",,error: network down"));
    }

    #[test]
    fn test_json_export() {
        let mut buf = Vec::new();
        let count = export_json(&records(), &mut buf, Path::new("out.json")).unwrap();
        assert_eq!(count, 2);

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value[0]["source"], "app.log");
        assert_eq!(value[0]["line_number"], 3);
        assert_eq!(value[1]["text"], "error: network down");
        assert!(value[1].get("source").is_none());
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
