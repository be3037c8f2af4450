//! Serializing flattened profile rows for the `scrape` command.

use std::io::Write;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use orgscrape_core::{ProfileRow, RunSummary};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// One JSON document with run metadata and every row
    Json,
    /// One row per line, no metadata
    Jsonl,
    /// Header row plus one record per row, no metadata
    Csv,
}

#[derive(Debug, Serialize)]
struct ExportDocument<'a> {
    generated_at: DateTime<Utc>,
    summary: &'a RunSummary,
    rows: &'a [ProfileRow],
}

/// Writes `rows` to `writer` in `format`.
///
/// # Errors
///
/// Returns an error if serialization or the underlying write fails.
pub(crate) fn write_export<W: Write>(
    mut writer: W,
    format: OutputFormat,
    rows: &[ProfileRow],
    summary: &RunSummary,
    generated_at: DateTime<Utc>,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let document = ExportDocument {
                generated_at,
                summary,
                rows,
            };
            serde_json::to_writer_pretty(&mut writer, &document)?;
            writeln!(writer)?;
        }
        OutputFormat::Jsonl => {
            for row in rows {
                serde_json::to_writer(&mut writer, row)?;
                writeln!(writer)?;
            }
        }
        OutputFormat::Csv => {
            // Headers come from the first serialized row; no rows, no output.
            let mut csv = csv::Writer::from_writer(&mut writer);
            for row in rows {
                csv.serialize(row)?;
            }
            csv.flush()?;
        }
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use orgscrape_core::FailedTarget;

    use super::*;

    fn rows() -> Vec<ProfileRow> {
        vec![
            ProfileRow {
                name: "Acme".to_string(),
                post_text: "first".to_string(),
                ..ProfileRow::default()
            },
            ProfileRow {
                name: "Acme".to_string(),
                post_text: "second".to_string(),
                ..ProfileRow::default()
            },
        ]
    }

    fn summary() -> RunSummary {
        RunSummary {
            attempted: 2,
            collected: 1,
            failed: vec![FailedTarget {
                target: "https://www.linkedin.com/company/gone".to_string(),
                reason: "navigation failed".to_string(),
            }],
        }
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn jsonl_writes_one_row_per_line() {
        let mut out = Vec::new();
        write_export(&mut out, OutputFormat::Jsonl, &rows(), &summary(), at()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["name"], "Acme");
        assert_eq!(first["post_text"], "first");
    }

    #[test]
    fn json_wraps_rows_with_metadata() {
        let mut out = Vec::new();
        write_export(&mut out, OutputFormat::Json, &rows(), &summary(), at()).unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(doc["generated_at"], "2024-05-01T12:00:00Z");
        assert_eq!(doc["summary"]["attempted"], 2);
        assert_eq!(doc["summary"]["failed"][0]["reason"], "navigation failed");
        assert_eq!(doc["rows"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn csv_writes_header_then_records() {
        let mut out = Vec::new();
        write_export(&mut out, OutputFormat::Csv, &rows()[..1], &summary(), at()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(
            lines[0].starts_with("source_url,name,industry,location,followers,"),
            "unexpected header: {}",
            lines[0]
        );
        assert!(lines[0].ends_with(",post_likes,post_comments,post_link"));
        assert_eq!(lines[1], ",Acme,,,,,,,,,,,,,,,,,,first,,,");
    }

    #[test]
    fn csv_quotes_fields_with_commas() {
        let rows = vec![ProfileRow {
            location: "Bengaluru, India".to_string(),
            post_text: "line one\nline two".to_string(),
            ..ProfileRow::default()
        }];
        let mut out = Vec::new();
        write_export(&mut out, OutputFormat::Csv, &rows, &summary(), at()).unwrap();

        let mut reader = csv::Reader::from_reader(out.as_slice());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[3], "Bengaluru, India");
        assert_eq!(&record[19], "line one\nline two");
    }

    #[test]
    fn jsonl_with_no_rows_is_empty() {
        let mut out = Vec::new();
        write_export(&mut out, OutputFormat::Jsonl, &[], &summary(), at()).unwrap();
        assert!(out.is_empty());
    }
}
