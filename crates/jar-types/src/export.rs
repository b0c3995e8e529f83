use std::fmt::Write as _;
use std::str::FromStr;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use thiserror::Error;

use crate::models::MemoryEntry;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported export format: {0}")]
pub struct UnsupportedFormat(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Txt,
}

impl FromStr for ExportFormat {
    type Err = UnsupportedFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "txt" => Ok(Self::Txt),
            other => Err(UnsupportedFormat(other.to_string())),
        }
    }
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Txt => "txt",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Json => "application/json",
            Self::Txt => "text/plain",
        }
    }

    pub fn file_name(self) -> String {
        format!("memories.{}", self.extension())
    }

    /// Serialize every entry, one record each, in the order given.
    pub fn render(self, entries: &[MemoryEntry]) -> serde_json::Result<String> {
        match self {
            Self::Csv => Ok(render_csv(entries)),
            Self::Json => render_json(entries),
            Self::Txt => Ok(render_txt(entries)),
        }
    }
}

fn render_csv(entries: &[MemoryEntry]) -> String {
    let mut out = String::from("Memory,Mood,Created At\r\n");
    for entry in entries {
        push_csv_field(&mut out, &entry.memory);
        out.push(',');
        push_csv_field(&mut out, entry.mood.as_deref().unwrap_or(""));
        out.push(',');
        push_csv_field(&mut out, &entry.created_at_string());
        out.push_str("\r\n");
    }
    out
}

/// RFC 4180 quoting: wrap in quotes only when needed, doubling inner quotes.
fn push_csv_field(out: &mut String, field: &str) {
    if field.contains([',', '"', '\r', '\n']) {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}

fn render_json(entries: &[MemoryEntry]) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    entries.serialize(&mut ser)?;
    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn render_txt(entries: &[MemoryEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(
            out,
            "{} - [{}] {}",
            entry.created_at_string(),
            entry.mood.as_deref().unwrap_or(""),
            entry.memory
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;

    fn sample() -> Vec<MemoryEntry> {
        let at = |s: &str| NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).unwrap();
        vec![
            MemoryEntry {
                memory: "First snow".into(),
                mood: Some("happy".into()),
                created_at: at("2024-01-10 07:15:00"),
            },
            MemoryEntry {
                memory: "Said \"goodbye\", then left".into(),
                mood: Some("sad".into()),
                created_at: at("2024-02-02 21:00:05"),
            },
            MemoryEntry {
                memory: "Quiet day".into(),
                mood: None,
                created_at: at("2024-02-03 12:00:00"),
            },
        ]
    }

    #[test]
    fn test_parse_formats() {
        assert_eq!("csv".parse::<ExportFormat>(), Ok(ExportFormat::Csv));
        assert_eq!("json".parse::<ExportFormat>(), Ok(ExportFormat::Json));
        assert_eq!("txt".parse::<ExportFormat>(), Ok(ExportFormat::Txt));
        assert_eq!(
            "xml".parse::<ExportFormat>(),
            Err(UnsupportedFormat("xml".into()))
        );
        assert!("CSV".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_csv_quotes_fields_that_need_it() {
        let csv = ExportFormat::Csv.render(&sample()).unwrap();
        let lines: Vec<&str> = csv.split("\r\n").filter(|l| !l.is_empty()).collect();
        assert_eq!(
            lines,
            vec![
                "Memory,Mood,Created At",
                "First snow,happy,2024-01-10 07:15:00",
                "\"Said \"\"goodbye\"\", then left\",sad,2024-02-02 21:00:05",
                "Quiet day,,2024-02-03 12:00:00",
            ]
        );
    }

    #[test]
    fn test_csv_keeps_embedded_newlines_inside_quotes() {
        let mut entries = sample();
        entries.truncate(1);
        entries[0].memory = "line one\nline two".into();
        let csv = ExportFormat::Csv.render(&entries).unwrap();
        assert!(csv.contains("\"line one\nline two\",happy,"));
    }

    #[test]
    fn test_json_has_one_object_per_entry() {
        let entries = sample();
        let json = ExportFormat::Json.render(&entries).unwrap();
        assert!(json.starts_with("[\n    {\n        \"memory\""));

        let parsed: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), entries.len());
        assert_eq!(parsed[1]["memory"], "Said \"goodbye\", then left");
        assert_eq!(parsed[1]["mood"], "sad");
        assert_eq!(parsed[1]["created_at"], "2024-02-02 21:00:05");
        assert!(parsed[2]["mood"].is_null());
    }

    #[test]
    fn test_txt_line_per_entry() {
        let txt = ExportFormat::Txt.render(&sample()).unwrap();
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "2024-01-10 07:15:00 - [happy] First snow");
        assert_eq!(lines[2], "2024-02-03 12:00:00 - [] Quiet day");
    }

    #[test]
    fn test_empty_exports() {
        assert_eq!(ExportFormat::Csv.render(&[]).unwrap(), "Memory,Mood,Created At\r\n");
        assert_eq!(ExportFormat::Json.render(&[]).unwrap(), "[]");
        assert_eq!(ExportFormat::Txt.render(&[]).unwrap(), "");
    }
}
