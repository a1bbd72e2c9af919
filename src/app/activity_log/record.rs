use chrono::DateTime;
use serde::Deserialize;
use tracing::warn;

use crate::app::error::AppError;
use crate::app::models::{LogEntry, LogLevel};

pub const LEGACY_FALLBACK_TIMESTAMP: &str = "1970-01-01T00:00:00.000Z";

/// One element of the persisted array, as found on disk.
///
/// Older builds stored `"[<iso timestamp>] <message>"` strings; current builds store objects.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum StoredRecord {
    Structured(LogEntry),
    Legacy(String),
}

impl StoredRecord {
    pub fn into_entry(self, index: usize) -> LogEntry {
        match self {
            StoredRecord::Structured(entry) => entry,
            StoredRecord::Legacy(line) => upgrade_legacy_line(line, index),
        }
    }
}

pub fn upgrade_legacy_line(line: String, index: usize) -> LogEntry {
    let timestamp =
        legacy_timestamp(&line).unwrap_or_else(|| LEGACY_FALLBACK_TIMESTAMP.to_string());
    LogEntry {
        id: format!("legacy-{index}"),
        timestamp,
        message: line,
        level: LogLevel::Info,
        source: None,
    }
}

fn legacy_timestamp(line: &str) -> Option<String> {
    let rest = line.strip_prefix('[')?;
    let (candidate, _) = rest.split_once(']')?;
    DateTime::parse_from_rfc3339(candidate.trim())
        .ok()
        .map(|_| candidate.trim().to_string())
}

/// Decodes the whole persisted blob. Elements that are neither shape are skipped;
/// a blob that is not a JSON array is an error.
pub fn decode_records(raw: &str, trace_id: &str) -> Result<Vec<LogEntry>, AppError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    let values: Vec<serde_json::Value> = serde_json::from_str(raw)
        .map_err(|err| AppError::storage(format!("Corrupt log blob: {err}"), trace_id))?;
    let mut entries = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<StoredRecord>(value) {
            Ok(record) => entries.push(record.into_entry(index)),
            Err(err) => {
                warn!(trace_id = %trace_id, index, error = %err, "skipping undecodable log record");
            }
        }
    }
    Ok(entries)
}

pub fn encode_records(entries: &[LogEntry], trace_id: &str) -> Result<String, AppError> {
    serde_json::to_string(entries)
        .map_err(|err| AppError::system(format!("Failed to encode log entries: {err}"), trace_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_mixed_legacy_and_structured_records() {
        let raw = serde_json::json!([
            "[2024-05-01T10:00:00.000Z] Starting device detection...",
            {
                "id": "1714557601000-abc123def",
                "timestamp": "2024-05-01T10:00:01.000Z",
                "message": "Device detected: Xiaomi Mi 11",
                "level": "success",
                "source": "Detect"
            },
            "no prefix at all"
        ])
        .to_string();

        let entries = decode_records(&raw, "trace").expect("decode");
        assert_eq!(entries.len(), 3);

        assert_eq!(entries[0].id, "legacy-0");
        assert_eq!(entries[0].level, LogLevel::Info);
        assert_eq!(entries[0].timestamp, "2024-05-01T10:00:00.000Z");
        assert_eq!(
            entries[0].message,
            "[2024-05-01T10:00:00.000Z] Starting device detection..."
        );
        assert_eq!(entries[0].source, None);

        assert_eq!(entries[1].level, LogLevel::Success);
        assert_eq!(entries[1].source.as_deref(), Some("Detect"));

        assert_eq!(entries[2].timestamp, LEGACY_FALLBACK_TIMESTAMP);
        assert_eq!(entries[2].message, "no prefix at all");
    }

    #[test]
    fn bracket_without_timestamp_falls_back() {
        let entry = upgrade_legacy_line("[adb] reboot".to_string(), 4);
        assert_eq!(entry.timestamp, LEGACY_FALLBACK_TIMESTAMP);
        assert_eq!(entry.id, "legacy-4");
    }

    #[test]
    fn skips_records_of_unknown_shape() {
        let raw = r#"[42, {"unexpected": true}, "kept"]"#;
        let entries = decode_records(raw, "trace").expect("decode");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "kept");
        assert_eq!(entries[0].id, "legacy-2");
    }

    #[test]
    fn non_array_blob_is_a_storage_error() {
        let err = decode_records("{\"oops\":1}", "trace-x").expect_err("corrupt");
        assert_eq!(err.code, "ERR_STORAGE");
        assert_eq!(err.trace_id, "trace-x");
        assert!(decode_records("   ", "trace").expect("blank").is_empty());
    }
}
