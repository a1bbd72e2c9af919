//! Persistent, capacity-bounded activity log.
//!
//! The whole entry list lives in one JSON blob under a fixed key. Every operation is
//! best effort: read failures look like an empty log, write failures are reported
//! through `tracing` and otherwise ignored.
//!
//! `append` is a load-modify-store sequence with no locking. Two appends racing on
//! the same store may lose one of the entries; callers are expected to append from a
//! single task at a time.

pub mod record;
pub mod store;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::app::config::{LogStoreSettings, DEFAULT_LOG_KEY, DEFAULT_MAX_LOG_ENTRIES};
use crate::app::error::AppError;
use crate::app::models::{ExportFormat, LogEntry, LogLevel, LogStats};

use record::{decode_records, encode_records};
use store::KeyValueStore;

#[derive(Clone)]
pub struct ActivityLog {
    store: Arc<dyn KeyValueStore>,
    key: String,
    max_entries: usize,
}

impl ActivityLog {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            key: DEFAULT_LOG_KEY.to_string(),
            max_entries: DEFAULT_MAX_LOG_ENTRIES,
        }
    }

    pub fn with_settings(store: Arc<dyn KeyValueStore>, settings: &LogStoreSettings) -> Self {
        Self {
            store,
            key: settings.storage_key.clone(),
            max_entries: settings.max_entries.max(1),
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub async fn append(&self, message: impl Into<String>, level: LogLevel, source: Option<&str>) {
        let entry = LogEntry {
            id: new_entry_id(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            message: message.into(),
            level,
            source: source.map(|value| value.to_string()),
        };
        if let Err(err) = self.append_entry(entry).await {
            warn!(
                error = %err.error,
                code = %err.code,
                key = %self.key,
                "failed to persist activity log entry"
            );
        }
    }

    pub async fn append_info(&self, message: impl Into<String>) {
        self.append(message, LogLevel::Info, None).await;
    }

    async fn append_entry(&self, entry: LogEntry) -> Result<(), AppError> {
        let raw = self.store.get_item(&self.key).await?;
        let mut entries = match raw.as_deref().map(|raw| decode_records(raw, "")) {
            None => Vec::new(),
            Some(Ok(entries)) => entries,
            Some(Err(err)) => {
                warn!(error = %err.error, key = %self.key, "discarding corrupt activity log");
                Vec::new()
            }
        };
        entries.push(entry);
        if entries.len() > self.max_entries {
            let overflow = entries.len() - self.max_entries;
            entries.drain(..overflow);
        }
        let payload = encode_records(&entries, "")?;
        self.store.set_item(&self.key, &payload).await
    }

    async fn load(&self) -> Result<Vec<LogEntry>, AppError> {
        match self.store.get_item(&self.key).await? {
            Some(raw) => decode_records(&raw, ""),
            None => Ok(Vec::new()),
        }
    }

    /// All entries, oldest first. Legacy records are upgraded in the returned copy only.
    pub async fn list(&self) -> Vec<LogEntry> {
        match self.load().await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(error = %err.error, code = %err.code, "failed to read activity log");
                Vec::new()
            }
        }
    }

    pub async fn clear(&self) {
        match self.store.remove_item(&self.key).await {
            Ok(()) => debug!(key = %self.key, "activity log cleared"),
            Err(err) => warn!(error = %err.error, "failed to clear activity log"),
        }
    }

    pub async fn export(&self, format: ExportFormat) -> String {
        let entries = self.list().await;
        match format {
            ExportFormat::Text => format_text(&entries),
            ExportFormat::Structured => serde_json::to_string_pretty(&entries).unwrap_or_else(|err| {
                warn!(error = %err, "failed to serialize activity log export");
                "[]".to_string()
            }),
        }
    }

    /// Writes `bootgenie-logs-<date>.<ext>` into `dir` and returns its path.
    pub async fn export_to_file(
        &self,
        dir: &Path,
        format: ExportFormat,
        trace_id: &str,
    ) -> Result<PathBuf, AppError> {
        tokio::fs::create_dir_all(dir).await.map_err(|err| {
            AppError::system(format!("Failed to create export dir: {err}"), trace_id)
        })?;
        let filename = format!(
            "bootgenie-logs-{}.{}",
            Utc::now().format("%Y-%m-%d"),
            format.file_extension()
        );
        let path = dir.join(filename);
        let content = self.export(format).await;
        tokio::fs::write(&path, content)
            .await
            .map_err(|err| AppError::system(format!("Failed to write export: {err}"), trace_id))?;
        Ok(path)
    }

    pub async fn statistics(&self) -> LogStats {
        compute_stats(&self.list().await)
    }

    pub async fn filter_by_level(&self, level: LogLevel) -> Vec<LogEntry> {
        self.list()
            .await
            .into_iter()
            .filter(|entry| entry.level == level)
            .collect()
    }

    pub async fn recent(&self, count: usize) -> Vec<LogEntry> {
        let mut entries = self.list().await;
        let skip = entries.len().saturating_sub(count);
        entries.drain(..skip);
        entries
    }
}

fn new_entry_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", Utc::now().timestamp_millis(), &suffix[..9])
}

// Embedded newlines would split one entry across several export lines.
fn one_line(value: &str) -> String {
    value.replace('\r', "\\r").replace('\n', "\\n")
}

pub fn format_text_line(entry: &LogEntry) -> String {
    let timestamp = one_line(&entry.timestamp);
    let level = entry.level.as_str().to_uppercase();
    let message = one_line(&entry.message);
    match entry.source.as_deref().filter(|source| !source.is_empty()) {
        Some(source) => format!("[{timestamp}] [{level}] [{}] {message}", one_line(source)),
        None => format!("[{timestamp}] [{level}] {message}"),
    }
}

fn format_text(entries: &[LogEntry]) -> String {
    entries
        .iter()
        .map(format_text_line)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn compute_stats(entries: &[LogEntry]) -> LogStats {
    entries.iter().fold(
        LogStats {
            total: entries.len(),
            ..LogStats::default()
        },
        |mut stats, entry| {
            match entry.level {
                LogLevel::Info => stats.info += 1,
                LogLevel::Warning => stats.warning += 1,
                LogLevel::Error => stats.error += 1,
                LogLevel::Success => stats.success += 1,
                LogLevel::Command => stats.command += 1,
            }
            stats
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use store::{FileKeyValueStore, MemoryKeyValueStore};
    use tempfile::TempDir;

    fn memory_log() -> (Arc<MemoryKeyValueStore>, ActivityLog) {
        let store = Arc::new(MemoryKeyValueStore::new());
        let log = ActivityLog::new(store.clone());
        (store, log)
    }

    struct BrokenStore;

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn get_item(&self, _key: &str) -> Result<Option<String>, AppError> {
            Err(AppError::storage("storage unavailable", ""))
        }
        async fn set_item(&self, _key: &str, _value: &str) -> Result<(), AppError> {
            Err(AppError::storage("storage unavailable", ""))
        }
        async fn remove_item(&self, _key: &str) -> Result<(), AppError> {
            Err(AppError::storage("storage unavailable", ""))
        }
    }

    #[tokio::test]
    async fn keeps_most_recent_entries_in_order_when_over_capacity() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let settings = LogStoreSettings {
            max_entries: 1000,
            ..LogStoreSettings::default()
        };
        let log = ActivityLog::with_settings(store, &settings);

        for i in 0..1005 {
            log.append(format!("entry {i}"), LogLevel::Info, None).await;
        }

        let entries = log.list().await;
        assert_eq!(entries.len(), 1000);
        assert_eq!(entries.first().map(|e| e.message.as_str()), Some("entry 5"));
        assert_eq!(entries.last().map(|e| e.message.as_str()), Some("entry 1004"));
        for (offset, entry) in entries.iter().enumerate() {
            assert_eq!(entry.message, format!("entry {}", offset + 5));
        }
    }

    #[tokio::test]
    async fn append_assigns_unique_ids_and_timestamps() {
        let (_, log) = memory_log();
        log.append("one", LogLevel::Command, Some("Guide")).await;
        log.append("two", LogLevel::Command, Some("Guide")).await;
        let entries = log.list().await;
        assert_eq!(entries.len(), 2);
        assert_ne!(entries[0].id, entries[1].id);
        assert!(chrono::DateTime::parse_from_rfc3339(&entries[0].timestamp).is_ok());
        assert_eq!(entries[0].source.as_deref(), Some("Guide"));
    }

    #[tokio::test]
    async fn clear_empties_log_and_is_idempotent() {
        let (_, log) = memory_log();
        log.clear().await;
        log.append_info("hello").await;
        log.clear().await;
        assert!(log.list().await.is_empty());
        log.clear().await;
        assert!(log.list().await.is_empty());
    }

    #[tokio::test]
    async fn legacy_strings_upgrade_on_read_and_persist_structured_on_append() {
        let (store, log) = memory_log();
        let legacy = serde_json::json!([
            "[2024-05-01T10:00:00.000Z] Starting device detection...",
            "[2024-05-01T10:00:02.500Z] No device detected"
        ])
        .to_string();
        store.set_item(DEFAULT_LOG_KEY, &legacy).await.expect("seed");

        let entries = log.list().await;
        assert_eq!(entries.len(), 2);
        for entry in &entries {
            assert_eq!(entry.level, LogLevel::Info);
            assert!(!entry.message.is_empty());
        }
        assert_eq!(
            entries[1].message,
            "[2024-05-01T10:00:02.500Z] No device detected"
        );

        // Reading alone leaves the legacy blob untouched.
        let raw = store.get_item(DEFAULT_LOG_KEY).await.expect("get").expect("blob");
        assert_eq!(raw, legacy);

        log.append("fresh", LogLevel::Success, None).await;
        let raw = store.get_item(DEFAULT_LOG_KEY).await.expect("get").expect("blob");
        let values: Vec<serde_json::Value> = serde_json::from_str(&raw).expect("array");
        assert_eq!(values.len(), 3);
        assert!(values.iter().all(|value| value.is_object()));
    }

    #[tokio::test]
    async fn text_export_has_one_line_per_entry() {
        let (_, log) = memory_log();
        log.append("Starting diagnostic checks...", LogLevel::Info, Some("Diagnostics"))
            .await;
        log.append("multi\nline", LogLevel::Error, None).await;
        log.append("done", LogLevel::Success, Some("Diagnostics")).await;

        let entries = log.list().await;
        let text = log.export(ExportFormat::Text).await;
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), entries.len());
        for (line, entry) in lines.iter().zip(&entries) {
            assert!(line.contains(&entry.timestamp));
        }
        assert!(lines[0].ends_with("[INFO] [Diagnostics] Starting diagnostic checks..."));
        assert!(lines[1].ends_with("[ERROR] multi\\nline"));
    }

    #[tokio::test]
    async fn text_export_escapes_newlines_in_source_and_timestamp() {
        let (store, log) = memory_log();
        log.append("one", LogLevel::Info, Some("Diag\nnostics")).await;
        log.append("two", LogLevel::Info, None).await;
        let text = log.export(ExportFormat::Text).await;
        assert_eq!(text.lines().count(), log.list().await.len());
        assert!(text.contains("[Diag\\nnostics] one"));

        let raw = serde_json::json!([{
            "id": "x",
            "timestamp": "2024-05-01\r\nT10:00:00Z",
            "message": "stored",
            "level": "warning"
        }])
        .to_string();
        store.set_item(DEFAULT_LOG_KEY, &raw).await.expect("seed");
        let text = log.export(ExportFormat::Text).await;
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("[2024-05-01\\r\\nT10:00:00Z] [WARNING] stored"));
    }

    #[tokio::test]
    async fn structured_export_is_lossless() {
        let (_, log) = memory_log();
        log.append("a", LogLevel::Warning, Some("Detect")).await;
        log.append("b", LogLevel::Command, None).await;
        let exported = log.export(ExportFormat::Structured).await;
        let decoded: Vec<LogEntry> = serde_json::from_str(&exported).expect("json");
        assert_eq!(decoded, log.list().await);
    }

    #[tokio::test]
    async fn statistics_and_derived_views() {
        let (_, log) = memory_log();
        log.append("i", LogLevel::Info, None).await;
        log.append("c1", LogLevel::Command, None).await;
        log.append("c2", LogLevel::Command, None).await;
        log.append("e", LogLevel::Error, None).await;

        let stats = log.statistics().await;
        assert_eq!(stats.total, 4);
        assert_eq!(stats.count(LogLevel::Command), 2);
        assert_eq!(stats.error, 1);
        assert_eq!(stats.success, 0);

        let commands = log.filter_by_level(LogLevel::Command).await;
        assert_eq!(
            commands.iter().map(|e| e.message.as_str()).collect::<Vec<_>>(),
            vec!["c1", "c2"]
        );

        let recent = log.recent(2).await;
        assert_eq!(
            recent.iter().map(|e| e.message.as_str()).collect::<Vec<_>>(),
            vec!["c2", "e"]
        );
        assert_eq!(log.recent(10).await.len(), 4);
        assert!(log.recent(0).await.is_empty());
    }

    #[tokio::test]
    async fn storage_failures_degrade_silently() {
        let log = ActivityLog::new(Arc::new(BrokenStore));
        log.append_info("lost").await;
        log.clear().await;
        assert!(log.list().await.is_empty());
        assert_eq!(log.statistics().await.total, 0);
        assert_eq!(log.export(ExportFormat::Text).await, "");
    }

    #[tokio::test]
    async fn corrupt_blob_reads_empty_and_is_replaced_on_append() {
        let (store, log) = memory_log();
        store
            .set_item(DEFAULT_LOG_KEY, "not json at all")
            .await
            .expect("seed");
        assert!(log.list().await.is_empty());
        log.append_info("recovered").await;
        let entries = log.list().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "recovered");
    }

    #[tokio::test]
    async fn file_backed_log_survives_reopen_and_exports_to_file() {
        let dir = TempDir::new().expect("tmp");
        let store: Arc<dyn KeyValueStore> = Arc::new(FileKeyValueStore::new(dir.path()));
        ActivityLog::new(store.clone())
            .append("persisted", LogLevel::Success, Some("Guide"))
            .await;

        let reopened = ActivityLog::new(Arc::new(FileKeyValueStore::new(dir.path())));
        let entries = reopened.list().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "persisted");

        let path = reopened
            .export_to_file(&dir.path().join("exports"), ExportFormat::Text, "trace")
            .await
            .expect("export");
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        assert!(name.starts_with("bootgenie-logs-"));
        assert!(name.ends_with(".txt"));
        let content = std::fs::read_to_string(&path).expect("read");
        assert!(content.contains("[SUCCESS] [Guide] persisted"));
    }
}
