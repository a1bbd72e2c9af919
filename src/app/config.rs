use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app::activity_log::store::validate_storage_key;
use crate::app::error::AppError;

pub const DEFAULT_LOG_KEY: &str = "bootgenie_logs";
pub const DEFAULT_MAX_LOG_ENTRIES: usize = 1000;
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogStoreSettings {
    pub storage_key: String,
    pub max_entries: usize,
    pub store_dir: String,
}

impl Default for LogStoreSettings {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_LOG_KEY.to_string(),
            max_entries: DEFAULT_MAX_LOG_ENTRIES,
            store_dir: String::new(),
        }
    }
}

impl LogStoreSettings {
    /// Empty `store_dir` means the per-user data directory.
    pub fn resolved_store_dir(&self) -> PathBuf {
        if !self.store_dir.trim().is_empty() {
            return PathBuf::from(self.store_dir.trim());
        }
        dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("bootgenie")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationSettings {
    pub detect_latency_ms: u64,
    pub adb_latency_ms: u64,
    pub fastboot_latency_ms: u64,
    pub status_latency_ms: u64,
    pub diagnostic_step_delay_ms: u64,
    pub detect_miss_rate: f64,
    pub adb_success_rate: f64,
    pub fastboot_success_rate: f64,
    pub seed: Option<u64>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            detect_latency_ms: 2500,
            adb_latency_ms: 1500,
            fastboot_latency_ms: 2000,
            status_latency_ms: 1000,
            diagnostic_step_delay_ms: 1000,
            detect_miss_rate: 0.2,
            adb_success_rate: 0.9,
            fastboot_success_rate: 0.85,
            seed: None,
        }
    }
}

impl SimulationSettings {
    /// Same probabilities, no waiting. Used by tests and the smoke binary's `--fast` flag.
    pub fn instant() -> Self {
        Self {
            detect_latency_ms: 0,
            adb_latency_ms: 0,
            fastboot_latency_ms: 0,
            status_latency_ms: 0,
            diagnostic_step_delay_ms: 0,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LookupSettings {
    pub api_base: String,
    pub per_page: u32,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            per_page: 10,
            timeout_secs: 10,
            user_agent: format!("bootgenie/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    pub log_level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub log_store: LogStoreSettings,
    #[serde(default)]
    pub simulation: SimulationSettings,
    #[serde(default)]
    pub lookup: LookupSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub version: String,
}

pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("BOOTGENIE_CONFIG_PATH") {
        return PathBuf::from(path);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".bootgenie_config.json")
}

pub fn backup_config_path() -> PathBuf {
    let mut path = config_path().into_os_string();
    path.push(".bak");
    PathBuf::from(path)
}

pub fn load_config(trace_id: &str) -> Result<AppConfig, AppError> {
    load_config_from_path(&config_path(), trace_id)
}

pub fn save_config(config: &AppConfig, trace_id: &str) -> Result<(), AppError> {
    save_config_to_path(config, &config_path(), &backup_config_path(), trace_id)
}

pub fn load_config_from_path(path: &Path, trace_id: &str) -> Result<AppConfig, AppError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let raw = fs::read_to_string(path)
        .map_err(|err| AppError::system(format!("Failed to read config: {err}"), trace_id))?;
    let value: serde_json::Value = serde_json::from_str(&raw)
        .map_err(|err| AppError::validation(format!("Failed to parse config: {err}"), trace_id))?;
    let mut config: AppConfig = serde_json::from_value(value.clone()).unwrap_or_default();
    config = apply_legacy_overrides(config, &value);
    Ok(validate_config(config))
}

pub fn save_config_to_path(
    config: &AppConfig,
    path: &Path,
    backup_path: &Path,
    trace_id: &str,
) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    if path.exists() {
        let _ = fs::copy(path, backup_path);
    }
    let payload = serde_json::to_string_pretty(config)
        .map_err(|err| AppError::system(format!("Failed to serialize config: {err}"), trace_id))?;
    fs::write(path, payload)
        .map_err(|err| AppError::system(format!("Failed to write config: {err}"), trace_id))?;
    Ok(())
}

// Early builds wrote a flat object with these three keys.
fn apply_legacy_overrides(mut config: AppConfig, value: &serde_json::Value) -> AppConfig {
    if let Some(max_logs) = value.get("max_logs").and_then(|v| v.as_u64()) {
        config.log_store.max_entries = max_logs as usize;
    }
    if let Some(log_key) = value.get("log_key").and_then(|v| v.as_str()) {
        config.log_store.storage_key = log_key.to_string();
    }
    if let Some(api_base) = value.get("api_base").and_then(|v| v.as_str()) {
        config.lookup.api_base = api_base.to_string();
    }
    config
}

fn validate_config(mut config: AppConfig) -> AppConfig {
    let defaults = AppConfig::default();
    if config.log_store.max_entries == 0 {
        config.log_store.max_entries = DEFAULT_MAX_LOG_ENTRIES;
    }
    if validate_storage_key(&config.log_store.storage_key).is_err() {
        config.log_store.storage_key = DEFAULT_LOG_KEY.to_string();
    }
    let sim = &mut config.simulation;
    if !(0.0..=1.0).contains(&sim.detect_miss_rate) {
        sim.detect_miss_rate = defaults.simulation.detect_miss_rate;
    }
    if !(0.0..=1.0).contains(&sim.adb_success_rate) {
        sim.adb_success_rate = defaults.simulation.adb_success_rate;
    }
    if !(0.0..=1.0).contains(&sim.fastboot_success_rate) {
        sim.fastboot_success_rate = defaults.simulation.fastboot_success_rate;
    }
    if config.lookup.api_base.trim().is_empty() {
        config.lookup.api_base = DEFAULT_API_BASE.to_string();
    }
    config.lookup.api_base = config.lookup.api_base.trim_end_matches('/').to_string();
    if config.lookup.per_page == 0 || config.lookup.per_page > 100 {
        config.lookup.per_page = defaults.lookup.per_page;
    }
    if config.lookup.timeout_secs == 0 {
        config.lookup.timeout_secs = defaults.lookup.timeout_secs;
    }
    if config.logging.log_level.trim().is_empty() {
        config.logging.log_level = defaults.logging.log_level;
    }
    config
}
