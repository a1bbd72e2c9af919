use std::sync::Arc;
use std::time::Duration;

use crate::app::activity_log::store::{FileKeyValueStore, KeyValueStore};
use crate::app::activity_log::ActivityLog;
use crate::app::config::AppConfig;
use crate::app::device::channel::DeviceChannel;
use crate::app::device::mock::MockDeviceChannel;
use crate::app::lookup::client::UnlockMethodLookup;
use crate::app::workflow::GuideSession;

/// Long-lived services shared by the whole application.
pub struct AppState {
    pub log: ActivityLog,
    pub channel: Arc<dyn DeviceChannel>,
    pub lookup: UnlockMethodLookup,
    pub session: GuideSession,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        let store: Arc<dyn KeyValueStore> =
            Arc::new(FileKeyValueStore::new(config.log_store.resolved_store_dir()));
        Self::with_store(config, store)
    }

    pub fn with_store(config: &AppConfig, store: Arc<dyn KeyValueStore>) -> Self {
        let log = ActivityLog::with_settings(store, &config.log_store);
        let channel: Arc<dyn DeviceChannel> =
            Arc::new(MockDeviceChannel::new(config.simulation.clone()));
        let session = GuideSession::new(channel.clone(), log.clone()).with_diagnostic_delay(
            Duration::from_millis(config.simulation.diagnostic_step_delay_ms),
        );
        Self {
            log,
            channel,
            lookup: UnlockMethodLookup::new(config.lookup.clone()),
            session,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::SimulationSettings;
    use crate::app::models::LogLevel;

    #[tokio::test]
    async fn session_and_state_share_one_log() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = AppConfig::default();
        config.log_store.store_dir = dir.path().to_string_lossy().to_string();
        config.simulation = SimulationSettings::instant();

        let state = AppState::from_config(&config);
        state.session.load_troubleshooting(None).await;
        let entries = state.log.list().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, LogLevel::Info);
        assert!(dir.path().join("bootgenie_logs.json").exists());
    }
}
