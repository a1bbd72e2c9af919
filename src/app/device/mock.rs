use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::app::config::SimulationSettings;
use crate::app::device::channel::{CommandChannel, DeviceChannel};
use crate::app::device::samples::{
    canned_response, failure_message, generic_acknowledgement, sample_devices,
};
use crate::app::error::AppError;
use crate::app::models::{BootloaderStatus, DetectedDevice};

/// Timer-driven stand-in for adb/fastboot with randomized outcomes.
pub struct MockDeviceChannel {
    settings: SimulationSettings,
    devices: Vec<DetectedDevice>,
    rng: Mutex<StdRng>,
}

impl MockDeviceChannel {
    pub fn new(settings: SimulationSettings) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            settings: SimulationSettings {
                detect_miss_rate: settings.detect_miss_rate.clamp(0.0, 1.0),
                adb_success_rate: settings.adb_success_rate.clamp(0.0, 1.0),
                fastboot_success_rate: settings.fastboot_success_rate.clamp(0.0, 1.0),
                ..settings
            },
            devices: sample_devices(),
            rng: Mutex::new(rng),
        }
    }

    pub fn with_devices(mut self, devices: Vec<DetectedDevice>) -> Self {
        self.devices = devices;
        self
    }

    pub fn devices(&self) -> &[DetectedDevice] {
        &self.devices
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    // The guard never lives across an await.
    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut guard = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }

    fn latency_for(&self, channel: CommandChannel) -> Duration {
        match channel {
            CommandChannel::Adb => Duration::from_millis(self.settings.adb_latency_ms),
            CommandChannel::Fastboot => Duration::from_millis(self.settings.fastboot_latency_ms),
        }
    }

    fn success_rate_for(&self, channel: CommandChannel) -> f64 {
        match channel {
            CommandChannel::Adb => self.settings.adb_success_rate,
            CommandChannel::Fastboot => self.settings.fastboot_success_rate,
        }
    }
}

impl Default for MockDeviceChannel {
    fn default() -> Self {
        Self::new(SimulationSettings::default())
    }
}

#[async_trait]
impl DeviceChannel for MockDeviceChannel {
    async fn detect(&self, trace_id: &str) -> Option<DetectedDevice> {
        tokio::time::sleep(Duration::from_millis(self.settings.detect_latency_ms)).await;
        let miss_rate = self.settings.detect_miss_rate;
        let device = self.with_rng(|rng| {
            if rng.gen_bool(miss_rate) {
                None
            } else {
                self.devices.choose(rng).cloned()
            }
        });
        match &device {
            Some(found) => info!(
                trace_id = %trace_id,
                brand = %found.brand,
                model = %found.model,
                "simulated detection found device"
            ),
            None => info!(trace_id = %trace_id, "simulated detection found no device"),
        }
        device
    }

    async fn run_command(
        &self,
        channel: CommandChannel,
        command: &str,
        trace_id: &str,
    ) -> Result<String, AppError> {
        debug!(trace_id = %trace_id, channel = %channel, command = %command, "simulating command");
        tokio::time::sleep(self.latency_for(channel)).await;
        let success_rate = self.success_rate_for(channel);
        let succeeded = self.with_rng(|rng| rng.gen_bool(success_rate));
        if !succeeded {
            return Err(AppError::command(failure_message(channel, command), trace_id));
        }
        Ok(canned_response(channel, command)
            .map(|response| response.to_string())
            .unwrap_or_else(|| generic_acknowledgement(channel, command)))
    }

    async fn check_bootloader_status(&self, trace_id: &str) -> BootloaderStatus {
        tokio::time::sleep(Duration::from_millis(self.settings.status_latency_ms)).await;
        let status = self.with_rng(|rng| {
            BootloaderStatus::ALL
                .choose(rng)
                .copied()
                .unwrap_or(BootloaderStatus::Unknown)
        });
        debug!(trace_id = %trace_id, status = %status.as_str(), "simulated bootloader status");
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn seeded(seed: u64) -> MockDeviceChannel {
        MockDeviceChannel::new(SimulationSettings {
            seed: Some(seed),
            ..SimulationSettings::instant()
        })
    }

    #[tokio::test]
    async fn detection_miss_rate_is_about_twenty_percent() {
        let channel = seeded(7);
        let catalog = sample_devices();
        let mut misses = 0;
        for _ in 0..1000 {
            match channel.detect("trace").await {
                None => misses += 1,
                Some(device) => assert!(catalog.contains(&device)),
            }
        }
        assert!((140..=260).contains(&misses), "misses = {misses}");
    }

    #[tokio::test]
    async fn repeated_detection_is_not_cached() {
        let channel = seeded(11);
        let mut seen = HashMap::new();
        for _ in 0..200 {
            let key = channel
                .detect("trace")
                .await
                .map(|device| device.id)
                .unwrap_or_else(|| "none".to_string());
            *seen.entry(key).or_insert(0) += 1;
        }
        assert!(seen.len() > 2, "expected varied outcomes, got {seen:?}");
        assert!(seen.contains_key("none"));
    }

    #[tokio::test]
    async fn adb_devices_either_lists_device_or_names_command() {
        let channel = seeded(3);
        for _ in 0..50 {
            match channel.run_command(CommandChannel::Adb, "adb devices", "trace-adb").await {
                Ok(output) => assert!(output.contains("device")),
                Err(err) => {
                    assert!(err.error.contains("adb devices"));
                    assert!(err.is_command_failure());
                    assert_eq!(err.trace_id, "trace-adb");
                }
            }
        }
    }

    #[tokio::test]
    async fn unknown_command_gets_generic_acknowledgement() {
        let channel = MockDeviceChannel::new(SimulationSettings {
            fastboot_success_rate: 1.0,
            ..SimulationSettings::instant()
        });
        let output = channel
            .run_command(CommandChannel::Fastboot, "fastboot boot twrp.img", "trace")
            .await
            .expect("always succeeds");
        assert_eq!(output, "✓ Fastboot command executed: fastboot boot twrp.img");
    }

    #[tokio::test]
    async fn command_on_wrong_channel_gets_no_canned_output() {
        let channel = MockDeviceChannel::new(SimulationSettings {
            fastboot_success_rate: 1.0,
            ..SimulationSettings::instant()
        });
        let output = channel
            .run_command(CommandChannel::Fastboot, "adb devices", "trace")
            .await
            .expect("always succeeds");
        assert_eq!(output, "✓ Fastboot command executed: adb devices");
    }

    #[tokio::test]
    async fn zero_success_rate_always_fails() {
        let channel = MockDeviceChannel::new(SimulationSettings {
            adb_success_rate: 0.0,
            ..SimulationSettings::instant()
        });
        let err = channel
            .run_command(CommandChannel::Adb, "adb reboot bootloader", "trace")
            .await
            .expect_err("always fails");
        assert_eq!(err.error, "✗ Command failed: adb reboot bootloader");
    }

    #[tokio::test]
    async fn bootloader_status_covers_all_three_outcomes() {
        let channel = seeded(5);
        let mut seen = Vec::new();
        for _ in 0..100 {
            let status = channel.check_bootloader_status("trace").await;
            if !seen.contains(&status) {
                seen.push(status);
            }
        }
        assert_eq!(seen.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn operations_wait_for_configured_latency() {
        let channel = MockDeviceChannel::new(SimulationSettings {
            seed: Some(1),
            ..SimulationSettings::default()
        });

        let start = tokio::time::Instant::now();
        let _ = channel.detect("trace").await;
        assert!(start.elapsed() >= Duration::from_millis(2500));

        let start = tokio::time::Instant::now();
        let _ = channel.run_command(CommandChannel::Adb, "adb devices", "trace").await;
        assert!(start.elapsed() >= Duration::from_millis(1500));

        let start = tokio::time::Instant::now();
        let _ = channel
            .run_command(CommandChannel::Fastboot, "fastboot devices", "trace")
            .await;
        assert!(start.elapsed() >= Duration::from_millis(2000));

        let start = tokio::time::Instant::now();
        let _ = channel.check_bootloader_status("trace").await;
        assert!(start.elapsed() >= Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn empty_catalog_never_reports_a_device() {
        let channel = MockDeviceChannel::new(SimulationSettings {
            detect_miss_rate: 0.0,
            ..SimulationSettings::instant()
        })
        .with_devices(Vec::new());
        assert_eq!(channel.detect("trace").await, None);
    }
}
