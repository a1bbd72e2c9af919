use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use uuid::Uuid;

use crate::app::activity_log::ActivityLog;
use crate::app::device::channel::{CommandChannel, DeviceChannel};
use crate::app::error::AppError;
use crate::app::guide::catalog::GuideCatalog;
use crate::app::guide::walkthrough::GuideWalkthrough;
use crate::app::models::{BootloaderStatus, DetectedDevice, LogLevel, TroubleshootingIssue};
use crate::app::troubleshooting::catalog::TroubleshootingCatalog;

const SOURCE_DETECT: &str = "Detect";
const SOURCE_GUIDE: &str = "Guide";
const SOURCE_TROUBLESHOOTING: &str = "Troubleshooting";
const SOURCE_DIAGNOSTICS: &str = "Diagnostics";

fn new_trace_id() -> String {
    Uuid::new_v4().to_string()
}

/// The user-facing flows: each call drives the device channel or a catalog and
/// records what happened in the activity log.
pub struct GuideSession {
    channel: Arc<dyn DeviceChannel>,
    log: ActivityLog,
    guides: GuideCatalog,
    troubleshooting: TroubleshootingCatalog,
    diagnostic_delay: Duration,
}

impl GuideSession {
    pub fn new(channel: Arc<dyn DeviceChannel>, log: ActivityLog) -> Self {
        Self {
            channel,
            log,
            guides: GuideCatalog::new(),
            troubleshooting: TroubleshootingCatalog::new(),
            diagnostic_delay: Duration::from_millis(1000),
        }
    }

    pub fn with_diagnostic_delay(mut self, delay: Duration) -> Self {
        self.diagnostic_delay = delay;
        self
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    pub async fn detect_device(&self) -> Option<DetectedDevice> {
        let trace_id = new_trace_id();
        self.log
            .append("Starting device detection...", LogLevel::Info, Some(SOURCE_DETECT))
            .await;
        let device = self.channel.detect(&trace_id).await;
        match &device {
            Some(found) => {
                self.log
                    .append(
                        format!("Device detected: {} {}", found.brand, found.model),
                        LogLevel::Success,
                        Some(SOURCE_DETECT),
                    )
                    .await
            }
            None => {
                self.log
                    .append("No device detected", LogLevel::Warning, Some(SOURCE_DETECT))
                    .await
            }
        }
        device
    }

    pub async fn check_bootloader(&self) -> BootloaderStatus {
        let trace_id = new_trace_id();
        let status = self.channel.check_bootloader_status(&trace_id).await;
        self.log
            .append(
                format!("Bootloader status: {}", status.as_str()),
                LogLevel::Info,
                Some(SOURCE_DETECT),
            )
            .await;
        status
    }

    pub async fn start_guide(&self, brand: &str, model: Option<&str>) -> GuideWalkthrough {
        let steps = self.guides.steps_for(brand, model);
        info!(brand = %brand, model = ?model, steps = steps.len(), "starting unlock guide");
        self.log
            .append(
                format!("Started unlock guide for {} {}", brand, model.unwrap_or("Unknown")),
                LogLevel::Info,
                Some(SOURCE_GUIDE),
            )
            .await;
        GuideWalkthrough::new(steps)
    }

    /// Runs `command` on the channel its program name selects and logs the outcome.
    pub async fn execute_command(&self, command: &str) -> Result<String, AppError> {
        let command = command.trim();
        let trace_id = new_trace_id();
        if command.is_empty() {
            return Err(AppError::validation("command is required", trace_id));
        }
        let channel = CommandChannel::for_command(command);
        self.log
            .append(
                format!("Executing command: {command}"),
                LogLevel::Command,
                Some(SOURCE_GUIDE),
            )
            .await;
        let result = self.channel.run_command(channel, command, &trace_id).await;
        match &result {
            Ok(_) => {
                self.log
                    .append(
                        format!("Command executed successfully: {command}"),
                        LogLevel::Success,
                        Some(SOURCE_GUIDE),
                    )
                    .await
            }
            Err(err) => {
                self.log
                    .append(err.error.clone(), LogLevel::Error, Some(SOURCE_GUIDE))
                    .await
            }
        }
        result
    }

    /// Executes the command of the walkthrough's current step, if it has one.
    pub async fn execute_current_step(
        &self,
        walkthrough: &GuideWalkthrough,
    ) -> Option<Result<String, AppError>> {
        let command = walkthrough.current_step()?.command.clone()?;
        Some(self.execute_command(&command).await)
    }

    pub async fn load_troubleshooting(&self, model: Option<&str>) -> Vec<TroubleshootingIssue> {
        let issues = self.troubleshooting.issues_for(model);
        self.log
            .append(
                format!(
                    "Loaded troubleshooting guide for {}",
                    model.unwrap_or("generic device")
                ),
                LogLevel::Info,
                Some(SOURCE_TROUBLESHOOTING),
            )
            .await;
        issues
    }

    /// Walks the diagnostic checklist, logging one `command` entry per step.
    pub async fn run_diagnostics(&self, model: Option<&str>) -> Vec<String> {
        self.log
            .append("Starting diagnostic checks...", LogLevel::Info, Some(SOURCE_DIAGNOSTICS))
            .await;
        let steps = self.troubleshooting.diagnostic_steps_for(model);
        for step in &steps {
            self.log
                .append(format!("Diagnostic: {step}"), LogLevel::Command, Some(SOURCE_DIAGNOSTICS))
                .await;
            tokio::time::sleep(self.diagnostic_delay).await;
        }
        self.log
            .append(
                "Diagnostic checks completed. Check logs for results.",
                LogLevel::Success,
                Some(SOURCE_DIAGNOSTICS),
            )
            .await;
        steps
    }
}
