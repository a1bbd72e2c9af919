use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::app::error::AppError;
use crate::app::models::{BootloaderStatus, DetectedDevice};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CommandChannel {
    Adb,
    Fastboot,
}

impl CommandChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandChannel::Adb => "adb",
            CommandChannel::Fastboot => "fastboot",
        }
    }

    /// `fastboot ...` goes to the fastboot executor, everything else to adb.
    pub fn for_command(command: &str) -> Self {
        let program = command.split_whitespace().next().unwrap_or_default();
        if program.eq_ignore_ascii_case("fastboot") {
            CommandChannel::Fastboot
        } else {
            CommandChannel::Adb
        }
    }
}

impl fmt::Display for CommandChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Device detection and command execution.
///
/// `MockDeviceChannel` is the only implementation shipped today; a real adb/fastboot
/// executor plugs in here without touching callers.
#[async_trait]
pub trait DeviceChannel: Send + Sync {
    /// One detection sweep. `None` means no device answered; repeated calls are
    /// independent.
    async fn detect(&self, trace_id: &str) -> Option<DetectedDevice>;

    /// Runs `command` on `channel`. A failed command is `Err` with code `ERR_COMMAND`
    /// and a message naming the command.
    async fn run_command(
        &self,
        channel: CommandChannel,
        command: &str,
        trace_id: &str,
    ) -> Result<String, AppError>;

    async fn check_bootloader_status(&self, trace_id: &str) -> BootloaderStatus;
}
