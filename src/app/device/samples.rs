use crate::app::device::channel::CommandChannel;
use crate::app::models::{BootloaderStatus, DetectedDevice};

fn sample(
    id: &str,
    model: &str,
    brand: &str,
    status: BootloaderStatus,
    android_version: &str,
    security_patch: &str,
) -> DetectedDevice {
    DetectedDevice {
        id: id.to_string(),
        model: model.to_string(),
        brand: brand.to_string(),
        manufacturer: brand.to_string(),
        bootloader_status: Some(status),
        serial_number: Some(format!("{}{}", id.replace('_', "").to_uppercase(), "A1")),
        android_version: Some(android_version.to_string()),
        security_patch: Some(security_patch.to_string()),
    }
}

/// Devices the simulated detection sweep can report.
pub fn sample_devices() -> Vec<DetectedDevice> {
    vec![
        sample("xiaomi_001", "Mi 11", "Xiaomi", BootloaderStatus::Locked, "13", "2024-03-01"),
        sample("xiaomi_002", "Redmi Note 12", "Xiaomi", BootloaderStatus::Locked, "14", "2024-06-01"),
        sample("xiaomi_003", "Redmi Turbo 4 Pro", "Xiaomi", BootloaderStatus::Locked, "15", "2025-04-01"),
        sample("huawei_001", "P40 Pro", "Huawei", BootloaderStatus::Locked, "10", "2022-11-01"),
        sample("oppo_001", "Find X5", "Oppo", BootloaderStatus::Locked, "14", "2024-02-05"),
        sample("vivo_001", "X80 Pro", "Vivo", BootloaderStatus::Locked, "14", "2024-01-01"),
        sample("oneplus_001", "11 Pro", "OnePlus", BootloaderStatus::Unlocked, "14", "2024-05-01"),
        sample("samsung_001", "Galaxy S23", "Samsung", BootloaderStatus::Locked, "14", "2024-07-01"),
    ]
}

/// Output a healthy device would print for well-known commands. A command sent to
/// the other program's channel has no canned output.
pub fn canned_response(channel: CommandChannel, command: &str) -> Option<&'static str> {
    if CommandChannel::for_command(command) != channel {
        return None;
    }
    let response = match command.trim() {
        "adb devices" => "List of devices attached\n8A1B2C3D\tdevice",
        "adb reboot bootloader" => "Rebooting device into bootloader (fastboot) mode...",
        "adb reboot" => "Rebooting device...",
        "adb shell getprop ro.product.model" => "Mi 11",
        "adb shell getprop ro.build.version.release" => "13",
        "fastboot devices" => "8A1B2C3D\tfastboot",
        "fastboot getvar unlocked" => "unlocked: no\nFinished. Total time: 0.002s",
        "fastboot getvar serialno" => "serialno: 8A1B2C3D\nFinished. Total time: 0.001s",
        "fastboot oem device-info" => {
            "(bootloader) Device unlocked: false\n(bootloader) Device critical unlocked: false\nOKAY [  0.004s]"
        }
        "fastboot oem unlock" => "OKAY [  0.040s]\nFinished. Total time: 0.041s",
        "fastboot flashing unlock" => "OKAY [  0.038s]\nFinished. Total time: 0.039s",
        "fastboot reboot" => "Rebooting\nFinished. Total time: 0.050s",
        _ => return None,
    };
    Some(response)
}

pub fn generic_acknowledgement(channel: CommandChannel, command: &str) -> String {
    match channel {
        CommandChannel::Adb => format!("✓ Command executed successfully: {command}"),
        CommandChannel::Fastboot => format!("✓ Fastboot command executed: {command}"),
    }
}

pub fn failure_message(channel: CommandChannel, command: &str) -> String {
    match channel {
        CommandChannel::Adb => format!("✗ Command failed: {command}"),
        CommandChannel::Fastboot => format!("✗ Fastboot command failed: {command}"),
    }
}
