use crate::app::models::{EmergencyContact, Severity, TroubleshootingIssue};

fn issue(
    id: &str,
    title: &str,
    description: &str,
    symptoms: &[&str],
    solutions: &[&str],
    severity: Severity,
    device_specific: Option<&[&str]>,
) -> TroubleshootingIssue {
    let owned = |items: &[&str]| items.iter().map(|item| item.to_string()).collect::<Vec<_>>();
    TroubleshootingIssue {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        symptoms: owned(symptoms),
        solutions: owned(solutions),
        severity,
        device_specific: device_specific.map(owned),
    }
}

const TURBO_4_PRO: &[&str] = &["Redmi Turbo 4 Pro"];

pub fn general_issues() -> Vec<TroubleshootingIssue> {
    vec![
        issue(
            "device_not_detected",
            "Device Not Detected",
            "ADB/Fastboot cannot detect the connected device.",
            &[
                "Device not showing in \"adb devices\" or \"fastboot devices\"",
                "USB connection not recognized",
                "Computer shows unknown device",
            ],
            &[
                "Install proper USB drivers for your device",
                "Try different USB cable or port",
                "Enable USB Debugging in Developer Options",
                "Revoke USB debugging authorizations and reconnect",
                "Try different computer or USB port",
            ],
            Severity::High,
            None,
        ),
        issue(
            "waiting_period_not_complete",
            "Waiting Period Not Complete",
            "Xiaomi enforces a waiting period before allowing bootloader unlock.",
            &[
                "Mi Unlock Tool shows \"This device is locked\"",
                "Error message about waiting period",
                "Cannot proceed in Mi Unlock Tool",
            ],
            &[
                "Wait for the full mandatory period (7-30 days)",
                "Check Mi Unlock status in Developer Options",
                "Ensure the same Mi Account is used consistently",
                "Do not factory reset during waiting period",
            ],
            Severity::Medium,
            None,
        ),
        issue(
            "account_mismatch",
            "Mi Account Mismatch",
            "The Mi Account on device differs from the one in Mi Unlock Tool.",
            &[
                "Authentication failed in Mi Unlock Tool",
                "Account verification errors",
                "Tool cannot verify device ownership",
            ],
            &[
                "Ensure same Mi Account is logged in on device and computer",
                "Log out and log back in on both device and tool",
                "Verify account in Developer Options > Mi Unlock status",
                "Clear Mi Unlock Tool data and re-login",
            ],
            Severity::High,
            None,
        ),
        issue(
            "fastboot_mode_issues",
            "Cannot Enter Fastboot Mode",
            "Device fails to enter or stay in fastboot mode.",
            &[
                "Device boots normally instead of fastboot",
                "Fastboot mode exits immediately",
                "Black screen when trying to enter fastboot",
            ],
            &[
                "Hold Volume Down + Power for 10+ seconds",
                "Try Volume Up + Power combination for some devices",
                "Use \"adb reboot bootloader\" command",
                "Disconnect and reconnect USB cable",
                "Try without battery if removable",
            ],
            Severity::High,
            None,
        ),
    ]
}

pub fn turbo_4_pro_issues() -> Vec<TroubleshootingIssue> {
    vec![
        issue(
            "hyperos_restrictions",
            "HyperOS Bootloader Restrictions",
            "HyperOS may have additional security measures preventing unlock.",
            &[
                "Mi Unlock Tool fails with HyperOS devices",
                "Unlock process stuck or fails silently",
                "Error messages about unsupported system",
            ],
            &[
                "Ensure Mi Unlock Tool version 6.5.406 or newer",
                "Check if your HyperOS version supports unlocking",
                "Try downgrading to MIUI if possible (advanced users)",
                "Wait for updated Mi Unlock Tool version",
                "Check community forums for HyperOS-specific tools",
            ],
            Severity::High,
            Some(TURBO_4_PRO),
        ),
        issue(
            "regional_variant_issues",
            "Regional Variant Restrictions",
            "Some regional variants of Turbo 4 Pro may have unlock restrictions.",
            &[
                "Unlock fails despite completing all steps",
                "Mi Account not accepted for unlock",
                "Region-specific error messages",
            ],
            &[
                "Check if your region supports bootloader unlocking",
                "Verify device model number and variant",
                "Try using VPN to China region when using Mi Unlock Tool",
                "Contact Xiaomi support for region-specific guidance",
                "Consider flashing Global ROM if on Chinese variant",
            ],
            Severity::Medium,
            Some(TURBO_4_PRO),
        ),
        issue(
            "turbo4pro_driver_issues",
            "Turbo 4 Pro USB Driver Issues",
            "Windows may not recognize Turbo 4 Pro in fastboot mode properly.",
            &[
                "Device Manager shows unknown device",
                "Fastboot commands fail with device errors",
                "Mi Unlock Tool cannot detect device",
            ],
            &[
                "Install latest Xiaomi USB drivers",
                "Use Device Manager to manually install drivers",
                "Try Google USB drivers or universal ADB drivers",
                "Use Linux or macOS if Windows drivers fail",
                "Install Mi Flash tool for additional drivers",
            ],
            Severity::Medium,
            Some(TURBO_4_PRO),
        ),
        issue(
            "turbo4pro_bootloader_policy",
            "Turbo 4 Pro Specific Bootloader Policy",
            "Newer policy changes affecting Turbo 4 Pro bootloader unlock.",
            &[
                "Unlock suddenly stopped working",
                "Policy violation errors",
                "Account restrictions on new devices",
            ],
            &[
                "Check latest Xiaomi bootloader unlock policy",
                "Verify device purchase date and warranty status",
                "Try different Mi Account with older registration",
                "Wait for policy updates from Xiaomi",
                "Consider community unlock methods (advanced)",
            ],
            Severity::High,
            Some(TURBO_4_PRO),
        ),
    ]
}

pub const BASE_DIAGNOSTIC_STEPS: &[&str] = &[
    "Check if device is detected: adb devices",
    "Verify USB debugging is enabled",
    "Test fastboot mode: adb reboot bootloader",
    "Check fastboot detection: fastboot devices",
    "Verify bootloader status: fastboot getvar unlocked",
    "Check Mi Account in Developer Options",
    "Verify Mi Unlock Tool version",
];

pub const TURBO_4_PRO_DIAGNOSTIC_STEPS: &[&str] = &[
    "Check HyperOS version and compatibility",
    "Verify regional variant and restrictions",
    "Test with latest Xiaomi USB drivers",
    "Check waiting period status in Mi Unlock Tool",
];

pub fn emergency_contacts() -> Vec<EmergencyContact> {
    [
        (
            "XDA Developers Xiaomi Forum",
            "https://xdaforums.com/c/xiaomi.66/",
            "Community support for Xiaomi devices",
        ),
        (
            "MIUI Official Forum",
            "https://c.mi.com/",
            "Official Xiaomi community support",
        ),
        (
            "Xiaomi Support",
            "https://www.mi.com/global/support/",
            "Official Xiaomi customer support",
        ),
        (
            "r/Xiaomi Reddit",
            "https://reddit.com/r/Xiaomi",
            "Reddit community for Xiaomi users",
        ),
    ]
    .into_iter()
    .map(|(name, url, description)| EmergencyContact {
        name: name.to_string(),
        url: url.to_string(),
        description: description.to_string(),
    })
    .collect()
}
