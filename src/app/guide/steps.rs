use crate::app::models::UnlockStep;

struct Draft {
    title: &'static str,
    description: &'static str,
    command: Option<&'static str>,
    warning: Option<&'static str>,
    external_link: Option<&'static str>,
}

fn step(title: &'static str, description: &'static str) -> Draft {
    Draft {
        title,
        description,
        command: None,
        warning: None,
        external_link: None,
    }
}

impl Draft {
    fn command(mut self, command: &'static str) -> Self {
        self.command = Some(command);
        self
    }

    fn warning(mut self, warning: &'static str) -> Self {
        self.warning = Some(warning);
        self
    }

    fn link(mut self, url: &'static str) -> Self {
        self.external_link = Some(url);
        self
    }
}

// Ids come from position so every guide is numbered 1..=n without gaps.
fn number(drafts: Vec<Draft>) -> Vec<UnlockStep> {
    drafts
        .into_iter()
        .enumerate()
        .map(|(index, draft)| UnlockStep {
            id: index as u32 + 1,
            title: draft.title.to_string(),
            description: draft.description.to_string(),
            command: draft.command.map(str::to_string),
            warning: draft.warning.map(str::to_string),
            external_link: draft.external_link.map(str::to_string),
        })
        .collect()
}

pub fn xiaomi() -> Vec<UnlockStep> {
    number(vec![
        step(
            "Create Mi Account",
            "Create a Mi account and sign in on your device. Go to Settings > Mi Account and log in with your credentials.",
        ),
        step(
            "Enable Developer Options",
            "Navigate to Settings > About phone and tap \"MIUI version\" 7 times to unlock Developer Options.",
        ),
        step(
            "Enable USB Debugging & OEM Unlock",
            "Go to Settings > Additional settings > Developer options. Enable both \"USB debugging\" and \"OEM unlocking\".",
        ),
        step(
            "Add Device to Mi Account",
            "In Developer options, find \"Mi Unlock status\" and add this device to your Mi account for unlock permission.",
        )
        .warning("You may need to wait 7-30 days before unlocking is allowed by Xiaomi."),
        step(
            "Download Mi Unlock Tool",
            "Download the official Mi Unlock Tool from Xiaomi's website and install it on your computer.",
        )
        .link("https://en.miui.com/unlock/"),
        step(
            "Boot to Fastboot Mode",
            "Power off your device completely, then hold Volume Down + Power button simultaneously to enter Fastboot mode.",
        )
        .command("adb reboot bootloader"),
        step(
            "Unlock Bootloader",
            "Connect your device to computer and use the Mi Unlock Tool to unlock the bootloader.",
        )
        .warning("This will completely wipe all data on your device! Make sure you have backups."),
    ])
}

pub fn xiaomi_turbo_4_pro() -> Vec<UnlockStep> {
    number(vec![
        step(
            "Back Up Your Data",
            "Back up photos, chats and app data. The Redmi Turbo 4 Pro is wiped during the unlock and HyperOS cloud backup does not restore everything.",
        )
        .warning("All data on the device will be erased when the bootloader is unlocked."),
        step(
            "Check HyperOS Version",
            "Open Settings > About phone and note the HyperOS version. Unlocking on HyperOS requires the newest Mi Unlock Tool and community level checks.",
        ),
        step(
            "Sign In With a Mature Mi Account",
            "Sign in to a Mi Account that is at least 30 days old and reached the required Mi Community level. New accounts are rejected by the HyperOS unlock policy.",
        )
        .warning("HyperOS limits unlocks per account per year. Use the account you intend to keep."),
        step(
            "Apply for Unlock Permission",
            "Open the Xiaomi Community app, go to Me > Unlock bootloader and apply. Approval is granted for a limited time window.",
        )
        .link("https://web.vip.miui.com/"),
        step(
            "Enable Developer Options",
            "Navigate to Settings > About phone and tap \"OS version\" 7 times to unlock Developer Options.",
        ),
        step(
            "Enable USB Debugging & OEM Unlock",
            "Go to Settings > Additional settings > Developer options. Enable \"USB debugging\" and \"OEM unlocking\".",
        ),
        step(
            "Bind Device in Mi Unlock Status",
            "In Developer options open \"Mi Unlock status\" and tap \"Add account and device\" while connected to mobile data, not Wi-Fi.",
        )
        .warning("Binding starts the mandatory waiting period. Do not sign out or factory reset until it ends."),
        step(
            "Verify ADB Connection",
            "Connect the phone to your computer, accept the RSA prompt on screen, then confirm the device is listed.",
        )
        .command("adb devices"),
        step(
            "Install Latest Mi Unlock Tool",
            "Download Mi Unlock Tool 6.5.406 or newer and the Xiaomi USB drivers. Older versions fail on HyperOS devices.",
        )
        .link("https://en.miui.com/unlock/"),
        step(
            "Boot to Fastboot Mode",
            "Reboot into the bootloader from ADB or hold Volume Down + Power with the phone powered off.",
        )
        .command("adb reboot bootloader"),
        step(
            "Confirm Fastboot Detection",
            "Make sure the computer sees the phone in fastboot mode before starting Mi Unlock Tool.",
        )
        .command("fastboot devices"),
        step(
            "Unlock Bootloader",
            "Start Mi Unlock Tool, sign in with the bound Mi Account and press Unlock once the waiting period has passed.",
        )
        .warning("This will completely wipe all data on your device! Make sure you have backups."),
        step(
            "Verify Unlock Status",
            "After the phone reboots, return to fastboot mode and check that the bootloader reports unlocked.",
        )
        .command("fastboot getvar unlocked"),
    ])
}

pub fn huawei() -> Vec<UnlockStep> {
    number(vec![
        step(
            "Check Device Compatibility",
            "Important: Huawei stopped providing official unlock codes in May 2018. This process may not work on newer devices.",
        )
        .warning("Huawei discontinued official bootloader unlocking. Community methods may be risky."),
        step(
            "Enable Developer Options",
            "Go to Settings > About phone and tap \"Build number\" 7 times to enable Developer Options.",
        ),
        step(
            "Enable USB Debugging & OEM Unlock",
            "Navigate to Settings > System > Developer options. Enable \"USB debugging\" and \"OEM unlocking\".",
        ),
        step(
            "Get Device Information",
            "Collect your device's serial number, IMEI, and product ID for unlock code generation.",
        )
        .command("fastboot getvar serialno"),
        step(
            "Community Unlock Methods",
            "Check XDA Developers forum for community-developed unlock methods specific to your Huawei model.",
        )
        .warning("Use community methods at your own risk. Success is not guaranteed.")
        .link("https://xdaforums.com/c/huawei.66/"),
    ])
}

pub fn oppo() -> Vec<UnlockStep> {
    number(vec![
        step(
            "Enable Developer Options",
            "Go to Settings > About phone and tap \"Version\" or \"Build number\" 7 times to unlock Developer Options.",
        ),
        step(
            "Enable USB Debugging & OEM Unlock",
            "Navigate to Settings > Additional settings > Developer options. Enable \"USB debugging\" and \"OEM unlocking\".",
        ),
        step(
            "Apply for Deep Testing",
            "Apply for Oppo's Deep Testing program through their official website to get bootloader unlock permission.",
        )
        .warning("Official unlock may not be available for all Oppo models.")
        .link("https://www.oppo.com/en/community/"),
        step(
            "Boot to Fastboot Mode",
            "Power off your device, then hold Volume Down + Power button to enter Fastboot mode.",
        )
        .command("adb reboot bootloader"),
        step(
            "Attempt Standard Unlock",
            "Try the standard fastboot unlock command. This may require official permission from Oppo.",
        )
        .command("fastboot oem unlock")
        .warning("This command may not work without official Deep Testing approval."),
    ])
}

pub fn vivo() -> Vec<UnlockStep> {
    number(vec![
        step(
            "Enable Developer Options",
            "Go to Settings > About phone and tap \"Software version\" 7 times to unlock Developer Options.",
        ),
        step(
            "Enable USB Debugging & OEM Unlock",
            "Navigate to Settings > Additional settings > Developer options. Enable \"USB debugging\" and \"OEM unlocking\".",
        ),
        step(
            "Check Official Support",
            "Vivo doesn't officially support bootloader unlocking for most devices. Check if your model has any official method.",
        )
        .warning("Most Vivo devices do not have official unlock methods."),
        step(
            "Community Methods",
            "Search XDA Developers forum for device-specific unlock methods developed by the community.",
        )
        .warning("Community methods are device-specific and may be risky.")
        .link("https://xdaforums.com/c/vivo.12365/"),
    ])
}

pub fn oneplus() -> Vec<UnlockStep> {
    number(vec![
        step(
            "Enable Developer Options",
            "Go to Settings > About phone and tap \"Build number\" 7 times to enable Developer Options.",
        ),
        step(
            "Enable USB Debugging & OEM Unlock",
            "Navigate to Settings > System > Developer options. Enable \"USB debugging\" and \"OEM unlocking\".",
        ),
        step(
            "Boot to Fastboot Mode",
            "Power off your device, then hold Volume Up + Power button to enter Fastboot mode.",
        )
        .command("adb reboot bootloader"),
        step(
            "Unlock Bootloader",
            "OnePlus devices typically support standard fastboot unlock commands.",
        )
        .command("fastboot oem unlock")
        .warning("This will wipe all data on your device."),
        step(
            "Confirm Unlock",
            "Follow the on-screen prompts on your device to confirm the bootloader unlock.",
        )
        .warning("Make sure you understand the risks before confirming."),
    ])
}

pub fn samsung() -> Vec<UnlockStep> {
    number(vec![
        step(
            "Check Knox Status",
            "Samsung devices use Knox security. Unlocking will permanently trip Knox and void warranty.",
        )
        .warning("Unlocking Samsung bootloader will permanently trip Knox warranty bit."),
        step(
            "Enable Developer Options",
            "Go to Settings > About phone and tap \"Build number\" 7 times.",
        ),
        step(
            "Enable OEM Unlock",
            "In Developer options, enable \"OEM unlocking\". You may need to wait 7 days.",
        )
        .warning("Samsung enforces a 7-day waiting period for new devices."),
        step(
            "Boot to Download Mode",
            "Power off device, then hold Volume Down + Power + Home (or Bixby) button.",
        ),
        step(
            "Use Odin or Heimdall",
            "Samsung devices require special tools like Odin (Windows) or Heimdall (cross-platform) for bootloader operations.",
        )
        .link("https://xdaforums.com/c/samsung.66/"),
    ])
}

pub fn generic() -> Vec<UnlockStep> {
    number(vec![
        step(
            "Enable Developer Options",
            "Go to Settings > About phone and tap \"Build number\" 7 times to unlock Developer Options.",
        ),
        step(
            "Enable USB Debugging & OEM Unlock",
            "Navigate to Settings > Developer options. Enable both \"USB debugging\" and \"OEM unlocking\".",
        ),
        step(
            "Install ADB and Fastboot",
            "Download and install Android Platform Tools on your computer for ADB and Fastboot commands.",
        )
        .link("https://developer.android.com/tools/releases/platform-tools"),
        step(
            "Boot to Fastboot Mode",
            "Power off your device, then hold Volume Down + Power button to enter Fastboot mode.",
        )
        .command("adb reboot bootloader"),
        step(
            "Attempt Standard Unlock",
            "Try the standard fastboot unlock command. Success depends on manufacturer support.",
        )
        .command("fastboot oem unlock")
        .warning("This may not work for all devices. Check manufacturer-specific methods."),
        step(
            "Alternative Commands",
            "If the standard command fails, try alternative unlock commands.",
        )
        .command("fastboot flashing unlock"),
    ])
}
