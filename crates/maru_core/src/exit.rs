use std::fmt;

const SUCCESS_BASE: i32 = 1 << 5;
const ERROR_BASE: i32 = 1 << 6;

/// How a run ended without a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Installed,
    /// The confirmation prompt was answered with anything but `yes`.
    UserAborted,
    /// The bootloader was just unlocked; the user has to run again after
    /// the device reboots.
    BootloaderUnlocked,
    /// Everything was installed but the final reboot command failed.
    InstalledRebootFailed,
}

/// Failure classes, one exit code each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    Prerequisite,
    UserInput,
    UsbPermission,
    Adb,
    Fastboot,
    Remote,
    Recovery,
}

impl Outcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Installed => 0,
            Outcome::UserAborted => SUCCESS_BASE + 1,
            Outcome::BootloaderUnlocked => SUCCESS_BASE + 2,
            Outcome::InstalledRebootFailed => FailureCategory::Adb.exit_code(),
        }
    }
}

impl FailureCategory {
    pub fn exit_code(self) -> i32 {
        ERROR_BASE
            + match self {
                FailureCategory::Prerequisite => 1,
                FailureCategory::UserInput => 2,
                FailureCategory::UsbPermission => 3,
                FailureCategory::Adb => 4,
                FailureCategory::Fastboot => 5,
                FailureCategory::Remote => 6,
                FailureCategory::Recovery => 7,
            }
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureCategory::Prerequisite => "prerequisites",
            FailureCategory::UserInput => "user input",
            FailureCategory::UsbPermission => "usb permissions",
            FailureCategory::Adb => "adb",
            FailureCategory::Fastboot => "fastboot",
            FailureCategory::Remote => "remote",
            FailureCategory::Recovery => "recovery",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_bands() {
        assert_eq!(Outcome::Installed.exit_code(), 0);
        assert_eq!(Outcome::UserAborted.exit_code(), 33);
        assert_eq!(Outcome::BootloaderUnlocked.exit_code(), 34);
        assert_eq!(Outcome::InstalledRebootFailed.exit_code(), 68);

        let codes: Vec<i32> = [
            FailureCategory::Prerequisite,
            FailureCategory::UserInput,
            FailureCategory::UsbPermission,
            FailureCategory::Adb,
            FailureCategory::Fastboot,
            FailureCategory::Remote,
            FailureCategory::Recovery,
        ]
        .iter()
        .map(|c| c.exit_code())
        .collect();
        assert_eq!(codes, vec![65, 66, 67, 68, 69, 70, 71]);
    }
}
