use std::fmt;

/// Connection state of a device as seen by one of the device tools.
///
/// Always derived from the latest `devices` output; the device can change
/// mode behind our back, so a status is never reused across queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceStatus {
    NoDeviceFound,
    NoUsbPermission,
    DeviceUnauthorized,
    DeviceConnected,
}

/// Which external tool a facade wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    /// Normal (booted OS or recovery) mode.
    Adb,
    /// Bootloader mode.
    Fastboot,
}

impl ToolKind {
    pub fn default_binary(self) -> &'static str {
        match (self, cfg!(target_os = "windows")) {
            (ToolKind::Adb, true) => "adb.exe",
            (ToolKind::Adb, false) => "adb",
            (ToolKind::Fastboot, true) => "fastboot.exe",
            (ToolKind::Fastboot, false) => "fastboot",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolKind::Adb => f.write_str("adb"),
            ToolKind::Fastboot => f.write_str("fastboot"),
        }
    }
}
