use crate::device::DeviceStatus;

/// Turns raw `devices` output of a device tool into a [`DeviceStatus`].
///
/// The shipped classifiers match substrings of human-oriented output. Tools
/// that grow a machine-readable listing can get their own implementation
/// without the workflow noticing.
pub trait StatusClassifier: Send + Sync {
    fn classify(&self, output: &str) -> DeviceStatus;
}

const NO_PERMISSIONS: &str = "no permissions";
const UNAUTHORIZED: &str = "unauthorized";

/// `adb devices`: a fixed "List of devices attached" header, then one line
/// per device.
#[derive(Debug, Default, Clone, Copy)]
pub struct AdbDevicesClassifier;

impl StatusClassifier for AdbDevicesClassifier {
    fn classify(&self, output: &str) -> DeviceStatus {
        let first_device = output.lines().nth(1).unwrap_or("");
        if first_device.is_empty() {
            DeviceStatus::NoDeviceFound
        } else if output.contains(NO_PERMISSIONS) {
            DeviceStatus::NoUsbPermission
        } else if output.contains(UNAUTHORIZED) {
            DeviceStatus::DeviceUnauthorized
        } else {
            DeviceStatus::DeviceConnected
        }
    }
}

/// `fastboot devices`: prints nothing at all when no device is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct FastbootDevicesClassifier;

impl StatusClassifier for FastbootDevicesClassifier {
    fn classify(&self, output: &str) -> DeviceStatus {
        if output.is_empty() {
            DeviceStatus::NoDeviceFound
        } else if output.contains(NO_PERMISSIONS) {
            DeviceStatus::NoUsbPermission
        } else {
            DeviceStatus::DeviceConnected
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adb_header_with_empty_line_is_no_device() {
        let status = AdbDevicesClassifier.classify("List of devices attached\n\n");
        assert_eq!(status, DeviceStatus::NoDeviceFound);
    }

    #[test]
    fn adb_header_only_is_no_device() {
        assert_eq!(
            AdbDevicesClassifier.classify("List of devices attached\n"),
            DeviceStatus::NoDeviceFound
        );
        assert_eq!(AdbDevicesClassifier.classify(""), DeviceStatus::NoDeviceFound);
    }

    #[test]
    fn adb_empty_device_line_wins_over_other_text() {
        let output = "List of devices attached\n\nunauthorized no permissions\n";
        assert_eq!(AdbDevicesClassifier.classify(output), DeviceStatus::NoDeviceFound);
    }

    #[test]
    fn adb_unauthorized() {
        let output = "List of devices attached\n0123456789ABCDEF\tunauthorized\n\n";
        assert_eq!(AdbDevicesClassifier.classify(output), DeviceStatus::DeviceUnauthorized);
    }

    #[test]
    fn adb_no_permissions() {
        let output = "List of devices attached\n????????????\tno permissions (user in plugdev group)\n\n";
        assert_eq!(AdbDevicesClassifier.classify(output), DeviceStatus::NoUsbPermission);
    }

    #[test]
    fn adb_connected_with_crlf() {
        let output = "List of devices attached\r\n0123456789ABCDEF\tdevice\r\n\r\n";
        assert_eq!(AdbDevicesClassifier.classify(output), DeviceStatus::DeviceConnected);
    }

    #[test]
    fn fastboot_states() {
        assert_eq!(FastbootDevicesClassifier.classify(""), DeviceStatus::NoDeviceFound);
        assert_eq!(
            FastbootDevicesClassifier.classify("no permissions\n"),
            DeviceStatus::NoUsbPermission
        );
        assert_eq!(
            FastbootDevicesClassifier.classify("0123456789ABCDEF\tfastboot\n"),
            DeviceStatus::DeviceConnected
        );
    }
}
