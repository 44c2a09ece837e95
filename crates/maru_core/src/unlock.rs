use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::error::{InstallError, Result};
use crate::fastboot::FastbootClient;

/// How the bootloader lock state of a product is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockQuery {
    /// `fastboot getvar lock_state`, compared against `unlocked`.
    LockState,
    /// `fastboot oem device-info`, scanned for a `Device unlocked` line.
    DeviceInfo,
}

/// Product id → lock query. Products not listed use [`LockQuery::DeviceInfo`].
#[derive(Debug, Clone)]
pub struct LockPolicy {
    overrides: HashMap<String, LockQuery>,
}

impl Default for LockPolicy {
    fn default() -> Self {
        let mut overrides = HashMap::new();
        // flo reports a wrong lock state from oem device-info
        overrides.insert("flo".to_string(), LockQuery::LockState);
        Self { overrides }
    }
}

impl LockPolicy {
    pub fn with_overrides(mut self, extra: impl IntoIterator<Item = (String, LockQuery)>) -> Self {
        self.overrides.extend(extra);
        self
    }

    pub fn query_for(&self, product: &str) -> LockQuery {
        self.overrides.get(product).copied().unwrap_or(LockQuery::DeviceInfo)
    }

    pub async fn is_unlocked(&self, fastboot: &FastbootClient, product: &str) -> Result<bool> {
        let query = self.query_for(product);
        debug!(product, ?query, "checking bootloader lock state");
        match query {
            LockQuery::LockState => Ok(fastboot.get_var("lock_state").await? == "unlocked"),
            LockQuery::DeviceInfo => Ok(parse_device_info(&fastboot.device_info().await?)),
        }
    }
}

/// Extracts `<value>` from the `<name>: <value>` line fastboot prints for
/// `getvar`.
pub fn parse_variable(name: &str, output: &str) -> Result<String> {
    output
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.trim_start_matches("(bootloader)").trim() == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| InstallError::VariableNotFound(name.to_string()))
}

/// Reads the unlocked flag from `oem device-info` output, e.g.
/// `(bootloader) Device unlocked: true`.
///
/// No matching line reads as locked. That cannot be told apart from a
/// device that really is locked.
pub fn parse_device_info(output: &str) -> bool {
    let mut unlocked = false;
    for line in output.lines().filter(|l| l.contains("Device unlocked")) {
        unlocked = line.split(' ').nth(3).map(str::trim) == Some("true");
    }
    unlocked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::scripted::ScriptedRunner;
    use std::sync::Arc;

    const DEVICE_INFO_UNLOCKED: &str = "\
(bootloader) Device tampered: false
(bootloader) Device unlocked: true
(bootloader) Charger screen enabled: false
OKAY [  0.003s]
finished. total time: 0.003s
";

    #[test]
    fn parse_variable_finds_named_line() {
        let out = "product: hammerhead\nfinished. total time: 0.001s\n";
        assert_eq!(parse_variable("product", out).unwrap(), "hammerhead");
        let out = "(bootloader) lock_state: unlocked\nOKAY\n";
        assert_eq!(parse_variable("lock_state", out).unwrap(), "unlocked");
    }

    #[test]
    fn parse_variable_missing_is_error() {
        let err = parse_variable("lock_state", "finished. total time: 0.001s\n").unwrap_err();
        assert!(matches!(err, InstallError::VariableNotFound(name) if name == "lock_state"));
        assert!(parse_variable("product", "product: \n").is_err());
    }

    #[test]
    fn device_info_unlocked_line() {
        assert!(parse_device_info(DEVICE_INFO_UNLOCKED));
        assert!(!parse_device_info("(bootloader) Device unlocked: false\n"));
    }

    #[test]
    fn device_info_without_line_reads_locked() {
        assert!(!parse_device_info("(bootloader) Device tampered: false\nOKAY\n"));
        assert!(!parse_device_info(""));
    }

    #[test]
    fn device_info_crlf() {
        assert!(parse_device_info("(bootloader) Device unlocked: true\r\n"));
    }

    #[tokio::test]
    async fn special_product_never_reads_device_info() {
        let runner = Arc::new(ScriptedRunner::new());
        runner
            .ok("fastboot getvar lock_state", "lock_state: locked\nfinished.\n")
            .ok("fastboot oem device-info", DEVICE_INFO_UNLOCKED);

        let fastboot = FastbootClient::new("fastboot", runner.clone());
        let unlocked = LockPolicy::default().is_unlocked(&fastboot, "flo").await.unwrap();
        assert!(!unlocked);
        assert_eq!(runner.calls(), vec!["fastboot getvar lock_state"]);
    }

    #[tokio::test]
    async fn other_products_read_device_info() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.ok("fastboot oem device-info", DEVICE_INFO_UNLOCKED);

        let fastboot = FastbootClient::new("fastboot", runner.clone());
        assert!(LockPolicy::default().is_unlocked(&fastboot, "hammerhead").await.unwrap());
        assert_eq!(runner.calls(), vec!["fastboot oem device-info"]);
    }

    #[test]
    fn overrides_extend_default_table() {
        let policy = LockPolicy::default()
            .with_overrides([("bullhead".to_string(), LockQuery::LockState)]);
        assert_eq!(policy.query_for("bullhead"), LockQuery::LockState);
        assert_eq!(policy.query_for("flo"), LockQuery::LockState);
        assert_eq!(policy.query_for("hammerhead"), LockQuery::DeviceInfo);
    }
}
