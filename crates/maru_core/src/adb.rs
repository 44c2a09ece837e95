use std::path::Path;
use std::sync::Arc;

use crate::classifier::AdbDevicesClassifier;
use crate::device::{DeviceStatus, ToolKind};
use crate::error::Result;
use crate::runner::CommandRunner;
use crate::tool::DeviceTool;

/// Normal-mode tool. Also talks to the recovery environment once it has
/// booted, since recovery exposes an adb shell.
pub struct AdbClient {
    tool: DeviceTool,
}

impl AdbClient {
    pub fn new(program: impl Into<String>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            tool: DeviceTool::new(ToolKind::Adb, program, runner, Box::new(AdbDevicesClassifier)),
        }
    }

    pub async fn status(&self) -> Result<DeviceStatus> {
        self.tool.status().await
    }

    /// `None` reboots back into the regular OS.
    pub async fn reboot(&self, target: Option<&str>) -> Result<()> {
        let mut args = vec!["reboot"];
        if let Some(t) = target {
            args.push(t);
        }
        self.tool.run_action(&args).await?;
        Ok(())
    }

    pub async fn shell(&self, command: &str) -> Result<String> {
        self.tool.run_action(&["shell", command]).await
    }

    pub async fn push(&self, local: &Path, remote: &str) -> Result<()> {
        let local = local.to_string_lossy();
        self.tool.run_action(&["push", &local, remote]).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::scripted::ScriptedRunner;

    #[tokio::test]
    async fn reboot_without_target_passes_no_extra_argument() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.ok("adb reboot", "").ok("adb reboot bootloader", "");

        let adb = AdbClient::new("adb", runner.clone());
        adb.reboot(None).await.unwrap();
        adb.reboot(Some("bootloader")).await.unwrap();
        assert_eq!(runner.calls(), vec!["adb reboot", "adb reboot bootloader"]);
    }

    #[tokio::test]
    async fn shell_failure_is_error() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.fail("adb shell twrp wipe cache", "error: closed\n");

        let adb = AdbClient::new("adb", runner);
        let err = adb.shell("twrp wipe cache").await.unwrap_err();
        assert_eq!(err.tool_output(), Some("error: closed\n"));
    }
}
