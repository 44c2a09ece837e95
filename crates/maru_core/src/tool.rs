use std::sync::Arc;

use crate::classifier::StatusClassifier;
use crate::device::{DeviceStatus, ToolKind};
use crate::error::{InstallError, Result};
use crate::runner::CommandRunner;

/// One external device tool bound to its binary.
///
/// Holds no state between calls: every action is a fresh process run whose
/// success is judged by exit code alone.
pub struct DeviceTool {
    kind: ToolKind,
    program: String,
    runner: Arc<dyn CommandRunner>,
    classifier: Box<dyn StatusClassifier>,
}

impl DeviceTool {
    pub fn new(
        kind: ToolKind,
        program: impl Into<String>,
        runner: Arc<dyn CommandRunner>,
        classifier: Box<dyn StatusClassifier>,
    ) -> Self {
        Self {
            kind,
            program: program.into(),
            runner,
            classifier,
        }
    }

    /// Runs the tool and returns its combined output.
    ///
    /// A non-zero exit becomes [`InstallError::Tool`] with the captured
    /// output kept verbatim, since both tools mostly explain failures in
    /// free text.
    pub async fn run_action(&self, args: &[&str]) -> Result<String> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        let out = self
            .runner
            .run(&self.program, &args)
            .await
            .map_err(|source| InstallError::Spawn {
                tool: self.kind,
                program: self.program.clone(),
                source,
            })?;

        if out.success {
            Ok(out.output)
        } else {
            Err(InstallError::Tool {
                tool: self.kind,
                output: out.output,
            })
        }
    }

    pub async fn status(&self) -> Result<DeviceStatus> {
        let output = self.run_action(&["devices"]).await?;
        Ok(self.classifier.classify(&output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::FastbootDevicesClassifier;
    use crate::runner::scripted::ScriptedRunner;

    fn tool(runner: Arc<ScriptedRunner>) -> DeviceTool {
        DeviceTool::new(ToolKind::Fastboot, "fastboot", runner, Box::new(FastbootDevicesClassifier))
    }

    #[tokio::test]
    async fn failure_keeps_raw_output() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.fail("fastboot boot twrp.img", "FAILED (remote: 'unknown command')\n");

        let err = tool(runner).run_action(&["boot", "twrp.img"]).await.unwrap_err();
        assert_eq!(err.tool_output(), Some("FAILED (remote: 'unknown command')\n"));
        assert!(err.to_string().starts_with("fastboot:"));
    }

    #[tokio::test]
    async fn missing_binary_is_spawn_error() {
        let runner = Arc::new(ScriptedRunner::new());
        let err = tool(runner).status().await.unwrap_err();
        assert!(matches!(err, InstallError::Spawn { tool: ToolKind::Fastboot, .. }));
    }

    #[tokio::test]
    async fn status_is_requeried_every_time() {
        let runner = Arc::new(ScriptedRunner::new());
        runner
            .ok("fastboot devices", "")
            .ok("fastboot devices", "0123456789ABCDEF\tfastboot\n");

        let fastboot = tool(runner.clone());
        assert_eq!(fastboot.status().await.unwrap(), DeviceStatus::NoDeviceFound);
        assert_eq!(fastboot.status().await.unwrap(), DeviceStatus::DeviceConnected);
        assert_eq!(runner.calls().len(), 2);
    }
}
