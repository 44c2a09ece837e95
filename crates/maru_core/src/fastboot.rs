use std::path::Path;
use std::sync::Arc;

use crate::classifier::FastbootDevicesClassifier;
use crate::device::{DeviceStatus, ToolKind};
use crate::error::Result;
use crate::runner::CommandRunner;
use crate::tool::DeviceTool;
use crate::unlock;

/// Bootloader-mode tool.
pub struct FastbootClient {
    tool: DeviceTool,
}

impl FastbootClient {
    pub fn new(program: impl Into<String>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            tool: DeviceTool::new(
                ToolKind::Fastboot,
                program,
                runner,
                Box::new(FastbootDevicesClassifier),
            ),
        }
    }

    pub async fn status(&self) -> Result<DeviceStatus> {
        self.tool.status().await
    }

    pub async fn get_var(&self, name: &str) -> Result<String> {
        let output = self.tool.run_action(&["getvar", name]).await?;
        unlock::parse_variable(name, &output)
    }

    pub async fn product(&self) -> Result<String> {
        self.get_var("product").await
    }

    /// Boots an image once without flashing it.
    pub async fn boot(&self, image: &Path) -> Result<()> {
        let image = image.to_string_lossy();
        self.tool.run_action(&["boot", &image]).await?;
        Ok(())
    }

    pub async fn reboot(&self) -> Result<()> {
        self.tool.run_action(&["reboot"]).await?;
        Ok(())
    }

    pub async fn device_info(&self) -> Result<String> {
        self.tool.run_action(&["oem", "device-info"]).await
    }

    /// Requests an unlock. The device asks the user to confirm on screen,
    /// so the lock state has not changed yet when this returns.
    pub async fn unlock(&self) -> Result<()> {
        self.tool.run_action(&["oem", "unlock"]).await?;
        Ok(())
    }
}
