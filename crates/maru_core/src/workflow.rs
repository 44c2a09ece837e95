use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::adb::AdbClient;
use crate::config::{DelayConfig, InstallerConfig};
use crate::constants::{DEVICE_PUSH_DIR, WIPE_TARGETS};
use crate::device::{DeviceStatus, ToolKind};
use crate::error::{InstallError, Result};
use crate::exit::{FailureCategory, Outcome};
use crate::fastboot::FastbootClient;
use crate::messages;
use crate::progress::ProgressReporter;
use crate::remote::{self, DownloadRequest, Fetched, GitHubClient, RecoveryImageSource, ReleaseServer};
use crate::runner::CommandRunner;
use crate::unlock::LockPolicy;

/// Front end the workflow talks to the user through.
pub trait InstallUi {
    /// Plain text, printed as is.
    fn say(&mut self, msg: &str);
    fn step(&mut self, msg: &str);
    fn warn(&mut self, msg: &str);
    /// Reads one line of input, without its line terminator.
    fn ask(&mut self, prompt: &str) -> io::Result<String>;
    fn progress(&self) -> Arc<dyn ProgressReporter>;
}

/// Steps of an install run, in the order they are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AwaitingConfirmation,
    VerifyingTools,
    CheckingMode,
    RebootingToBootloader,
    VerifyingBootloader,
    IdentifyingDevice,
    UnlockingBootloader,
    ResolvingArtifacts,
    DownloadingArtifacts,
    FlashingRecovery,
    TransferringPackage,
    Installing,
    Wiping,
    FinalReboot,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A fatal error, already classified and worded for the user.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct InstallFailure {
    pub stage: Stage,
    pub category: FailureCategory,
    pub message: String,
    /// Longer troubleshooting text, if there is one for this failure.
    pub help: Option<&'static str>,
    #[source]
    pub source: Option<InstallError>,
}

impl InstallFailure {
    fn new(stage: Stage, category: FailureCategory, message: impl Into<String>) -> Self {
        Self {
            stage,
            category,
            message: message.into(),
            help: None,
            source: None,
        }
    }

    fn caused_by(stage: Stage, category: FailureCategory, context: &str, source: InstallError) -> Self {
        Self {
            stage,
            category,
            message: format!("{context}: {source}"),
            help: None,
            source: Some(source),
        }
    }

    fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }

    pub fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }
}

type StepResult<T> = std::result::Result<T, InstallFailure>;

/// Drives one device from "connected over USB" to "running the new OS".
///
/// Every step runs once, in order. The first failure ends the run;
/// artifacts downloaded so far stay in the working directory so the next
/// run can skip them.
pub struct Installer {
    adb: AdbClient,
    fastboot: FastbootClient,
    releases: Box<dyn ReleaseServer>,
    recovery: RecoveryImageSource,
    lock_policy: LockPolicy,
    http: reqwest::Client,
    product_name: String,
    work_dir: PathBuf,
    delays: DelayConfig,
}

impl Installer {
    pub fn from_config(cfg: &InstallerConfig, runner: Arc<dyn CommandRunner>) -> Result<Self> {
        let http = remote::http_client(&cfg.release)?;
        let adb_program = cfg
            .tools
            .adb
            .clone()
            .unwrap_or_else(|| ToolKind::Adb.default_binary().to_string());
        let fastboot_program = cfg
            .tools
            .fastboot
            .clone()
            .unwrap_or_else(|| ToolKind::Fastboot.default_binary().to_string());

        Ok(Self {
            adb: AdbClient::new(adb_program, runner.clone()),
            fastboot: FastbootClient::new(fastboot_program, runner),
            releases: Box::new(GitHubClient::new(http.clone(), &cfg.release)),
            recovery: RecoveryImageSource::new(&cfg.recovery),
            lock_policy: cfg.lock_policy(),
            http,
            product_name: cfg.product_name.clone(),
            work_dir: cfg.work_dir.clone(),
            delays: cfg.delays.clone(),
        })
    }

    pub fn with_release_server(mut self, releases: Box<dyn ReleaseServer>) -> Self {
        self.releases = releases;
        self
    }

    pub async fn run(&self, ui: &mut dyn InstallUi) -> StepResult<Outcome> {
        ui.say(&messages::welcome(&self.product_name));
        if !self.confirm(ui)? {
            ui.say("");
            ui.say("Aborting installation.");
            return Ok(Outcome::UserAborted);
        }

        ui.say("");
        ui.step("Verifying installer tools...");
        self.verify_tools().await?;

        ui.step("Checking USB permissions...");
        self.ensure_bootloader(ui).await?;
        self.verify_bootloader().await?;

        ui.step("Identifying your device...");
        let product = self.fastboot.product().await.map_err(|e| {
            InstallFailure::caused_by(
                Stage::IdentifyingDevice,
                FailureCategory::Fastboot,
                "Failed to get device product info",
                e,
            )
        })?;
        info!(%product, "device identified");

        let unlocked = match self.lock_policy.is_unlocked(&self.fastboot, &product).await {
            Ok(unlocked) => unlocked,
            Err(e) => {
                warn!(error = %e, "lock state query failed");
                ui.warn(&format!("Warning: unable to determine bootloader lock state: {e}"));
                false
            }
        };
        if !unlocked {
            return self.unlock_bootloader(ui).await;
        }

        ui.step(&format!(
            "Downloading the latest release for your device ({product:?})..."
        ));
        let package = self
            .fetch_artifact(ui, self.releases.request_latest_release(&product).await, "the latest release")
            .await?;

        ui.step("Downloading TWRP for your device...");
        let recovery_image = self
            .fetch_artifact(ui, self.recovery.request(&product), "TWRP")
            .await?;

        self.install(ui, &recovery_image, &package).await
    }

    fn confirm(&self, ui: &mut dyn InstallUi) -> StepResult<bool> {
        let prompt = format!("Are you ready to install {}? (yes/no): ", self.product_name);
        let answer = ui.ask(&prompt).map_err(|e| {
            InstallFailure::caused_by(
                Stage::AwaitingConfirmation,
                FailureCategory::UserInput,
                "Failed to read input",
                e.into(),
            )
        })?;
        Ok(answer.trim_end_matches(['\r', '\n']) == "yes")
    }

    async fn verify_tools(&self) -> StepResult<()> {
        let prereq = |tool: &str, e: InstallError| {
            InstallFailure::caused_by(
                Stage::VerifyingTools,
                FailureCategory::Prerequisite,
                &format!("Failed to run {tool}"),
                e,
            )
            .with_help(messages::INCOMPLETE_INSTALL)
        };
        self.adb.status().await.map_err(|e| prereq("adb", e))?;
        self.fastboot.status().await.map_err(|e| prereq("fastboot", e))?;
        Ok(())
    }

    /// Gets the device into the bootloader if it is still in normal mode.
    async fn ensure_bootloader(&self, ui: &mut dyn InstallUi) -> StepResult<()> {
        let status = self.fastboot.status().await.unwrap_or_else(|e| {
            debug!(error = %e, "fastboot status failed, assuming normal mode");
            DeviceStatus::NoDeviceFound
        });
        if status != DeviceStatus::NoDeviceFound {
            return Ok(());
        }

        self.verify_normal_mode().await?;

        ui.step("Rebooting your device into bootloader...");
        let stage = Stage::RebootingToBootloader;
        self.adb.reboot(Some("bootloader")).await.map_err(|e| {
            InstallFailure::caused_by(stage, FailureCategory::Adb, "Failed to reboot into bootloader", e)
        })?;

        sleep(self.delays.bootloader_settle()).await;

        match self.fastboot.status().await {
            Ok(DeviceStatus::NoDeviceFound) | Err(_) => Err(InstallFailure::new(
                stage,
                FailureCategory::Adb,
                "Failed to reboot device into bootloader!",
            )),
            Ok(_) => Ok(()),
        }
    }

    async fn verify_normal_mode(&self) -> StepResult<()> {
        let stage = Stage::CheckingMode;
        let status = self.adb.status().await.map_err(|e| {
            InstallFailure::caused_by(stage, FailureCategory::Adb, "Failed to get adb status", e)
        })?;
        match status {
            DeviceStatus::NoDeviceFound | DeviceStatus::DeviceUnauthorized => Err(
                InstallFailure::new(stage, FailureCategory::Adb, format!("adb reports {status:?}"))
                    .with_help(messages::ADB_ISSUE),
            ),
            DeviceStatus::NoUsbPermission => Err(InstallFailure::new(
                stage,
                FailureCategory::UsbPermission,
                "Missing USB permissions for adb",
            )
            .with_help(messages::FIX_USB_PERMISSIONS)),
            DeviceStatus::DeviceConnected => Ok(()),
        }
    }

    async fn verify_bootloader(&self) -> StepResult<()> {
        let stage = Stage::VerifyingBootloader;
        let status = self.fastboot.status().await.map_err(|e| {
            InstallFailure::caused_by(stage, FailureCategory::Fastboot, "Failed to get fastboot status", e)
        })?;
        match status {
            DeviceStatus::NoDeviceFound => Err(InstallFailure::new(
                stage,
                FailureCategory::Fastboot,
                "No device found in bootloader mode",
            )
            .with_help(messages::BOOTLOADER_NO_DEVICE)),
            DeviceStatus::NoUsbPermission => Err(InstallFailure::new(
                stage,
                FailureCategory::UsbPermission,
                "Missing USB permissions for fastboot",
            )
            .with_help(messages::FIX_USB_PERMISSIONS)),
            _ => Ok(()),
        }
    }

    /// Unlocking reboots and wipes the device, so the run stops here and the
    /// user starts over once it is back up.
    async fn unlock_bootloader(&self, ui: &mut dyn InstallUi) -> StepResult<Outcome> {
        ui.step("Unlocking bootloader, you will need to confirm this on your device...");
        self.fastboot.unlock().await.map_err(|e| {
            InstallFailure::caused_by(
                Stage::UnlockingBootloader,
                FailureCategory::Fastboot,
                "Failed to unlock bootloader",
                e,
            )
        })?;
        if let Err(e) = self.fastboot.reboot().await {
            warn!(error = %e, "reboot after unlock failed");
        }
        ui.say(messages::UNLOCK_REBOOT_REQUIRED);
        Ok(Outcome::BootloaderUnlocked)
    }

    async fn fetch_artifact(
        &self,
        ui: &mut dyn InstallUi,
        request: Result<DownloadRequest>,
        what: &str,
    ) -> StepResult<PathBuf> {
        let mut request = request.map_err(|e| {
            InstallFailure::caused_by(
                Stage::ResolvingArtifacts,
                FailureCategory::Remote,
                &format!("Failed to request {what}"),
                e,
            )
        })?;
        request.set_progress(ui.progress());

        match request.fetch(&self.http, &self.work_dir).await {
            Ok(Fetched::Cached(path)) => {
                debug!(path = %path.display(), "reusing earlier download");
                Ok(path)
            }
            Ok(Fetched::Downloaded(path)) => Ok(path),
            Err(e) => {
                // the progress bar may have been left mid-line
                ui.say("");
                Err(InstallFailure::caused_by(
                    Stage::DownloadingArtifacts,
                    FailureCategory::Remote,
                    &format!("Failed to download {what}"),
                    e,
                ))
            }
        }
    }

    async fn install(&self, ui: &mut dyn InstallUi, recovery_image: &Path, package: &Path) -> StepResult<Outcome> {
        ui.step(&format!(
            "Temporarily booting TWRP to flash {} update zip...",
            self.product_name
        ));
        self.fastboot.boot(recovery_image).await.map_err(|e| {
            InstallFailure::caused_by(Stage::FlashingRecovery, FailureCategory::Recovery, "Failed to boot TWRP", e)
        })?;
        sleep(self.delays.recovery_settle()).await;

        ui.step(&format!(
            "Transferring the {} update zip to your device...",
            self.product_name
        ));
        self.adb.push(package, DEVICE_PUSH_DIR).await.map_err(|e| {
            InstallFailure::caused_by(
                Stage::TransferringPackage,
                FailureCategory::Adb,
                "Failed to push update zip to device",
                e,
            )
        })?;

        ui.step(&format!(
            "Installing {}, please keep your device connected...",
            self.product_name
        ));
        let package_name = package
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.adb
            .shell(&format!("twrp install {DEVICE_PUSH_DIR}/{package_name}"))
            .await
            .map_err(|e| {
                InstallFailure::caused_by(Stage::Installing, FailureCategory::Recovery, "Failed to flash update zip", e)
            })?;
        // TWRP gets confused by commands issued right after an install
        sleep(self.delays.install_settle()).await;

        ui.step("Wiping your device without wiping /data/media...");
        for target in WIPE_TARGETS {
            self.adb
                .shell(&format!("twrp wipe {target}"))
                .await
                .map_err(|e| {
                    InstallFailure::caused_by(
                        Stage::Wiping,
                        FailureCategory::Recovery,
                        &format!("Failed to wipe {target}"),
                        e,
                    )
                })?;
            sleep(self.delays.wipe_settle()).await;
        }

        ui.say(&messages::install_complete(&self.product_name));
        if let Err(e) = self.adb.reboot(None).await {
            warn!(stage = %Stage::FinalReboot, error = %e, "final reboot failed");
            ui.warn(&format!("Failed to reboot: {e}"));
            ui.say(messages::MANUAL_REBOOT);
            return Ok(Outcome::InstalledRebootFailed);
        }
        Ok(Outcome::Installed)
    }
}
