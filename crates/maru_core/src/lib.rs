pub mod error;
pub mod device;
pub mod classifier;
pub mod runner;
pub mod tool;
pub mod adb;
pub mod fastboot;
pub mod unlock;
pub mod remote;
pub mod workflow;

pub mod config;
pub mod constants;
pub mod exit;
pub mod messages;
pub mod progress;

pub use error::{InstallError, Result};
pub use device::{DeviceStatus, ToolKind};
pub use adb::AdbClient;
pub use fastboot::FastbootClient;
pub use config::InstallerConfig;
pub use exit::{FailureCategory, Outcome};
pub use progress::ProgressReporter;
pub use runner::{CommandRunner, SystemRunner};
pub use workflow::{InstallFailure, InstallUi, Installer, Stage};
