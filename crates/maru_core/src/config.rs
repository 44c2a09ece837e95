use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants;
use crate::error::{InstallError, Result};
use crate::unlock::{LockPolicy, LockQuery};

/// Installer settings. Every key is optional; a missing file means all
/// defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallerConfig {
    pub product_name: String,
    pub work_dir: PathBuf,
    pub tools: ToolsConfig,
    pub release: ReleaseConfig,
    pub recovery: RecoveryConfig,
    pub delays: DelayConfig,
    /// Extra product id → lock query entries, e.g. `flo = "lock_state"`.
    pub lock_query: HashMap<String, LockQuery>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Explicit adb binary; discovered when unset.
    pub adb: Option<String>,
    /// Explicit fastboot binary; discovered when unset.
    pub fastboot: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
    pub endpoint: String,
    pub org: String,
    pub repo: String,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    pub endpoint: String,
    pub version_prefix: String,
    pub extension: String,
}

/// Fixed waits after actions that change device state asynchronously.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayConfig {
    pub bootloader_settle_secs: u64,
    pub recovery_settle_secs: u64,
    pub install_settle_secs: u64,
    pub wipe_settle_secs: u64,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            product_name: constants::PRODUCT_NAME.to_string(),
            work_dir: PathBuf::from("."),
            tools: ToolsConfig::default(),
            release: ReleaseConfig::default(),
            recovery: RecoveryConfig::default(),
            delays: DelayConfig::default(),
            lock_query: HashMap::new(),
        }
    }
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            endpoint: constants::RELEASE_ENDPOINT.to_string(),
            org: constants::RELEASE_ORG.to_string(),
            repo: constants::RELEASE_REPO.to_string(),
            user_agent: format!("maru-installer/{}", constants::VERSION),
        }
    }
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            endpoint: constants::TWRP_ENDPOINT.to_string(),
            version_prefix: constants::TWRP_VERSION_PREFIX.to_string(),
            extension: constants::TWRP_EXTENSION.to_string(),
        }
    }
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            bootloader_settle_secs: 7,
            recovery_settle_secs: 10,
            install_settle_secs: 2,
            wipe_settle_secs: 1,
        }
    }
}

impl DelayConfig {
    /// All waits zeroed, for driving the workflow in tests.
    pub fn none() -> Self {
        Self {
            bootloader_settle_secs: 0,
            recovery_settle_secs: 0,
            install_settle_secs: 0,
            wipe_settle_secs: 0,
        }
    }

    pub fn bootloader_settle(&self) -> Duration {
        Duration::from_secs(self.bootloader_settle_secs)
    }

    pub fn recovery_settle(&self) -> Duration {
        Duration::from_secs(self.recovery_settle_secs)
    }

    pub fn install_settle(&self) -> Duration {
        Duration::from_secs(self.install_settle_secs)
    }

    pub fn wipe_settle(&self) -> Duration {
        Duration::from_secs(self.wipe_settle_secs)
    }
}

impl InstallerConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| InstallError::Config(e.to_string()))
    }

    /// Reads `path`, falling back to defaults when it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text)
                .map_err(|e| InstallError::Config(format!("{}: {e}", path.display()))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn lock_policy(&self) -> LockPolicy {
        LockPolicy::default().with_overrides(self.lock_query.clone())
    }
}
