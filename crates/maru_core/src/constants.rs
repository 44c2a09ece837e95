pub const APP_NAME: &str = "Maru installer";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const PRODUCT_NAME: &str = "Maru";
pub const CONFIG_FILE_NAME: &str = "maru-installer.toml";

pub const RELEASE_ENDPOINT: &str = "https://api.github.com";
pub const RELEASE_ORG: &str = "maruos";
pub const RELEASE_REPO: &str = "maruos";

pub const TWRP_ENDPOINT: &str = "https://dl.twrp.me";
pub const TWRP_VERSION_PREFIX: &str = "twrp-3.1.0-0-";
pub const TWRP_EXTENSION: &str = ".img";

/// Where the update package is pushed before TWRP installs it.
pub const DEVICE_PUSH_DIR: &str = "/sdcard";

/// Partitions wiped after install, in order. `/data/media` survives a TWRP
/// data wipe.
pub const WIPE_TARGETS: &[&str] = &["cache", "dalvik", "data"];
