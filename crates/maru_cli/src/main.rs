mod progress;
mod ui;
mod utils;

use anyhow::Context;
use clap::Parser;
use colored::*;
use figlet_rs::FIGfont;
use maru_core::constants::{APP_NAME, CONFIG_FILE_NAME, PRODUCT_NAME, VERSION};
use maru_core::{FailureCategory, InstallFailure, Installer, InstallerConfig, Outcome, SystemRunner, ToolKind};
use std::env;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::utils::tool_locator;

const LOG_ENV: &str = "MARU_LOG";

#[derive(Parser, Debug)]
#[command(name = "maru-installer", about = "Installs Maru OS on a supported Android device", disable_version_flag = true)]
struct Args {
    /// Print the program version and exit
    #[arg(long)]
    version: bool,
}

#[cfg(target_os = "windows")]
fn enable_virtual_terminal() {
    use windows_sys::Win32::System::Console::{
        ENABLE_VIRTUAL_TERMINAL_PROCESSING, GetConsoleMode, GetStdHandle, STD_OUTPUT_HANDLE,
        SetConsoleMode, SetConsoleOutputCP,
    };
    unsafe {
        let handle = GetStdHandle(STD_OUTPUT_HANDLE);
        if handle.is_null() {
            return;
        }
        let mut mode: u32 = 0;
        if GetConsoleMode(handle, &mut mode) != 0 {
            let _ = SetConsoleMode(handle, mode | ENABLE_VIRTUAL_TERMINAL_PROCESSING);
        }
        SetConsoleOutputCP(65001);
    }
}

fn init_logging() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .context("failed to initialise logging")
}

fn banner() {
    let art = FIGfont::standard()
        .ok()
        .and_then(|font| font.convert(PRODUCT_NAME).map(|f| f.to_string()));
    match art {
        Some(art) => println!("{}", art.cyan()),
        None => println!("{}", PRODUCT_NAME.cyan().bold()),
    }
}

/// Exits with `code`. On Windows the installer is usually started by
/// double-clicking, and the console window would vanish with the last
/// messages, so wait for Enter first.
fn exit(code: i32) -> ! {
    if cfg!(target_os = "windows") {
        print!("\n{}", "Press [Enter] to exit...".bright_black());
        let _ = io::stdout().flush();
        let mut unused = String::new();
        let _ = io::stdin().read_line(&mut unused);
    }
    std::process::exit(code)
}

fn load_config() -> anyhow::Result<InstallerConfig> {
    let exe_dir = tool_locator::exe_dir();
    let cwd = env::current_dir().ok();

    let mut cfg = InstallerConfig::load_or_default(Path::new(CONFIG_FILE_NAME))
        .with_context(|| format!("failed to load {}", CONFIG_FILE_NAME))?;
    if cfg.tools.adb.is_none() {
        cfg.tools.adb = Some(tool_locator::locate_tool(ToolKind::Adb, exe_dir.as_deref(), cwd.as_deref()));
    }
    if cfg.tools.fastboot.is_none() {
        cfg.tools.fastboot = Some(tool_locator::locate_tool(
            ToolKind::Fastboot,
            exe_dir.as_deref(),
            cwd.as_deref(),
        ));
    }
    debug!(?cfg, "configuration loaded");
    Ok(cfg)
}

fn report_failure(failure: &InstallFailure) {
    info!(stage = %failure.stage, category = %failure.category, "install failed");
    ui::err(&failure.message);
    if let Some(help) = failure.help {
        println!("{}", help);
    }
}

async fn run() -> i32 {
    // keep downloads and temporary files next to the installer
    if let Some(dir) = tool_locator::exe_dir()
        && env::set_current_dir(&dir).is_err()
    {
        ui::warn("Warning: failed to change working directory");
    }

    let installer = match load_config()
        .and_then(|cfg| Installer::from_config(&cfg, Arc::new(SystemRunner)).map_err(Into::into))
    {
        Ok(installer) => installer,
        Err(e) => {
            ui::err(&format!("{:#}", e));
            return FailureCategory::Prerequisite.exit_code();
        }
    };

    banner();
    let mut terminal = ui::TerminalUi::new();
    match installer.run(&mut terminal).await {
        Ok(outcome) => {
            if outcome == Outcome::Installed {
                ui::ok("Done.");
            }
            outcome.exit_code()
        }
        Err(failure) => {
            report_failure(&failure);
            failure.exit_code()
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    #[cfg(target_os = "windows")]
    enable_virtual_terminal();

    let args = Args::parse();
    if args.version {
        println!(
            "{} version {} {}/{}",
            APP_NAME,
            VERSION,
            env::consts::OS,
            env::consts::ARCH
        );
        exit(0);
    }

    if let Err(e) = init_logging() {
        eprintln!("{:#}", e);
    }

    if let Err(e) = ctrlc::set_handler(|| ui::interrupted()) {
        ui::warn(&format!("Could not install Ctrl-C handler: {}", e));
    }

    exit(run().await);
}
