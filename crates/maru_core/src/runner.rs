use async_trait::async_trait;
use std::io;
use tokio::process::Command;
use tracing::debug;

/// What a finished external command left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    /// stdout followed by stderr. fastboot writes `getvar` and
    /// `oem device-info` results to stderr only.
    pub output: String,
}

/// Runs an external program to completion.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput> {
        debug!(program, ?args, "spawning");
        let output = Command::new(program).args(args).output().await?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        debug!(program, status = ?output.status.code(), output = %combined.trim_end(), "finished");

        Ok(CommandOutput {
            success: output.status.success(),
            output: combined,
        })
    }
}
