use thiserror::Error;

use crate::device::ToolKind;

#[derive(Error, Debug)]
pub enum InstallError {
    #[error("{tool}: command failed: {}", .output.trim())]
    Tool { tool: ToolKind, output: String },

    #[error("{tool}: failed to start `{program}`: {source}")]
    Spawn {
        tool: ToolKind,
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("fastboot: variable not reported: {0}")]
    VariableNotFound(String),

    #[error("github: no release found for device: {0:?}")]
    NoRelease(String),

    #[error("invalid download url: {0}")]
    InvalidUrl(String),

    #[error("invalid request header: {0}")]
    InvalidHeader(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed server response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl InstallError {
    /// Raw captured output of a failed tool run, if this error carries one.
    pub fn tool_output(&self) -> Option<&str> {
        match self {
            InstallError::Tool { output, .. } => Some(output),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, InstallError>;
