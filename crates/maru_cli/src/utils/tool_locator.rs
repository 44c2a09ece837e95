use maru_core::ToolKind;
use std::env;
use std::path::{Path, PathBuf};

/// Directory of the running executable. Bundled tools and downloads live
/// here.
pub fn exe_dir() -> Option<PathBuf> {
    let exe = env::current_exe().ok()?;
    exe.parent().map(Path::to_path_buf)
}

/// Finds the tool binary, preferring copies shipped with the installer.
/// Falls back to the bare name so `PATH` is searched.
pub fn locate_tool(kind: ToolKind, exe_dir: Option<&Path>, cwd: Option<&Path>) -> String {
    let binary = kind.default_binary();
    let mut candidates = Vec::new();
    if let Some(dir) = exe_dir {
        candidates.push(dir.join(binary));
        candidates.push(dir.join("platform-tools").join(binary));
    }
    if let Some(dir) = cwd {
        candidates.push(dir.join("platform-tools").join(binary));
    }

    candidates
        .into_iter()
        .find(|p| p.is_file())
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| binary.to_string())
}
