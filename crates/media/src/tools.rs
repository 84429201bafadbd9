//! External tool availability.

use std::process::Command;

/// Availability of one external binary.
#[derive(Debug, Clone)]
pub struct ToolStatus {
    pub name: &'static str,
    pub available: bool,
    /// First line of `<tool> -version`, when available.
    pub version: Option<String>,
}

/// Tools the ffmpeg backend needs.
pub const REQUIRED_TOOLS: [&str; 2] = ["ffmpeg", "ffprobe"];

pub fn command_exists(binary: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {binary} >/dev/null 2>&1"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

fn tool_version(binary: &str) -> Option<String> {
    let output = Command::new(binary).arg("-version").output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|l| l.trim().to_string())
}

/// Probe every required tool.
pub fn check_tools() -> Vec<ToolStatus> {
    REQUIRED_TOOLS
        .iter()
        .map(|&name| {
            let available = command_exists(name);
            ToolStatus {
                name,
                available,
                version: available.then(|| tool_version(name)).flatten(),
            }
        })
        .collect()
}
