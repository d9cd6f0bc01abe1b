//! Runtime detection for Node.js

use std::process::Command;

/// Runtime detection result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeInfo {
    pub name: &'static str,
    /// Version exactly as printed by the runtime, trimmed
    pub version: Option<String>,
    pub available: bool,
}

impl RuntimeInfo {
    fn missing(name: &'static str) -> Self {
        Self {
            name,
            version: None,
            available: false,
        }
    }
}

/// Check if Node.js is available
pub fn check_node() -> RuntimeInfo {
    check_program("Node.js", "node")
}

/// Run `<program> --version` and report what it printed
pub fn check_program(name: &'static str, program: &str) -> RuntimeInfo {
    let output = Command::new(program).arg("--version").output();

    match output {
        Ok(out) if out.status.success() => RuntimeInfo {
            name,
            version: trimmed(&String::from_utf8_lossy(&out.stdout)),
            available: true,
        },
        _ => RuntimeInfo::missing(name),
    }
}

/// Trim a version string, `None` when nothing is left
pub fn trimmed(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Trim a version string and drop the leading `v`, for display
pub fn normalize_version(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let version = trimmed.strip_prefix('v').unwrap_or(trimmed);
    if version.is_empty() {
        None
    } else {
        Some(version.to_string())
    }
}
