//! Runtime detection and theme dependency installation

pub mod check;
pub mod deps;

pub use check::{check_node, check_program, normalize_version, trimmed, RuntimeInfo};
pub use deps::{DependencyInstaller, InstallOutcome};
