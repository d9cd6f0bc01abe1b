//! CLI prompts using cliclack (Charm-style inline prompts)
//!
//! This module is optional and only available when the `tui` feature is enabled.

#[cfg(feature = "tui")]
mod prompts;
#[cfg(feature = "tui")]
mod view;

#[cfg(feature = "tui")]
pub use prompts::{
    open_docs, report_failure, run_component, run_project, ComponentArgs, ProjectArgs,
};
#[cfg(feature = "tui")]
pub use view::SpinnerView;
