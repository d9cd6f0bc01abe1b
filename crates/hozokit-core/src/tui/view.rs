//! Spinner-backed progress view

use crate::error::Warning;
use crate::progress::ProgressView;
use colored::Colorize;
use std::cell::RefCell;

/// Shows one cliclack spinner per running task
#[derive(Default)]
pub struct SpinnerView {
    spinner: RefCell<Option<cliclack::ProgressBar>>,
}

impl SpinnerView {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressView for SpinnerView {
    fn started(&self, label: &str) {
        let spinner = cliclack::spinner();
        spinner.start(label);
        *self.spinner.borrow_mut() = Some(spinner);
    }

    fn succeeded(&self, label: &str) {
        if let Some(spinner) = self.spinner.borrow_mut().take() {
            spinner.stop(label);
        }
    }

    fn failed(&self, label: &str, _reason: &str) {
        // The reason is reported once by the caller
        if let Some(spinner) = self.spinner.borrow_mut().take() {
            spinner.error(label);
        }
    }

    fn warned(&self, label: &str, _warning: &Warning) {
        if let Some(spinner) = self.spinner.borrow_mut().take() {
            spinner.stop(format!("{} {}", label, "(skipped)".yellow()));
        }
    }
}
