//! Progress tracking for named tasks within a pipeline stage
//!
//! A [`TaskSet`] holds a fixed list of labels. Each task settles exactly once,
//! and the set produces a single [`Settlement`]:
//!
//! - `AllSucceeded` once every task succeeded (never earlier)
//! - `Failed` on the first task error
//!
//! [`ProgressReporter`] drives a `TaskSet` from futures and mirrors every
//! transition to a [`ProgressView`] (terminal spinners, or nothing).

use crate::error::{ScaffoldError, Warning};
use std::fmt::Display;
use std::future::Future;
use thiserror::Error;

/// Misuse of a task set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressError {
    #[error("unknown task '{0}'")]
    UnknownTask(String),

    #[error("task '{0}' has already settled")]
    AlreadySettled(String),
}

/// State of a single task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Succeeded,
    Failed(String),
}

impl TaskState {
    pub fn is_pending(&self) -> bool {
        matches!(self, TaskState::Pending)
    }
}

/// Aggregate outcome of a task set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    AllSucceeded,
    Failed { label: String, reason: String },
}

/// Fixed, ordered collection of named tasks
#[derive(Debug, Clone)]
pub struct TaskSet {
    tasks: Vec<(String, TaskState)>,
    settlement: Option<Settlement>,
}

impl TaskSet {
    /// Create a set with every task pending
    ///
    /// A set without tasks has nothing left to wait for and is settled as
    /// [`Settlement::AllSucceeded`] from the start.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tasks: Vec<(String, TaskState)> = labels
            .into_iter()
            .map(|l| (l.into(), TaskState::Pending))
            .collect();
        let settlement = tasks.is_empty().then_some(Settlement::AllSucceeded);
        Self { tasks, settlement }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.tasks.iter().map(|(l, _)| l.as_str())
    }

    pub fn state(&self, label: &str) -> Option<&TaskState> {
        self.tasks.iter().find(|(l, _)| l == label).map(|(_, s)| s)
    }

    /// The settlement, once one has been emitted
    pub fn settlement(&self) -> Option<&Settlement> {
        self.settlement.as_ref()
    }

    /// Mark a pending task as succeeded
    ///
    /// Returns the settlement if this call produced it.
    pub fn mark_success(&mut self, label: &str) -> Result<Option<Settlement>, ProgressError> {
        self.transition(label, TaskState::Succeeded)?;

        if self.settlement.is_none()
            && self
                .tasks
                .iter()
                .all(|(_, s)| matches!(s, TaskState::Succeeded))
        {
            self.settlement = Some(Settlement::AllSucceeded);
            return Ok(self.settlement.clone());
        }
        Ok(None)
    }

    /// Mark a pending task as failed
    ///
    /// The first failure settles the set; later failures are recorded only.
    pub fn mark_error(
        &mut self,
        label: &str,
        reason: impl Into<String>,
    ) -> Result<Option<Settlement>, ProgressError> {
        let reason = reason.into();
        self.transition(label, TaskState::Failed(reason.clone()))?;

        if self.settlement.is_none() {
            self.settlement = Some(Settlement::Failed {
                label: label.to_string(),
                reason,
            });
            return Ok(self.settlement.clone());
        }
        Ok(None)
    }

    fn transition(&mut self, label: &str, next: TaskState) -> Result<(), ProgressError> {
        let (_, state) = self
            .tasks
            .iter_mut()
            .find(|(l, _)| l == label)
            .ok_or_else(|| ProgressError::UnknownTask(label.to_string()))?;

        if !state.is_pending() {
            return Err(ProgressError::AlreadySettled(label.to_string()));
        }
        *state = next;
        Ok(())
    }
}

/// Display seam for task progress
pub trait ProgressView {
    fn started(&self, label: &str);
    fn succeeded(&self, label: &str);
    fn failed(&self, label: &str, reason: &str);
    fn warned(&self, label: &str, warning: &Warning);
}

/// View that renders nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct QuietView;

impl ProgressView for QuietView {
    fn started(&self, _label: &str) {}
    fn succeeded(&self, _label: &str) {}
    fn failed(&self, _label: &str, _reason: &str) {}
    fn warned(&self, _label: &str, _warning: &Warning) {}
}

/// Drives a [`TaskSet`] and mirrors it to a view
pub struct ProgressReporter<'a> {
    tasks: TaskSet,
    view: &'a dyn ProgressView,
}

impl<'a> ProgressReporter<'a> {
    pub fn new<I, S>(labels: I, view: &'a dyn ProgressView) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tasks: TaskSet::new(labels),
            view,
        }
    }

    pub fn tasks(&self) -> &TaskSet {
        &self.tasks
    }

    /// Run `work` as the task `label`, settling it from the result
    pub async fn track<T, E, F>(&mut self, label: &str, work: F) -> Result<T, ScaffoldError>
    where
        F: Future<Output = Result<T, E>>,
        E: Into<ScaffoldError> + Display,
    {
        self.ensure_pending(label)?;

        self.view.started(label);
        match work.await {
            Ok(value) => {
                self.tasks.mark_success(label)?;
                self.view.succeeded(label);
                Ok(value)
            }
            Err(e) => {
                let reason = e.to_string();
                self.tasks.mark_error(label, &reason)?;
                self.view.failed(label, &reason);
                Err(e.into())
            }
        }
    }

    /// Run `work` as the task `label`; the task always succeeds
    ///
    /// A returned warning is shown in place of the success mark.
    pub async fn track_soft<T, F>(&mut self, label: &str, work: F) -> Result<T, ScaffoldError>
    where
        F: Future<Output = (T, Option<Warning>)>,
    {
        self.ensure_pending(label)?;

        self.view.started(label);
        let (value, warning) = work.await;
        match warning {
            Some(warning) => self.warn(label, &warning)?,
            None => {
                self.tasks.mark_success(label)?;
                self.view.succeeded(label);
            }
        }
        Ok(value)
    }

    /// Reject labels that are unknown or already settled before any work starts
    fn ensure_pending(&self, label: &str) -> Result<(), ProgressError> {
        match self.tasks.state(label) {
            None => Err(ProgressError::UnknownTask(label.to_string())),
            Some(state) if !state.is_pending() => {
                Err(ProgressError::AlreadySettled(label.to_string()))
            }
            Some(_) => Ok(()),
        }
    }

    /// Settle `label` as succeeded, showing a warning instead of a success mark
    pub fn warn(&mut self, label: &str, warning: &Warning) -> Result<(), ScaffoldError> {
        self.tasks.mark_success(label)?;
        self.view.warned(label, warning);
        Ok(())
    }

    /// Convert the settlement into a result
    pub fn finish(self) -> Result<(), ScaffoldError> {
        match self.tasks.settlement {
            Some(Settlement::AllSucceeded) => Ok(()),
            Some(Settlement::Failed { label, reason }) => {
                Err(ScaffoldError::TaskFailed { label, reason })
            }
            None => {
                let pending: Vec<&str> = self
                    .tasks
                    .tasks
                    .iter()
                    .filter(|(_, s)| s.is_pending())
                    .map(|(l, _)| l.as_str())
                    .collect();
                Err(ScaffoldError::TaskFailed {
                    label: pending.join(", "),
                    reason: "task never completed".to_string(),
                })
            }
        }
    }
}
