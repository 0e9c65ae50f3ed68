//! Per-file asynchronous tasks.
//!
//! A [`TaskRunner`] launches one blocking task per submitted request, right
//! away and without throttling. Each task reports its status through a
//! [`TaskHandle`] and its result through a [`TaskReport`]. The runner's
//! [`join_all`](TaskRunner::join_all) drains every task, calling a callback
//! once per completion, and only returns after the last one has finished.
//!
//! # Examples
//!
//! ```no_run
//! use pdfutil::engine::{OperationRequest, PdfEngine};
//! use pdfutil::task::TaskRunner;
//!
//! # async fn example() {
//! let mut runner = TaskRunner::new(PdfEngine::new());
//! for file in ["a.pdf", "b.pdf"] {
//!     runner.submit(OperationRequest::Encrypt {
//!         input: file.into(),
//!         password: "secret".into(),
//!         output: None,
//!     });
//! }
//!
//! let summary = runner
//!     .join_all(|report| println!("{}: {}", report.path.display(), report.status_label()))
//!     .await;
//! println!("{} of {} succeeded", summary.succeeded, summary.total);
//! # }
//! ```

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::backend::{LopdfBackend, PdfBackend};
use crate::engine::{OperationKind, OperationRequest, OperationResult, PdfEngine};
use crate::error::PdfUtilError;

/// Identifier of a submitted task, unique per runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TaskId(u64);

impl TaskId {
    /// Numeric value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Submitted, not yet picked up by a worker thread.
    Pending,
    /// Executing.
    Running,
    /// Finished with a result.
    Succeeded,
    /// Finished with an error.
    Failed,
}

impl TaskStatus {
    /// Whether the task has finished.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// Observer for one submitted task.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: TaskId,
    path: PathBuf,
    kind: OperationKind,
    status: watch::Receiver<TaskStatus>,
}

impl TaskHandle {
    /// Task identifier.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Input file the task works on.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Operation the task runs.
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Current status.
    pub fn status(&self) -> TaskStatus {
        *self.status.borrow()
    }

    /// Wait until the task reaches a terminal status.
    pub async fn wait(&mut self) -> TaskStatus {
        if let Ok(status) = self.status.wait_for(TaskStatus::is_terminal).await {
            return *status;
        }
        *self.status.borrow()
    }
}

/// Final result of one task.
#[derive(Debug)]
pub struct TaskReport {
    /// Task identifier.
    pub id: TaskId,
    /// Input file.
    pub path: PathBuf,
    /// Operation that ran.
    pub kind: OperationKind,
    /// Outcome of the operation.
    pub result: OperationResult,
}

impl TaskReport {
    /// Whether the operation succeeded.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Terminal status of the task.
    pub fn status(&self) -> TaskStatus {
        if self.is_success() {
            TaskStatus::Succeeded
        } else {
            TaskStatus::Failed
        }
    }

    /// Short per-file status text: "Encrypted", "Decrypted", "File not found"
    /// or the error message.
    pub fn status_label(&self) -> String {
        match &self.result {
            Ok(outcome) => outcome.kind.past_tense().to_string(),
            Err(err) => failure_label(err),
        }
    }

    /// Serializable view for machine-readable output.
    pub fn record(&self) -> TaskRecord {
        let outputs = match &self.result {
            Ok(outcome) => outcome.outputs.clone(),
            Err(_) => Vec::new(),
        };
        TaskRecord {
            id: Some(self.id),
            path: self.path.clone(),
            kind: self.kind,
            status: self.status(),
            message: self.status_label(),
            outputs,
        }
    }
}

/// Short text for a failed file: "File not found" or the error message.
pub fn failure_label(err: &PdfUtilError) -> String {
    match err {
        PdfUtilError::FileNotFound { .. } => "File not found".to_string(),
        other => other.to_string(),
    }
}

/// Serializable summary of a [`TaskReport`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    /// Task identifier, absent for inputs rejected before submission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<TaskId>,
    /// Input file.
    pub path: PathBuf,
    /// Operation that ran.
    pub kind: OperationKind,
    /// Terminal status.
    pub status: TaskStatus,
    /// Status label or error message.
    pub message: String,
    /// Files written.
    pub outputs: Vec<PathBuf>,
}

impl TaskRecord {
    /// Failed record for an input that never became a task.
    pub fn rejected(path: impl Into<PathBuf>, kind: OperationKind, err: &PdfUtilError) -> Self {
        Self {
            id: None,
            path: path.into(),
            kind,
            status: TaskStatus::Failed,
            message: failure_label(err),
            outputs: Vec::new(),
        }
    }
}

/// Aggregate result of [`TaskRunner::join_all`].
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Tasks joined.
    pub total: usize,
    /// Tasks that succeeded.
    pub succeeded: usize,
    /// Tasks that failed.
    pub failed: usize,
    /// Reports in submission order.
    pub reports: Vec<TaskReport>,
}

impl BatchSummary {
    /// Whether every task succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Runs requests as independent blocking tasks.
///
/// Must be used from within a Tokio runtime.
pub struct TaskRunner<B: PdfBackend = LopdfBackend> {
    engine: PdfEngine<B>,
    tasks: JoinSet<TaskReport>,
    next_id: u64,
}

impl<B: PdfBackend> TaskRunner<B> {
    /// Create a runner executing requests with `engine`.
    pub fn new(engine: PdfEngine<B>) -> Self {
        Self {
            engine,
            tasks: JoinSet::new(),
            next_id: 1,
        }
    }

    /// Launch `request` on the blocking pool immediately.
    pub fn submit(&mut self, request: OperationRequest) -> TaskHandle {
        let id = TaskId(self.next_id);
        self.next_id += 1;

        let kind = request.kind();
        let path = request
            .primary_input()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let (status_tx, status_rx) = watch::channel(TaskStatus::Pending);
        let engine = self.engine.clone();
        let task_path = path.clone();

        debug!(task = %id, %kind, path = %path.display(), "submitting task");

        self.tasks.spawn_blocking(move || {
            status_tx.send_replace(TaskStatus::Running);
            let result = panic::catch_unwind(AssertUnwindSafe(|| engine.execute(&request)))
                .unwrap_or_else(|payload| {
                    Err(PdfUtilError::other(format!(
                        "Error {} PDF {}: task panicked: {}",
                        kind.gerund(),
                        task_path.display(),
                        panic_message(payload.as_ref())
                    )))
                });
            let report = TaskReport {
                id,
                path: task_path,
                kind,
                result,
            };
            status_tx.send_replace(report.status());
            report
        });

        TaskHandle {
            id,
            path,
            kind,
            status: status_rx,
        }
    }

    /// Tasks not yet collected.
    pub fn outstanding(&self) -> usize {
        self.tasks.len()
    }

    /// Wait for the next task to finish, in completion order.
    ///
    /// Returns `None` once every task has been collected.
    pub async fn next_report(&mut self) -> Option<TaskReport> {
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(report) => return Some(report),
                Err(err) => warn!(error = %err, "task did not complete"),
            }
        }
        None
    }

    /// Collect every outstanding task.
    ///
    /// `on_complete` runs once per task, as each one finishes. The summary is
    /// returned after the last task has reached a terminal status.
    pub async fn join_all<F>(&mut self, mut on_complete: F) -> BatchSummary
    where
        F: FnMut(&TaskReport),
    {
        let mut summary = BatchSummary::default();
        while let Some(report) = self.next_report().await {
            on_complete(&report);
            summary.total += 1;
            if report.is_success() {
                summary.succeeded += 1;
            } else {
                summary.failed += 1;
            }
            summary.reports.push(report);
        }
        summary.reports.sort_by_key(|report| report.id);
        summary
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}
