/*!
Effect & task model.

The reducer in [`crate::form`] stays pure: it only returns `Vec<Effect>`.
Whoever owns the controller (the kiosk event loop, the headless `register`
command, tests) interprets them:

- `Effect::Async(TaskKind)` goes to the [`crate::executor::TaskExecutor`]
- `Effect::StartCountdown` / `Effect::StopCountdown` start or cancel the
  one-second [`crate::countdown::Ticker`]
- `Effect::Log` is written through `tracing`

Task completion re-enters the controller as `Intent::SubmissionFinished`.
*/

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::executor::TaskId;
use crate::record::VisitorRecord;

/// Declarative instruction emitted by the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Schedule an asynchronous task.
    Async(TaskKind),
    /// (Re)start the expiry ticker. A live ticker must be cancelled first.
    StartCountdown { seconds: u32 },
    /// Cancel the expiry ticker if one is running.
    StopCountdown,
    /// Informational message for the log.
    Log(String),
}

impl Effect {
    pub fn log<T: Into<String>>(msg: T) -> Self {
        Effect::Log(msg.into())
    }
    pub fn async_task(kind: TaskKind) -> Self {
        Effect::Async(kind)
    }
}

/// Asynchronous work units. Each variant carries everything needed to run it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind {
    /// POST the sanitised record to the registration endpoint.
    Register(VisitorRecord),
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // visitor details stay out of logs
            TaskKind::Register(_) => write!(f, "RegisterVisitor"),
        }
    }
}

/// Outcome of a finished task, fed back to the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskResultKind {
    /// Endpoint answered `success: true`.
    Registered,
    /// Endpoint answered `success: false`, optionally with a message.
    Rejected { message: Option<String> },
    /// Network error, non-2xx status or an unreadable response body.
    TransportFailed { reason: String },
}

/// Task lifecycle notifications from the executor worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    TaskStarted { id: TaskId, label: String },
    TaskFinished { id: TaskId, result: TaskResultKind },
}
