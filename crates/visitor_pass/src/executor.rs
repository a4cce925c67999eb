/*!
Background task executor.

Takes the `Effect::Async(TaskKind)` outputs of the form reducer off the UI
loop. One Tokio worker pulls dispatches from an unbounded channel, runs them
against the configured [`RegistrationEndpoint`] and reports
[`InternalEvent::TaskStarted`] / [`InternalEvent::TaskFinished`] on the event
channel handed to [`TaskExecutor::new`].

Pending tasks are dropped when the executor (all clones) goes away.
*/

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::effects::{InternalEvent, TaskKind, TaskResultKind};
use crate::endpoint::RegistrationEndpoint;

/// Monotonic task identifier.
pub type TaskId = u64;

/// Cloneable handle for scheduling background tasks.
#[derive(Clone)]
pub struct TaskExecutor {
    tx: mpsc::UnboundedSender<Dispatch>,
}

struct Dispatch {
    id: TaskId,
    kind: TaskKind,
}

impl TaskExecutor {
    /// Create the executor and spawn its worker. Requires a Tokio runtime.
    pub fn new<E: RegistrationEndpoint>(
        endpoint: E,
        event_tx: mpsc::UnboundedSender<InternalEvent>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<Dispatch>();
        Worker {
            rx,
            endpoint: Arc::new(endpoint),
            event_tx,
        }
        .spawn();
        Self { tx }
    }

    /// Schedule a task and return its id.
    pub fn spawn(&self, kind: TaskKind) -> TaskId {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        if let Err(e) = self.tx.send(Dispatch { id, kind }) {
            warn!("TaskExecutor channel closed; failed to schedule task: {e}");
        }
        id
    }
}

struct Worker<E> {
    rx: mpsc::UnboundedReceiver<Dispatch>,
    endpoint: Arc<E>,
    event_tx: mpsc::UnboundedSender<InternalEvent>,
}

impl<E: RegistrationEndpoint> Worker<E> {
    fn emit(&self, event: InternalEvent) {
        let _ = self.event_tx.send(event);
    }

    fn spawn(mut self) {
        tokio::spawn(async move {
            while let Some(dispatch) = self.rx.recv().await {
                self.handle(dispatch).await;
            }
            info!("TaskExecutor worker stopped (channel closed)");
        });
    }

    async fn handle(&self, dispatch: Dispatch) {
        let Dispatch { id, kind } = dispatch;
        self.emit(InternalEvent::TaskStarted {
            id,
            label: kind.to_string(),
        });
        let result = run_task(self.endpoint.as_ref(), &kind).await;
        info!("[task:{id}] {kind} finished: {result:?}");
        self.emit(InternalEvent::TaskFinished { id, result });
    }
}

/// Run one task to completion and classify the outcome.
pub async fn run_task<E: RegistrationEndpoint>(endpoint: &E, kind: &TaskKind) -> TaskResultKind {
    match kind {
        TaskKind::Register(record) => match endpoint.register(record).await {
            Ok(reply) if reply.success => TaskResultKind::Registered,
            Ok(reply) => TaskResultKind::Rejected {
                message: reply.error.filter(|m| !m.trim().is_empty()),
            },
            Err(e) => {
                warn!("registration request failed: {e}");
                TaskResultKind::TransportFailed {
                    reason: e.to_string(),
                }
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::RegistrationReply;
    use crate::error::EndpointError;
    use crate::record::VisitorRecord;
    use std::sync::Mutex;

    /// Replays canned replies and remembers what it was sent.
    struct ScriptedEndpoint {
        replies: Mutex<Vec<Result<RegistrationReply, EndpointError>>>,
        seen: Arc<Mutex<Vec<VisitorRecord>>>,
    }

    impl ScriptedEndpoint {
        fn new(replies: Vec<Result<RegistrationReply, EndpointError>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl RegistrationEndpoint for ScriptedEndpoint {
        async fn register(
            &self,
            record: &VisitorRecord,
        ) -> Result<RegistrationReply, EndpointError> {
            self.seen.lock().unwrap().push(record.clone());
            self.replies.lock().unwrap().remove(0)
        }
    }

    fn record() -> VisitorRecord {
        VisitorRecord {
            first_name: "Ana".into(),
            last_name: "Cruz".into(),
            address: "Lapasan".into(),
            purpose: "Visit".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn classifies_endpoint_replies() {
        let ep = ScriptedEndpoint::new(vec![
            Ok(RegistrationReply {
                success: true,
                error: None,
            }),
            Ok(RegistrationReply {
                success: false,
                error: Some("Duplicate visitor".into()),
            }),
            Ok(RegistrationReply {
                success: false,
                error: Some(String::new()),
            }),
            Err(EndpointError::Status(reqwest::StatusCode::BAD_GATEWAY)),
        ]);
        let task = TaskKind::Register(record());

        assert_eq!(run_task(&ep, &task).await, TaskResultKind::Registered);
        assert_eq!(
            run_task(&ep, &task).await,
            TaskResultKind::Rejected {
                message: Some("Duplicate visitor".into())
            }
        );
        assert_eq!(
            run_task(&ep, &task).await,
            TaskResultKind::Rejected { message: None }
        );
        assert!(matches!(
            run_task(&ep, &task).await,
            TaskResultKind::TransportFailed { .. }
        ));
    }

    #[tokio::test]
    async fn worker_reports_start_and_finish() {
        let ep = ScriptedEndpoint::new(vec![Ok(RegistrationReply {
            success: true,
            error: None,
        })]);
        let seen = ep.seen.clone();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let exec = TaskExecutor::new(ep, event_tx);

        let id = exec.spawn(TaskKind::Register(record()));
        assert!(id > 0);

        assert_eq!(
            event_rx.recv().await,
            Some(InternalEvent::TaskStarted {
                id,
                label: "RegisterVisitor".into()
            })
        );
        assert_eq!(
            event_rx.recv().await,
            Some(InternalEvent::TaskFinished {
                id,
                result: TaskResultKind::Registered
            })
        );
        assert_eq!(seen.lock().unwrap().as_slice(), &[record()]);
    }
}
