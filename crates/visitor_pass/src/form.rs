//! Form state controller.
//!
//! [`FormController`] owns the draft, the last submitted record, the single
//! visible error and the pass expiry. Every transition is a plain method on
//! the controller; [`FormController::reduce`] wraps them for event loops and
//! returns the [`Effect`]s the caller has to carry out. Nothing in here does
//! I/O or touches a clock, so the whole state machine is testable directly.

use tracing::{debug, info, warn};

use crate::effects::{Effect, TaskKind, TaskResultKind};
use crate::error::FormError;
use crate::policy;
use crate::record::{Field, VisitorRecord};
use crate::sanitize::{MarkupSanitizer, Sanitizer};

/// How long a pass stays on screen after a successful registration.
pub const PASS_TTL_SECS: u32 = 30;

/// User and system inputs to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// A field's raw value after a keystroke.
    Edit { field: Field, value: String },
    Submit,
    SubmissionFinished(TaskResultKind),
    /// One second elapsed on the expiry ticker.
    Tick,
    /// The owning view is going away.
    Teardown,
}

/// Pass visibility coupled to its countdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Expiry {
    remaining: u32,
    visible: bool,
}

impl Expiry {
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    fn start(&mut self, seconds: u32) {
        self.remaining = seconds;
        self.visible = seconds > 0;
    }

    fn tick(&mut self) -> TickOutcome {
        if !self.visible {
            return TickOutcome::Idle;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.visible = false;
            TickOutcome::Expired
        } else {
            TickOutcome::Running(self.remaining)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No pass on screen; the tick changed nothing.
    Idle,
    /// Seconds left after this tick.
    Running(u32),
    /// This tick reached zero and hid the pass.
    Expired,
}

pub struct FormController<S = MarkupSanitizer> {
    sanitizer: S,
    draft: VisitorRecord,
    submitted: VisitorRecord,
    /// Payload of the request currently in flight.
    pending: Option<VisitorRecord>,
    error: Option<FormError>,
    expiry: Expiry,
}

impl FormController<MarkupSanitizer> {
    pub fn new() -> Self {
        Self::with_sanitizer(MarkupSanitizer::new())
    }
}

impl Default for FormController<MarkupSanitizer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Sanitizer> FormController<S> {
    pub fn with_sanitizer(sanitizer: S) -> Self {
        Self {
            sanitizer,
            draft: VisitorRecord::default(),
            submitted: VisitorRecord::default(),
            pending: None,
            error: None,
            expiry: Expiry::default(),
        }
    }

    pub fn draft(&self) -> &VisitorRecord {
        &self.draft
    }

    pub fn submitted(&self) -> &VisitorRecord {
        &self.submitted
    }

    pub fn error(&self) -> Option<&FormError> {
        self.error.as_ref()
    }

    /// Current error text, empty when there is none.
    pub fn error_message(&self) -> String {
        self.error
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    pub fn expiry(&self) -> Expiry {
        self.expiry
    }

    /// A registration request is in flight.
    pub fn is_submitting(&self) -> bool {
        self.pending.is_some()
    }

    /// QR payload while the pass is visible.
    pub fn pass_payload(&self) -> Option<String> {
        self.expiry
            .is_visible()
            .then(|| self.submitted.full_name())
    }

    /// Apply a keystroke to one field.
    ///
    /// A rejected value leaves the draft as it was and becomes the visible
    /// error; an accepted one replaces the field and clears any error.
    pub fn update_field(&mut self, field: Field, raw: &str) -> Result<(), FormError> {
        match policy::normalize_field(field, raw) {
            Ok(value) => {
                self.draft.set(field, value);
                self.error = None;
                Ok(())
            }
            Err(err) => {
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Sanitise, validate and normalise the draft into a request payload.
    ///
    /// Returns `Ok(None)` without touching any state when a request is
    /// already in flight. Validation errors become the visible error; the
    /// draft is never modified here.
    pub fn submit(&mut self) -> Result<Option<VisitorRecord>, FormError> {
        if self.pending.is_some() {
            debug!("submit ignored, registration already in flight");
            return Ok(None);
        }

        let sanitized = self.draft.map(|_, value| self.sanitizer.sanitize(value));

        if let Err(err) = policy::validate_submission(&sanitized) {
            debug!(error = %err, "submission rejected by validation");
            self.error = Some(err.clone());
            return Err(err);
        }

        let payload = policy::normalize_payload(&sanitized);
        self.pending = Some(payload.clone());
        Ok(Some(payload))
    }

    /// Apply the endpoint outcome of the in-flight request.
    ///
    /// Returns true when the registration was accepted and the pass is now
    /// showing with a fresh countdown.
    pub fn finish_submission(&mut self, result: TaskResultKind) -> bool {
        let Some(payload) = self.pending.take() else {
            warn!(?result, "submission result without a pending request, ignored");
            return false;
        };

        match result {
            TaskResultKind::Registered => {
                info!("visitor registered, pass valid for {PASS_TTL_SECS}s");
                self.submitted = payload;
                self.expiry.start(PASS_TTL_SECS);
                self.draft = VisitorRecord::default();
                self.error = None;
                true
            }
            TaskResultKind::Rejected { message } => {
                let message = message.filter(|m| !m.trim().is_empty());
                info!(?message, "registration rejected by endpoint");
                self.error = Some(FormError::LogicalFailure { message });
                false
            }
            TaskResultKind::TransportFailed { reason } => {
                warn!(%reason, "registration transport failure");
                self.error = Some(FormError::TransportFailure { reason });
                false
            }
        }
    }

    /// Advance the pass countdown by one second.
    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.expiry.tick();
        if outcome == TickOutcome::Expired {
            info!("visitor pass expired");
        }
        outcome
    }

    /// Reduce a single intent into state transitions and effects.
    pub fn reduce(&mut self, intent: Intent) -> Vec<Effect> {
        match intent {
            Intent::Edit { field, value } => {
                let _ = self.update_field(field, &value);
                Vec::new()
            }
            Intent::Submit => match self.submit() {
                Ok(Some(payload)) => vec![Effect::async_task(TaskKind::Register(payload))],
                Ok(None) => vec![Effect::log("submit ignored while registration is pending")],
                Err(_) => Vec::new(),
            },
            Intent::SubmissionFinished(result) => {
                if self.finish_submission(result) {
                    vec![Effect::StartCountdown {
                        seconds: PASS_TTL_SECS,
                    }]
                } else {
                    Vec::new()
                }
            }
            Intent::Tick => match self.tick() {
                TickOutcome::Expired => vec![Effect::StopCountdown],
                TickOutcome::Idle | TickOutcome::Running(_) => Vec::new(),
            },
            Intent::Teardown => vec![Effect::StopCountdown],
        }
    }
}
