//! # Visitor Pass
//!
//! Campus visitor registration: a form controller that validates and
//! normalises keystrokes, sanitises and submits the record to a remote
//! registration endpoint, and exposes a QR pass for a limited time.
//!
//! ## Layers
//!
//! - [`record`]: the visitor record and its field identifiers
//! - [`policy`]: per-keystroke normalisation and submit-time validation rules
//! - [`sanitize`]: markup removal applied to every field before submit
//! - [`form`]: the owned controller state and its reducer
//! - [`effects`]: declarative side effects emitted by the reducer
//! - [`executor`]: background worker running registration tasks
//! - [`endpoint`]: HTTP client for the registration endpoint
//! - [`countdown`]: cancellable one-second ticker driving pass expiry
//! - [`qr`]: QR encoding of the pass payload (terminal + SVG output)
//!
//! ## Flow
//!
//! 1. `Intent::Edit` per keystroke, rejected or normalised in place
//! 2. `Intent::Submit` sanitises, validates and yields `Effect::Async(TaskKind::Register)`
//! 3. The executor posts the record and reports a `TaskResultKind`
//! 4. `Intent::SubmissionFinished` either surfaces an error or starts the pass
//!    countdown (`Effect::StartCountdown`)
//! 5. `Intent::Tick` counts down; at zero the pass hides and `Effect::StopCountdown`
//!    tells the runtime to cancel its ticker

pub mod countdown;
pub mod effects;
pub mod endpoint;
pub mod error;
pub mod executor;
pub mod form;
pub mod policy;
pub mod qr;
pub mod record;
pub mod sanitize;

pub use countdown::{Ticker, TickerId};
pub use effects::{Effect, InternalEvent, TaskKind, TaskResultKind};
pub use endpoint::{HttpEndpoint, RegistrationEndpoint, RegistrationReply};
pub use error::{EndpointError, ErrorKind, FormError, QrError};
pub use executor::{TaskExecutor, TaskId};
pub use form::{Expiry, FormController, Intent, PASS_TTL_SECS, TickOutcome};
pub use qr::QrPass;
pub use record::{Field, VisitorRecord};
pub use sanitize::{MarkupSanitizer, Sanitizer};
