use thiserror::Error;

use crate::record::Field;

/// Message shown when the endpoint reports failure without saying why.
pub const LOGICAL_FAILURE_FALLBACK: &str = "Registration was not accepted.";

/// Errors surfaced to the visitor. At most one is shown at a time; the
/// `Display` output is the exact on-screen message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please enter valid alphabetic characters only.")]
    InputRejected { field: Field },

    #[error("Please fill out all required fields.")]
    MissingRequired { field: Field },

    #[error("Address must be at least {min} characters.")]
    AddressTooShort { min: usize },

    #[error("Purpose must be at least {min} characters.")]
    PurposeTooShort { min: usize },

    /// `reason` is for logs only; the visitor sees the generic text.
    #[error("Submission failed. Please try again.")]
    TransportFailure { reason: String },

    #[error("{}", .message.as_deref().unwrap_or(LOGICAL_FAILURE_FALLBACK))]
    LogicalFailure { message: Option<String> },
}

/// Coarse classification of [`FormError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InputRejected,
    ValidationFailed,
    TransportFailure,
    LogicalFailure,
}

impl FormError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FormError::InputRejected { .. } => ErrorKind::InputRejected,
            FormError::MissingRequired { .. }
            | FormError::AddressTooShort { .. }
            | FormError::PurposeTooShort { .. } => ErrorKind::ValidationFailed,
            FormError::TransportFailure { .. } => ErrorKind::TransportFailure,
            FormError::LogicalFailure { .. } => ErrorKind::LogicalFailure,
        }
    }
}

/// Failures talking to the registration endpoint. All of them are transport
/// failures from the form's point of view.
#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("invalid endpoint url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("endpoint answered with status {0}")]
    Status(reqwest::StatusCode),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QrError {
    #[error("pass payload is too long to fit in a QR code")]
    DataTooLong,

    #[error("pass payload is empty")]
    EmptyPayload,
}
