use thiserror::Error;

use crate::auth::models::Operation;

/// Error for operation id parsing failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OperationError {
    #[error("Unknown operation id: {0}")]
    Unknown(String),
}

/// Error for backend (remote executor) call failures.
///
/// Every backend fault is recoverable and typed; none of them panic or abort
/// the page. Field-level validation outcomes are not errors and never appear
/// here.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("Backend call failed: {0}")]
    Call(String),

    #[error("Malformed backend response: {0}")]
    MalformedResponse(String),

    #[error("Mail delivery failed: {0}")]
    MailFailed(String),

    #[error("Backend state inconsistent: {0}")]
    Inconsistent(String),
}

/// Error for session-slot operations.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error("Session storage failed: {0}")]
    Storage(String),

    #[error("Failed to encode session entry: {0}")]
    Serialize(String),

    #[error("Corrupt session entry: {0}")]
    Corrupt(String),
}

/// Top-level error for authorisation workflow operations.
///
/// Selection and field-configuration variants signal a broken page setup and
/// are fatal; backend and session variants are runtime faults the caller can
/// surface and retry.
#[derive(Debug, Error)]
pub enum AuthError {
    // Structural/configuration defects
    #[error("Form configuration error: {0}")]
    Form(#[from] fields::FormError),

    #[error("No operation is selected")]
    NoSectionSelected,

    #[error("{0} operations are selected, expected exactly one")]
    AmbiguousSelection(usize),

    #[error("No section registered for operation: {0}")]
    UnknownSection(Operation),

    // Runtime faults
    #[error("An authentication attempt is already in flight")]
    AttemptInFlight,

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError::Unknown(err.to_string())
    }
}
