use thiserror::Error;

/// Error type for field configuration defects.
///
/// These signal a broken form definition rather than bad user input, and are
/// not recoverable at runtime.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Field has no name")]
    MissingName,

    #[error("No field named '{0}' in this set")]
    UnknownField(String),

    #[error("Field '{0}' is already present in this set")]
    DuplicateField(String),
}
