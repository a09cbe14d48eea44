use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::auth::errors::OperationError;

/// The four authentication operations a page offers.
///
/// Each operation is backed by one section of fields; the ids match the
/// section ids used by the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Login,
    SignUp,
    Forgot,
    Change,
}

impl Operation {
    /// All operations, in presentation order.
    pub const ALL: [Operation; 4] = [
        Operation::Login,
        Operation::SignUp,
        Operation::Forgot,
        Operation::Change,
    ];

    /// Get the stable section id for this operation.
    pub fn id(&self) -> &'static str {
        match self {
            Operation::Login => "login",
            Operation::SignUp => "sign_up",
            Operation::Forgot => "forgot",
            Operation::Change => "change",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Operation {
    type Err = OperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "login" => Ok(Operation::Login),
            "sign_up" => Ok(Operation::SignUp),
            "forgot" => Ok(Operation::Forgot),
            "change" => Ok(Operation::Change),
            other => Err(OperationError::Unknown(other.to_string())),
        }
    }
}

/// Credentials collected from a section for one attempt.
///
/// Built transiently from the section's current field values and dropped when
/// the attempt ends; never persisted (the backend stores only hashes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Login {
        name: String,
        password: String,
    },
    SignUp {
        name: String,
        email: String,
        password: String,
        confirm_password: String,
    },
    Forgot {
        name: String,
        email: String,
    },
    Change {
        name: String,
        old_password: String,
        new_password: String,
        confirm_password: String,
    },
}

impl Credentials {
    /// Get the operation these credentials belong to.
    pub fn operation(&self) -> Operation {
        match self {
            Credentials::Login { .. } => Operation::Login,
            Credentials::SignUp { .. } => Operation::SignUp,
            Credentials::Forgot { .. } => Operation::Forgot,
            Credentials::Change { .. } => Operation::Change,
        }
    }

    /// Get the account name the attempt is for.
    pub fn name(&self) -> &str {
        match self {
            Credentials::Login { name, .. }
            | Credentials::SignUp { name, .. }
            | Credentials::Forgot { name, .. }
            | Credentials::Change { name, .. } => name,
        }
    }
}

/// Account row as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: i64,
    pub name: String,
    pub password_hash: String,
    pub email: String,
}

/// Authenticated identity.
///
/// Only name and primary key; never the password or its hash. Serialized as
/// JSON into the session slot for cross-navigation persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub pk: i64,
}

impl User {
    /// Build a user from its backend account row.
    pub fn from_account(account: &AccountRecord) -> Self {
        Self {
            name: account.name.clone(),
            pk: account.id,
        }
    }
}

/// One column write sent to the backend's generic load operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAssignment {
    pub value: String,
    pub table: String,
    pub column: String,
}

impl FieldAssignment {
    /// Build an assignment triple.
    pub fn new(
        value: impl Into<String>,
        table: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        Self {
            value: value.into(),
            table: table.into(),
            column: column.into(),
        }
    }
}

/// Phases of one authentication attempt, in order of progression.
///
/// `Invalid` and `Denied` are terminal with field errors recorded;
/// `Authorised` is terminal with a [`User`]. Used for tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    Collecting,
    Validating,
    Invalid,
    Verifying,
    Denied,
    Authorised,
}

impl fmt::Display for AttemptState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AttemptState::Collecting => "collecting",
            AttemptState::Validating => "validating",
            AttemptState::Invalid => "invalid",
            AttemptState::Verifying => "verifying",
            AttemptState::Denied => "denied",
            AttemptState::Authorised => "authorised",
        };
        f.write_str(s)
    }
}
