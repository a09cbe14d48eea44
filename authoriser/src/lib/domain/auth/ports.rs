use async_trait::async_trait;
use serde_json::Value;

use crate::auth::errors::BackendError;
use crate::auth::errors::SessionError;
use crate::auth::models::AccountRecord;
use crate::auth::models::FieldAssignment;
use crate::auth::models::Operation;

/// Typed facade over the remote executor.
///
/// All real credential work happens behind this port: the backend owns
/// password hashing, verification, persistence, and mail. No cryptographic
/// primitive is implemented on this side.
#[async_trait]
pub trait BackendPort: Send + Sync + 'static {
    /// Look up an account row by name.
    ///
    /// # Arguments
    /// * `name` - Account name to search for
    ///
    /// # Returns
    /// Optional account row (None if no such account)
    ///
    /// # Errors
    /// * `Call` - Remote call failed
    /// * `MalformedResponse` - Row did not match the expected shape
    async fn find_account(&self, name: &str) -> Result<Option<AccountRecord>, BackendError>;

    /// Hash a plaintext password for storage.
    ///
    /// # Arguments
    /// * `plain` - Plaintext password
    ///
    /// # Returns
    /// Hash string in the backend's storage format
    ///
    /// # Errors
    /// * `Call` - Remote call failed
    /// * `MalformedResponse` - Response was not a string
    async fn hash_password(&self, plain: &str) -> Result<String, BackendError>;

    /// Verify a plaintext password against a stored hash.
    ///
    /// # Arguments
    /// * `plain` - Plaintext password to check
    /// * `hash` - Stored hash
    ///
    /// # Returns
    /// True if the password matches
    ///
    /// # Errors
    /// * `Call` - Remote call failed
    /// * `MalformedResponse` - Response was not a boolean
    async fn verify_password(&self, plain: &str, hash: &str) -> Result<bool, BackendError>;

    /// Persist column writes for the named account.
    ///
    /// Creates the account row when none exists (sign-up) or updates the
    /// existing one (password change/reset).
    ///
    /// # Arguments
    /// * `name` - Account name the writes apply to
    /// * `assignments` - `(value, table, column)` triples to apply
    ///
    /// # Errors
    /// * `Call` - Remote call failed
    async fn store_fields(
        &self,
        name: &str,
        assignments: &[FieldAssignment],
    ) -> Result<(), BackendError>;

    /// Send a mail through the backend.
    ///
    /// # Arguments
    /// * `recipient` - Destination address
    /// * `subject` - Mail subject
    /// * `body` - Mail body
    ///
    /// # Errors
    /// * `MailFailed` - Delivery could not be arranged
    async fn send_mail(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), BackendError>;
}

/// The opaque wire shape of the remote executor.
///
/// `call(module, constructor_args, method, args) -> result`: the callee
/// instantiates `module` with `constructor_args`, invokes `method` with
/// `args`, and returns the result as JSON. Adapters map [`BackendPort`]
/// operations onto this shape.
#[async_trait]
pub trait RemoteCall: Send + Sync + 'static {
    /// Perform one remote call.
    ///
    /// # Errors
    /// * `Call` - Transport or callee failure
    async fn call(
        &self,
        module: &str,
        constructor_args: &[Value],
        method: &str,
        args: &[Value],
    ) -> Result<Value, BackendError>;
}

/// Injected key-value slot for cross-navigation session persistence.
///
/// Replaces ambient browser storage so the workflow is testable headless.
/// A single slot, last-writer-wins.
pub trait SessionStore: Send + Sync + 'static {
    /// Read the value stored under a key.
    ///
    /// # Errors
    /// * `Storage` - Underlying store failed
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;

    /// Store a value under a key, replacing any previous value.
    ///
    /// # Errors
    /// * `Storage` - Underlying store failed
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;

    /// Remove the value stored under a key, if any.
    ///
    /// # Errors
    /// * `Storage` - Underlying store failed
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

/// The radio-group seam: which operations are currently selected.
///
/// Reports every checked option; the authoriser enforces the exactly-one
/// invariant and treats anything else as a page-configuration defect.
pub trait ChoiceSelector: Send + Sync + 'static {
    /// Operations currently selected, in no particular order.
    fn selected(&self) -> Vec<Operation>;
}
