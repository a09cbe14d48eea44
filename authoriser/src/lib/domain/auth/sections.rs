use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use fields::Field;
use fields::FieldKind;
use fields::FieldSet;
use fields::FieldSpec;
use fields::FormError;

use crate::auth::errors::AuthError;
use crate::auth::errors::BackendError;
use crate::auth::models::AttemptState;
use crate::auth::models::Credentials;
use crate::auth::models::FieldAssignment;
use crate::auth::models::Operation;
use crate::auth::models::User;
use crate::auth::password;
use crate::auth::password::PasswordPolicy;
use crate::auth::ports::BackendPort;

/// Canonical field names shared by the sections.
pub const NAME: &str = "name";
pub const EMAIL: &str = "email";
pub const PASSWORD: &str = "password";
pub const CONFIRM_PASSWORD: &str = "confirm_password";
pub const OLD_PASSWORD: &str = "old_password";
pub const NEW_PASSWORD: &str = "new_password";

/// Backend table holding account rows.
const TABLE: &str = "user";

/// One authentication operation and its fields.
///
/// Four strategies implement this contract, one per [`Operation`]. An attempt
/// walks `collecting → validating → (invalid | verifying → (denied |
/// authorised))`; `Ok(None)` means the attempt ended with messages recorded
/// on the offending fields (or, for the forgot flow, a reset was issued and
/// the user must log in again), `Ok(Some(user))` means authorised. Backend
/// faults are the only error path.
#[async_trait]
pub trait Section: Send + Sync {
    /// The operation this section implements.
    fn operation(&self) -> Operation;

    /// The section's fields.
    fn fields(&self) -> &FieldSet;

    /// Snapshot the current field values as credentials.
    ///
    /// Transient by design: built per attempt, never stored.
    ///
    /// # Errors
    /// * `UnknownField` - The section's field configuration is broken
    fn credentials(&self) -> Result<Credentials, FormError>;

    /// Run one authentication attempt against the current field values.
    ///
    /// # Returns
    /// Authenticated user, or None when the attempt was rejected with
    /// field-level messages
    ///
    /// # Errors
    /// * `Backend` - A remote call failed
    /// * `Form` - The section's field configuration is broken
    async fn authorise(&self) -> Result<Option<User>, AuthError>;

    /// Clear every error slot in this section.
    fn clear_errors(&self) {
        self.fields().clear_errors();
    }
}

/// Declarative field layout for an operation's section.
///
/// # Arguments
/// * `operation` - Operation to describe
///
/// # Returns
/// Field specifications in presentation order
pub fn field_specs(operation: Operation) -> Vec<FieldSpec> {
    // Names are non-empty literals; spec construction cannot fail.
    let spec = |name: &str, kind: FieldKind, label: &str| {
        FieldSpec::new(name, kind)
            .expect("field name is non-empty")
            .label(label)
            .required(true)
    };
    match operation {
        Operation::Login => vec![
            spec(NAME, FieldKind::Text, "Name"),
            spec(PASSWORD, FieldKind::Password, "Password"),
        ],
        Operation::SignUp => vec![
            spec(NAME, FieldKind::Text, "Name"),
            spec(EMAIL, FieldKind::Email, "Email"),
            spec(PASSWORD, FieldKind::Password, "Password"),
            spec(CONFIRM_PASSWORD, FieldKind::Password, "Confirm password"),
        ],
        Operation::Forgot => vec![
            spec(NAME, FieldKind::Text, "Name"),
            spec(EMAIL, FieldKind::Email, "Email"),
        ],
        Operation::Change => vec![
            spec(NAME, FieldKind::Text, "Name"),
            spec(OLD_PASSWORD, FieldKind::Password, "Old password"),
            spec(NEW_PASSWORD, FieldKind::Password, "New password"),
            spec(CONFIRM_PASSWORD, FieldKind::Password, "Confirm password"),
        ],
    }
}

/// Verify the set holds every field the section addresses.
///
/// Run once at construction so a broken layout fails fast instead of
/// surfacing mid-attempt.
fn expect_fields(fields: &FieldSet, names: &[&str]) -> Result<(), FormError> {
    for name in names {
        fields.get(name)?;
    }
    Ok(())
}

/// Cross-field check: two password fields must hold the same value.
///
/// On mismatch both fields get the message. Skipped when either value is
/// empty (the required pass already reported those).
fn check_passwords_match(first: &Field, second: &Field) -> bool {
    let (a, b) = (first.value(), second.value());
    if a.is_empty() || b.is_empty() || a == b {
        true
    } else {
        first.report_error("Passwords do not match");
        second.report_error("Passwords do not match");
        false
    }
}

/// Local check: a non-empty email field must parse as an address.
fn check_email(field: &Field) -> bool {
    let value = field.value();
    if value.is_empty() || email_address::EmailAddress::from_str(&value).is_ok() {
        true
    } else {
        field.report_error("Invalid email address");
        false
    }
}

fn trace_state(operation: Operation, state: AttemptState) {
    tracing::debug!(operation = %operation, state = %state, "attempt state");
}

/// Look up the account for an attempt, recording "Unknown user" on the name
/// field when there is none.
async fn find_known_account<B: BackendPort>(
    backend: &B,
    name_field: &Field,
    name: &str,
) -> Result<Option<crate::auth::models::AccountRecord>, BackendError> {
    let account = backend.find_account(name).await?;
    if account.is_none() {
        name_field.report_error("Unknown user");
    }
    Ok(account)
}

/// Login: the account must exist and the password must verify.
pub struct LoginSection<B: BackendPort> {
    backend: Arc<B>,
    fields: FieldSet,
}

impl<B: BackendPort> LoginSection<B> {
    /// Bind the login section to its fields.
    ///
    /// # Errors
    /// * `UnknownField` - The set is missing `name` or `password`
    pub fn new(backend: Arc<B>, fields: FieldSet) -> Result<Self, FormError> {
        expect_fields(&fields, &[NAME, PASSWORD])?;
        Ok(Self { backend, fields })
    }
}

#[async_trait]
impl<B: BackendPort> Section for LoginSection<B> {
    fn operation(&self) -> Operation {
        Operation::Login
    }

    fn fields(&self) -> &FieldSet {
        &self.fields
    }

    fn credentials(&self) -> Result<Credentials, FormError> {
        Ok(Credentials::Login {
            name: self.fields.value(NAME)?,
            password: self.fields.value(PASSWORD)?,
        })
    }

    async fn authorise(&self) -> Result<Option<User>, AuthError> {
        trace_state(Operation::Login, AttemptState::Collecting);
        let name = self.fields.value(NAME)?;
        let password = self.fields.value(PASSWORD)?;

        trace_state(Operation::Login, AttemptState::Validating);
        if self.fields.require_all() > 0 {
            trace_state(Operation::Login, AttemptState::Invalid);
            return Ok(None);
        }

        trace_state(Operation::Login, AttemptState::Verifying);
        let Some(account) =
            find_known_account(self.backend.as_ref(), self.fields.get(NAME)?, &name).await?
        else {
            trace_state(Operation::Login, AttemptState::Denied);
            return Ok(None);
        };

        if !self
            .backend
            .verify_password(&password, &account.password_hash)
            .await?
        {
            self.fields.get(PASSWORD)?.report_error("Incorrect password");
            tracing::warn!(name = %name, "login denied: password mismatch");
            trace_state(Operation::Login, AttemptState::Denied);
            return Ok(None);
        }

        trace_state(Operation::Login, AttemptState::Authorised);
        Ok(Some(User::from_account(&account)))
    }
}

/// Sign-up: the name must be free; the password is hashed and the account
/// persisted, then re-fetched to confirm.
pub struct SignUpSection<B: BackendPort> {
    backend: Arc<B>,
    fields: FieldSet,
}

impl<B: BackendPort> SignUpSection<B> {
    /// Bind the sign-up section to its fields.
    ///
    /// # Errors
    /// * `UnknownField` - The set is missing one of `name`, `email`,
    ///   `password`, `confirm_password`
    pub fn new(backend: Arc<B>, fields: FieldSet) -> Result<Self, FormError> {
        expect_fields(&fields, &[NAME, EMAIL, PASSWORD, CONFIRM_PASSWORD])?;
        Ok(Self { backend, fields })
    }
}

#[async_trait]
impl<B: BackendPort> Section for SignUpSection<B> {
    fn operation(&self) -> Operation {
        Operation::SignUp
    }

    fn fields(&self) -> &FieldSet {
        &self.fields
    }

    fn credentials(&self) -> Result<Credentials, FormError> {
        Ok(Credentials::SignUp {
            name: self.fields.value(NAME)?,
            email: self.fields.value(EMAIL)?,
            password: self.fields.value(PASSWORD)?,
            confirm_password: self.fields.value(CONFIRM_PASSWORD)?,
        })
    }

    async fn authorise(&self) -> Result<Option<User>, AuthError> {
        trace_state(Operation::SignUp, AttemptState::Collecting);
        let name = self.fields.value(NAME)?;
        let email = self.fields.value(EMAIL)?;
        let password = self.fields.value(PASSWORD)?;

        trace_state(Operation::SignUp, AttemptState::Validating);
        // Collect every local failure in one pass before aborting.
        let missing = self.fields.require_all();
        let email_ok = check_email(self.fields.get(EMAIL)?);
        let match_ok = check_passwords_match(
            self.fields.get(PASSWORD)?,
            self.fields.get(CONFIRM_PASSWORD)?,
        );
        if missing > 0 || !email_ok || !match_ok {
            trace_state(Operation::SignUp, AttemptState::Invalid);
            return Ok(None);
        }

        trace_state(Operation::SignUp, AttemptState::Verifying);
        if self.backend.find_account(&name).await?.is_some() {
            self.fields.get(NAME)?.report_error("Name already exists");
            tracing::warn!(name = %name, "sign up denied: name taken");
            trace_state(Operation::SignUp, AttemptState::Denied);
            return Ok(None);
        }

        let hash = self.backend.hash_password(&password).await?;
        self.backend
            .store_fields(
                &name,
                &[
                    FieldAssignment::new(hash, TABLE, "password"),
                    FieldAssignment::new(&name, TABLE, "name"),
                    FieldAssignment::new(&email, TABLE, "email"),
                ],
            )
            .await?;

        // Re-fetch to confirm the row landed.
        let account = self.backend.find_account(&name).await?.ok_or_else(|| {
            BackendError::Inconsistent(format!("account '{}' missing after sign up", name))
        })?;

        trace_state(Operation::SignUp, AttemptState::Authorised);
        Ok(Some(User::from_account(&account)))
    }
}

/// Forgot: a one-time password is generated, persisted hashed, and mailed to
/// the account's stored address; the user must log in again with it.
pub struct ForgotSection<B: BackendPort> {
    backend: Arc<B>,
    fields: FieldSet,
    policy: PasswordPolicy,
}

impl<B: BackendPort> std::fmt::Debug for ForgotSection<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForgotSection")
            .field("fields", &self.fields)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<B: BackendPort> ForgotSection<B> {
    /// Bind the forgot section to its fields.
    ///
    /// # Errors
    /// * `UnknownField` - The set is missing `name` or `email`
    pub fn new(
        backend: Arc<B>,
        fields: FieldSet,
        policy: PasswordPolicy,
    ) -> Result<Self, FormError> {
        expect_fields(&fields, &[NAME, EMAIL])?;
        Ok(Self {
            backend,
            fields,
            policy,
        })
    }
}

#[async_trait]
impl<B: BackendPort> Section for ForgotSection<B> {
    fn operation(&self) -> Operation {
        Operation::Forgot
    }

    fn fields(&self) -> &FieldSet {
        &self.fields
    }

    fn credentials(&self) -> Result<Credentials, FormError> {
        Ok(Credentials::Forgot {
            name: self.fields.value(NAME)?,
            email: self.fields.value(EMAIL)?,
        })
    }

    async fn authorise(&self) -> Result<Option<User>, AuthError> {
        trace_state(Operation::Forgot, AttemptState::Collecting);
        let name = self.fields.value(NAME)?;

        trace_state(Operation::Forgot, AttemptState::Validating);
        let missing = self.fields.require_all();
        let email_ok = check_email(self.fields.get(EMAIL)?);
        if missing > 0 || !email_ok {
            trace_state(Operation::Forgot, AttemptState::Invalid);
            return Ok(None);
        }

        trace_state(Operation::Forgot, AttemptState::Verifying);
        let Some(account) =
            find_known_account(self.backend.as_ref(), self.fields.get(NAME)?, &name).await?
        else {
            trace_state(Operation::Forgot, AttemptState::Denied);
            return Ok(None);
        };

        let one_time = password::generate_default(&self.policy);
        let hash = self.backend.hash_password(&one_time).await?;
        self.backend
            .store_fields(&name, &[FieldAssignment::new(hash, TABLE, "password")])
            .await?;

        // The mail goes to the stored address, never the typed one.
        self.backend
            .send_mail(
                &account.email,
                "Your new password",
                &format!(
                    "Hello {},\n\nYour password has been reset. \
                     Log in with your new password: {}\n",
                    account.name, one_time
                ),
            )
            .await?;

        tracing::info!(name = %name, "one-time password issued");
        // No user is returned: the attempt ends unauthenticated and the
        // account holder logs in with the mailed password.
        Ok(None)
    }
}

/// Change: the old password must verify before the new one replaces it.
pub struct ChangeSection<B: BackendPort> {
    backend: Arc<B>,
    fields: FieldSet,
}

impl<B: BackendPort> ChangeSection<B> {
    /// Bind the change section to its fields.
    ///
    /// # Errors
    /// * `UnknownField` - The set is missing one of `name`, `old_password`,
    ///   `new_password`, `confirm_password`
    pub fn new(backend: Arc<B>, fields: FieldSet) -> Result<Self, FormError> {
        expect_fields(&fields, &[NAME, OLD_PASSWORD, NEW_PASSWORD, CONFIRM_PASSWORD])?;
        Ok(Self { backend, fields })
    }
}

#[async_trait]
impl<B: BackendPort> Section for ChangeSection<B> {
    fn operation(&self) -> Operation {
        Operation::Change
    }

    fn fields(&self) -> &FieldSet {
        &self.fields
    }

    fn credentials(&self) -> Result<Credentials, FormError> {
        Ok(Credentials::Change {
            name: self.fields.value(NAME)?,
            old_password: self.fields.value(OLD_PASSWORD)?,
            new_password: self.fields.value(NEW_PASSWORD)?,
            confirm_password: self.fields.value(CONFIRM_PASSWORD)?,
        })
    }

    async fn authorise(&self) -> Result<Option<User>, AuthError> {
        trace_state(Operation::Change, AttemptState::Collecting);
        let name = self.fields.value(NAME)?;
        let old_password = self.fields.value(OLD_PASSWORD)?;
        let new_password = self.fields.value(NEW_PASSWORD)?;

        trace_state(Operation::Change, AttemptState::Validating);
        let missing = self.fields.require_all();
        let match_ok = check_passwords_match(
            self.fields.get(NEW_PASSWORD)?,
            self.fields.get(CONFIRM_PASSWORD)?,
        );
        if missing > 0 || !match_ok {
            trace_state(Operation::Change, AttemptState::Invalid);
            return Ok(None);
        }

        trace_state(Operation::Change, AttemptState::Verifying);
        let Some(account) =
            find_known_account(self.backend.as_ref(), self.fields.get(NAME)?, &name).await?
        else {
            trace_state(Operation::Change, AttemptState::Denied);
            return Ok(None);
        };

        if !self
            .backend
            .verify_password(&old_password, &account.password_hash)
            .await?
        {
            self.fields
                .get(OLD_PASSWORD)?
                .report_error("Incorrect password");
            tracing::warn!(name = %name, "change denied: old password mismatch");
            trace_state(Operation::Change, AttemptState::Denied);
            return Ok(None);
        }

        let hash = self.backend.hash_password(&new_password).await?;
        self.backend
            .store_fields(&name, &[FieldAssignment::new(hash, TABLE, "password")])
            .await?;

        trace_state(Operation::Change, AttemptState::Authorised);
        Ok(Some(User::from_account(&account)))
    }
}
