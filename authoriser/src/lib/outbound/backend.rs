use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use serde_json::Value;

use crate::auth::errors::BackendError;
use crate::auth::models::AccountRecord;
use crate::auth::models::FieldAssignment;
use crate::auth::ports::BackendPort;
use crate::auth::ports::RemoteCall;

/// Remote modules the adapter addresses.
const TABLE_MODULE: &str = "table";
const PASSWORD_MODULE: &str = "password";
const MAILER_MODULE: &str = "mailer";

/// [`BackendPort`] adapter over the opaque remote-call shape.
///
/// Maps each typed operation onto `call(module, constructor_args, method,
/// args)`: the `table` module (constructed with the table name) answers row
/// lookups and applies column writes, the `password` module hashes and
/// verifies, the `mailer` module sends mail. Responses are JSON and anything
/// off-shape is a malformed-response error, never a panic.
pub struct RpcBackend<C: RemoteCall> {
    call: Arc<C>,
    table: String,
}

impl<C: RemoteCall> RpcBackend<C> {
    /// Wrap a remote-call transport, addressing the default `user` table.
    pub fn new(call: Arc<C>) -> Self {
        Self::with_table(call, "user")
    }

    /// Wrap a remote-call transport, addressing a specific table.
    pub fn with_table(call: Arc<C>, table: impl Into<String>) -> Self {
        Self {
            call,
            table: table.into(),
        }
    }
}

#[async_trait]
impl<C: RemoteCall> BackendPort for RpcBackend<C> {
    async fn find_account(&self, name: &str) -> Result<Option<AccountRecord>, BackendError> {
        let row = self
            .call
            .call(TABLE_MODULE, &[json!(self.table)], "find", &[json!(name)])
            .await?;
        if row.is_null() {
            return Ok(None);
        }
        let account = serde_json::from_value(row)
            .map_err(|e| BackendError::MalformedResponse(format!("account row: {}", e)))?;
        Ok(Some(account))
    }

    async fn hash_password(&self, plain: &str) -> Result<String, BackendError> {
        let value = self
            .call
            .call(PASSWORD_MODULE, &[], "hash", &[json!(plain)])
            .await?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| BackendError::MalformedResponse(format!("hash: {}", value)))
    }

    async fn verify_password(&self, plain: &str, hash: &str) -> Result<bool, BackendError> {
        let value = self
            .call
            .call(PASSWORD_MODULE, &[], "verify", &[json!(plain), json!(hash)])
            .await?;
        value
            .as_bool()
            .ok_or_else(|| BackendError::MalformedResponse(format!("verify: {}", value)))
    }

    async fn store_fields(
        &self,
        name: &str,
        assignments: &[FieldAssignment],
    ) -> Result<(), BackendError> {
        self.call
            .call(
                TABLE_MODULE,
                &[json!(self.table)],
                "load",
                &[json!(name), json!(assignments)],
            )
            .await?;
        Ok(())
    }

    async fn send_mail(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), BackendError> {
        self.call
            .call(
                MAILER_MODULE,
                &[],
                "send",
                &[json!(recipient), json!(subject), json!(body)],
            )
            .await
            .map_err(|e| BackendError::MailFailed(e.to_string()))?;
        Ok(())
    }
}
