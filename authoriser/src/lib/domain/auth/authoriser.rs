use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use crate::auth::errors::AuthError;
use crate::auth::errors::SessionError;
use crate::auth::models::Operation;
use crate::auth::models::User;
use crate::auth::ports::ChoiceSelector;
use crate::auth::ports::SessionStore;
use crate::auth::sections::Section;

/// Default session-slot key.
pub const SESSION_KEY: &str = "authoriser.user";

/// Releases the in-flight flag on every exit path of a submit.
struct FlightGuard<'a>(&'a AtomicBool);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Page-level coordinator over the four sections.
///
/// Resolves the active section from the choice selector, runs the attempt,
/// persists the authenticated identity into the injected session store, and
/// answers current-user queries across navigations. Only one attempt may be
/// in flight at a time; overlapping submits are rejected with
/// [`AuthError::AttemptInFlight`].
pub struct Authoriser<S: SessionStore> {
    sections: Vec<Arc<dyn Section>>,
    selector: Arc<dyn ChoiceSelector>,
    session: S,
    session_key: String,
    current: Mutex<Option<User>>,
    in_flight: AtomicBool,
}

impl<S: SessionStore> Authoriser<S> {
    /// Assemble the authoriser.
    ///
    /// # Arguments
    /// * `sections` - One section per offered operation
    /// * `selector` - The radio-group seam reporting the selected operation
    /// * `session` - Injected session slot
    pub fn new(
        sections: Vec<Arc<dyn Section>>,
        selector: Arc<dyn ChoiceSelector>,
        session: S,
    ) -> Self {
        Self::with_session_key(sections, selector, session, SESSION_KEY)
    }

    /// Assemble the authoriser with a custom session-slot key.
    pub fn with_session_key(
        sections: Vec<Arc<dyn Section>>,
        selector: Arc<dyn ChoiceSelector>,
        session: S,
        session_key: impl Into<String>,
    ) -> Self {
        Self {
            sections,
            selector,
            session,
            session_key: session_key.into(),
            current: Mutex::new(None),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Look up the section registered for an operation.
    pub fn section(&self, operation: Operation) -> Option<&Arc<dyn Section>> {
        self.sections.iter().find(|s| s.operation() == operation)
    }

    /// Resolve the active section from the choice selector.
    ///
    /// The page always selects exactly one operation; anything else is a
    /// broken page, not a user mistake.
    ///
    /// # Errors
    /// * `NoSectionSelected` - No operation is selected
    /// * `AmbiguousSelection` - More than one operation is selected
    /// * `UnknownSection` - The selected operation has no registered section
    pub fn current_section(&self) -> Result<&Arc<dyn Section>, AuthError> {
        let selected = self.selector.selected();
        let operation = match selected.as_slice() {
            [] => return Err(AuthError::NoSectionSelected),
            [one] => *one,
            many => return Err(AuthError::AmbiguousSelection(many.len())),
        };
        self.section(operation)
            .ok_or(AuthError::UnknownSection(operation))
    }

    /// Run one authentication attempt against the active section.
    ///
    /// Stale errors in the non-active sections are cleared first. On success
    /// the identity is written to the session slot (name and pk only) and
    /// cached in memory.
    ///
    /// # Returns
    /// Authenticated user, or None when the attempt was rejected with
    /// field-level messages
    ///
    /// # Errors
    /// * `AttemptInFlight` - A previous submit has not settled yet
    /// * `NoSectionSelected` / `AmbiguousSelection` - Broken page selection
    /// * `Backend` / `Session` - Runtime faults
    pub async fn submit(&self) -> Result<Option<User>, AuthError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            tracing::warn!("submit rejected: attempt already in flight");
            return Err(AuthError::AttemptInFlight);
        }
        let _guard = FlightGuard(&self.in_flight);

        let section = self.current_section()?;
        let operation = section.operation();
        for other in &self.sections {
            if other.operation() != operation {
                other.clear_errors();
            }
        }

        tracing::debug!(operation = %operation, "submit");
        let result = section.authorise().await?;

        if let Some(user) = &result {
            let payload = serde_json::to_string(user)
                .map_err(|e| SessionError::Serialize(e.to_string()))?;
            self.session.set(&self.session_key, &payload)?;
            *self.current.lock().unwrap() = Some(user.clone());
            tracing::info!(name = %user.name, pk = user.pk, "authorised");
        }

        Ok(result)
    }

    /// The authenticated identity, if any.
    ///
    /// The in-memory user wins; otherwise the session slot is read and the
    /// reconstructed user cached. Idempotent between submits and logouts.
    ///
    /// # Errors
    /// * `Session` - The slot could not be read or holds corrupt JSON
    pub fn current_user(&self) -> Result<Option<User>, AuthError> {
        let mut current = self.current.lock().unwrap();
        if let Some(user) = current.as_ref() {
            return Ok(Some(user.clone()));
        }

        let Some(raw) = self.session.get(&self.session_key)? else {
            return Ok(None);
        };
        let user: User =
            serde_json::from_str(&raw).map_err(|e| SessionError::Corrupt(e.to_string()))?;
        *current = Some(user.clone());
        Ok(Some(user))
    }

    /// Drop the authenticated identity.
    ///
    /// Removes the session entry and clears the in-memory user; the caller
    /// re-renders the unauthenticated view.
    ///
    /// # Errors
    /// * `Session` - The slot could not be removed
    pub fn logout(&self) -> Result<(), AuthError> {
        self.session.remove(&self.session_key)?;
        *self.current.lock().unwrap() = None;
        tracing::info!("logged out");
        Ok(())
    }

    /// React to a radio reselection: clear error text in every section other
    /// than the active one.
    pub fn on_choice_changed(&self) {
        let active = match self.selector.selected().as_slice() {
            [one] => Some(*one),
            _ => None,
        };
        for section in &self.sections {
            if Some(section.operation()) != active {
                section.clear_errors();
            }
        }
    }

    /// React to a field edit: clear the active section's errors so a
    /// re-submission starts without stale messages.
    pub fn on_field_edited(&self) {
        if let Ok(section) = self.current_section() {
            section.clear_errors();
        }
    }
}
