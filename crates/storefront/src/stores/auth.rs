//! Auth state store.
//!
//! Holds the current session (token + user profile) or nothing, and mirrors
//! every transition to the persistence adapter under the `authToken` and
//! `authUser` keys. The in-memory state is authoritative: a persistence
//! failure is reported to the caller but the transition stands.
//!
//! Logging out does NOT clear the cart here. Cross-store coordination is the
//! job of the orchestrating route handler (see `routes::auth::logout`), not
//! a hidden side effect of this store.

use std::sync::{Arc, PoisonError, RwLock};

use shopstore_core::{Session, UserProfile};

use crate::storage::{KvStore, PersistenceError, keys};

/// Store for the current login session.
pub struct AuthStore {
    session: RwLock<Option<Session>>,
    storage: Arc<dyn KvStore>,
}

impl AuthStore {
    /// Create a store with no session, ignoring any persisted state.
    #[must_use]
    pub fn new(storage: Arc<dyn KvStore>) -> Self {
        Self {
            session: RwLock::new(None),
            storage,
        }
    }

    /// Create a store initialized from persisted state.
    ///
    /// If either key is absent or the profile is malformed, the store starts
    /// logged out - never half-populated.
    #[must_use]
    pub fn restore(storage: Arc<dyn KvStore>) -> Self {
        let session = Self::read_persisted(storage.as_ref());
        Self {
            session: RwLock::new(session),
            storage,
        }
    }

    fn read_persisted(storage: &dyn KvStore) -> Option<Session> {
        let token = match storage.get(keys::AUTH_TOKEN) {
            Ok(Some(token)) => token,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read persisted token; starting logged out");
                return None;
            }
        };
        let raw_user = match storage.get(keys::AUTH_USER) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::warn!("persisted token without user profile; starting logged out");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read persisted profile; starting logged out");
                return None;
            }
        };
        match serde_json::from_str::<UserProfile>(&raw_user) {
            Ok(user) => Some(Session { token, user }),
            Err(e) => {
                tracing::warn!(error = %e, "persisted profile is malformed; starting logged out");
                None
            }
        }
    }

    /// Record a successful login and persist both fields.
    ///
    /// The in-memory session is updated unconditionally before persisting.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if either persisted write fails. The
    /// session is still active in memory; the error is non-fatal.
    pub fn login_success(
        &self,
        token: String,
        user: UserProfile,
    ) -> Result<(), PersistenceError> {
        let encoded = serde_json::to_string(&user)?;
        {
            let mut session = self.session.write().unwrap_or_else(PoisonError::into_inner);
            *session = Some(Session { token: token.clone(), user });
        }

        // Two independent writes: a crash between them is tolerated on
        // restore by treating a half-present pair as logged out.
        self.storage.set(keys::AUTH_TOKEN, &token)?;
        self.storage.set(keys::AUTH_USER, &encoded)?;
        Ok(())
    }

    /// Clear the session and remove both persisted fields.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if a persisted removal fails. The
    /// in-memory state is already cleared when this returns.
    pub fn logout(&self) -> Result<(), PersistenceError> {
        {
            let mut session = self.session.write().unwrap_or_else(PoisonError::into_inner);
            *session = None;
        }
        self.storage.remove(keys::AUTH_TOKEN)?;
        self.storage.remove(keys::AUTH_USER)?;
        Ok(())
    }

    /// Snapshot of the current session. Never blocks on I/O.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
