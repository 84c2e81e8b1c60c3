use std::sync::Arc;

use super::credentials::{CredentialStore, Role};
use crate::error::{AuthError, AuthorizationError};

/// The authenticated actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub identity: String,
    pub role: Role,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    Anonymous,
    Authenticated(Session),
}

/// Holds the current session and makes every write authorization decision.
pub struct AccessGate {
    store: Arc<dyn CredentialStore>,
    state: GateState,
}

impl AccessGate {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self {
            store,
            state: GateState::Anonymous,
        }
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            GateState::Authenticated(session) => Some(session),
            GateState::Anonymous => None,
        }
    }

    /// Exact match against the credential store.
    ///
    /// A successful login replaces any current session. A failed one leaves
    /// the gate Anonymous.
    pub fn login(&mut self, username: &str, password: &str) -> Result<Session, AuthError> {
        let entry = self
            .store
            .lookup(username)
            .filter(|entry| entry.password == password);

        match entry {
            Some(entry) => {
                let session = Session {
                    identity: username.to_string(),
                    role: entry.role,
                };
                log::info!("User '{}' logged in as {}", session.identity, session.role);
                self.state = GateState::Authenticated(session.clone());
                Ok(session)
            }
            None => {
                log::warn!("Rejected login for '{}'", username);
                self.state = GateState::Anonymous;
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Return to Anonymous. Yields the session that was active, if any.
    pub fn logout(&mut self) -> Option<Session> {
        match std::mem::replace(&mut self.state, GateState::Anonymous) {
            GateState::Authenticated(session) => {
                log::info!("User '{}' logged out", session.identity);
                Some(session)
            }
            GateState::Anonymous => None,
        }
    }

    /// Whether `session` may reprioritize or terminate processes.
    pub fn authorize_write(session: &Session) -> bool {
        session.is_admin()
    }

    /// Authorize a write against the current session.
    pub fn check_write(&self) -> Result<&Session, AuthorizationError> {
        let session = self.session().ok_or(AuthorizationError::NoSession)?;
        if Self::authorize_write(session) {
            Ok(session)
        } else {
            Err(AuthorizationError::Forbidden(session.identity.clone()))
        }
    }
}
