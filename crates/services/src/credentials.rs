use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Holder of the bearer token used for backend calls.
pub trait CredentialStore: Send + Sync {
    fn token(&self) -> Option<String>;

    /// Forget the token. Called when the backend reports the session expired.
    fn clear(&self);
}

/// Process-local token holder.
#[derive(Default)]
pub struct InMemoryCredentials {
    token: Mutex<Option<String>>,
}

impl InMemoryCredentials {
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: Mutex::new(token.filter(|token| !token.trim().is_empty())),
        }
    }

    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self::new(Some(token.into()))
    }
}

impl CredentialStore for InMemoryCredentials {
    fn token(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn clear(&self) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl fmt::Debug for InMemoryCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let present = self.token().is_some();
        f.debug_struct("InMemoryCredentials")
            .field("token", if present { &"***" } else { &"<none>" })
            .finish()
    }
}
