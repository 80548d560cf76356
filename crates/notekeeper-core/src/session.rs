//! Signed-in session handling.
//!
//! Identity flows live with the hosting platform; this side only keeps the
//! opaque token it hands out so requests can carry it, and forgets it on
//! sign-out.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An opaque session token issued by the identity provider.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    /// When the session was stored (Unix seconds).
    pub stored_at: i64,
}

impl Session {
    pub fn new(access_token: impl Into<String>) -> Result<Self> {
        let access_token = access_token.into().trim().to_string();
        if access_token.is_empty() {
            return Err(Error::InvalidInput(
                "Session token must not be empty".to_string(),
            ));
        }
        Ok(Self {
            access_token,
            stored_at: chrono::Utc::now().timestamp(),
        })
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field("stored_at", &self.stored_at)
            .finish()
    }
}

/// Where a session is kept between runs.
pub trait SessionPersistence {
    fn load_session(&self) -> Result<Option<Session>>;
    fn save_session(&self, session: &Session) -> Result<()>;
    fn clear_session(&self) -> Result<()>;
}

/// Sign in by storing a token issued by the identity provider.
pub fn sign_in(store: &impl SessionPersistence, access_token: &str) -> Result<Session> {
    let session = Session::new(access_token)?;
    store.save_session(&session)?;
    tracing::info!("Session stored");
    Ok(session)
}

/// Sign out by discarding the stored session. Returns whether one existed.
pub fn sign_out(store: &impl SessionPersistence) -> Result<bool> {
    let existed = store.load_session()?.is_some();
    store.clear_session()?;
    tracing::info!(existed, "Session cleared");
    Ok(existed)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[derive(Default)]
    struct MemoryStore {
        slot: RefCell<Option<Session>>,
    }

    impl SessionPersistence for MemoryStore {
        fn load_session(&self) -> Result<Option<Session>> {
            Ok(self.slot.borrow().clone())
        }

        fn save_session(&self, session: &Session) -> Result<()> {
            *self.slot.borrow_mut() = Some(session.clone());
            Ok(())
        }

        fn clear_session(&self) -> Result<()> {
            *self.slot.borrow_mut() = None;
            Ok(())
        }
    }

    #[test]
    fn sign_in_then_sign_out() {
        let store = MemoryStore::default();

        let session = sign_in(&store, "  token-1 ").unwrap();
        assert_eq!(session.access_token, "token-1");
        assert_eq!(store.load_session().unwrap(), Some(session));

        assert!(sign_out(&store).unwrap());
        assert_eq!(store.load_session().unwrap(), None);
        assert!(!sign_out(&store).unwrap());
    }

    #[test]
    fn sign_in_rejects_empty_token() {
        let store = MemoryStore::default();
        assert!(sign_in(&store, "   ").is_err());
        assert_eq!(store.load_session().unwrap(), None);
    }

    #[test]
    fn session_debug_redacts_token() {
        let session = Session::new("secret-token").unwrap();
        assert!(!format!("{session:?}").contains("secret-token"));
    }
}
