//! CLI session persistence backed by the OS keychain.

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{Mutex, OnceLock};

#[cfg(not(test))]
use keyring::Entry;

use notekeeper_core::session::{Session, SessionPersistence};
use notekeeper_core::{Error, Result};

#[cfg(not(test))]
const KEYRING_SERVICE_NAME: &str = "notekeeper-cli";
const DEFAULT_PROFILE: &str = "default";
const ENV_PROFILE: &str = "NOTEKEEPER_PROFILE";

#[derive(Clone)]
pub struct KeyringSessionStore {
    username: String,
}

impl KeyringSessionStore {
    pub fn new(profile_name: &str) -> Self {
        Self {
            username: format!("session:{profile_name}"),
        }
    }

    #[cfg(test)]
    fn test_store() -> &'static Mutex<HashMap<String, String>> {
        static STORE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
        STORE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    #[cfg(not(test))]
    fn entry(&self) -> Result<Entry> {
        Entry::new(KEYRING_SERVICE_NAME, &self.username)
            .map_err(|error| Error::Session(error.to_string()))
    }
}

impl SessionPersistence for KeyringSessionStore {
    #[cfg(not(test))]
    fn load_session(&self) -> Result<Option<Session>> {
        let entry = self.entry()?;
        match entry.get_password() {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(Error::Session(error.to_string())),
        }
    }

    #[cfg(test)]
    fn load_session(&self) -> Result<Option<Session>> {
        let guard = Self::test_store()
            .lock()
            .map_err(|error| Error::Session(error.to_string()))?;
        guard
            .get(&self.username)
            .map(|raw| serde_json::from_str(raw))
            .transpose()
            .map_err(Error::from)
    }

    #[cfg(not(test))]
    fn save_session(&self, session: &Session) -> Result<()> {
        let raw = serde_json::to_string(session)?;
        self.entry()?
            .set_password(&raw)
            .map_err(|error| Error::Session(error.to_string()))
    }

    #[cfg(test)]
    fn save_session(&self, session: &Session) -> Result<()> {
        let raw = serde_json::to_string(session)?;
        Self::test_store()
            .lock()
            .map_err(|error| Error::Session(error.to_string()))?
            .insert(self.username.clone(), raw);
        Ok(())
    }

    #[cfg(not(test))]
    fn clear_session(&self) -> Result<()> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(Error::Session(error.to_string())),
        }
    }

    #[cfg(test)]
    fn clear_session(&self) -> Result<()> {
        Self::test_store()
            .lock()
            .map_err(|error| Error::Session(error.to_string()))?
            .remove(&self.username);
        Ok(())
    }
}

/// Pick the profile from the flag, then `NOTEKEEPER_PROFILE`, then the default.
pub fn resolve_profile_name(explicit: Option<&str>) -> String {
    normalize_profile_name(explicit)
        .or_else(|| normalize_profile_name(std::env::var(ENV_PROFILE).ok().as_deref()))
        .unwrap_or_else(|| DEFAULT_PROFILE.to_string())
}

pub fn normalize_profile_name(value: Option<&str>) -> Option<String> {
    let value = value?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use notekeeper_core::session::{sign_in, sign_out};

    use super::*;

    #[test]
    fn session_roundtrip_is_scoped_per_profile() {
        let work = KeyringSessionStore::new("auth-test-work");
        let home = KeyringSessionStore::new("auth-test-home");

        sign_in(&work, "work-token").unwrap();
        assert_eq!(
            work.load_session().unwrap().map(|session| session.access_token),
            Some("work-token".to_string())
        );
        assert!(home.load_session().unwrap().is_none());

        assert!(sign_out(&work).unwrap());
        assert!(work.load_session().unwrap().is_none());
    }

    #[test]
    fn normalize_profile_name_rejects_blank() {
        assert_eq!(normalize_profile_name(Some("  ")), None);
        assert_eq!(normalize_profile_name(None), None);
        assert_eq!(
            normalize_profile_name(Some(" work ")),
            Some("work".to_string())
        );
    }

    #[test]
    fn explicit_profile_wins() {
        assert_eq!(resolve_profile_name(Some("work")), "work");
    }
}
