//! Calendar provider integration.

pub mod google;
pub mod oauth;

pub use google::GoogleCalendar;

/// Thin wrapper around the OS keyring for credential storage.
pub mod keyring_store {
    use crate::error::OAuthError;

    const SERVICE: &str = "daybrief";

    pub fn get(key: &str) -> Result<Option<String>, OAuthError> {
        let entry =
            keyring::Entry::new(SERVICE, key).map_err(|e| OAuthError::Keyring(e.to_string()))?;
        match entry.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(OAuthError::Keyring(e.to_string())),
        }
    }

    pub fn set(key: &str, value: &str) -> Result<(), OAuthError> {
        let entry =
            keyring::Entry::new(SERVICE, key).map_err(|e| OAuthError::Keyring(e.to_string()))?;
        entry
            .set_password(value)
            .map_err(|e| OAuthError::Keyring(e.to_string()))
    }

    pub fn delete(key: &str) -> Result<(), OAuthError> {
        let entry =
            keyring::Entry::new(SERVICE, key).map_err(|e| OAuthError::Keyring(e.to_string()))?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(OAuthError::Keyring(e.to_string())),
        }
    }
}
