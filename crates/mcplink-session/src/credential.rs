//! API key handling

use crate::error::{Result, SessionError};
use std::fmt;

/// Non-empty API key, stored trimmed
///
/// `Debug` never prints the key itself.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Validate and trim a raw API key
    ///
    /// # Errors
    /// Returns [`SessionError::InvalidCredential`] if the key is empty or whitespace-only
    pub fn new(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SessionError::InvalidCredential);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The trimmed key
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_keys() {
        for raw in ["", "   ", "\t\n"] {
            assert!(matches!(
                Credential::new(raw),
                Err(SessionError::InvalidCredential)
            ));
        }
    }

    #[test]
    fn stores_trimmed_key() {
        let cred = Credential::new("  abc123 \n").unwrap();
        assert_eq!(cred.expose(), "abc123");
    }

    #[test]
    fn debug_hides_key() {
        let cred = Credential::new("secret").unwrap();
        assert!(!format!("{cred:?}").contains("secret"));
    }
}
