//! Secure credential handling using the secrecy crate
//!
//! The database password lives in a `Secret<T>` container which zeros
//! its memory on drop and redacts Debug output, so it cannot leak into
//! logs or crash reports. Access requires an explicit `expose_secret()`.
//!
//! # Example
//!
//! ```rust
//! use merkur::config::{secret_string, SecretString};
//! use secrecy::ExposeSecret;
//!
//! let password: SecretString = secret_string("geheim".to_string());
//! assert_eq!(password.expose_secret().as_ref(), "geheim");
//!
//! // Debug output is redacted
//! assert!(!format!("{password:?}").contains("geheim"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// Newtype wrapper for String that implements the traits `Secret` needs
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    /// Check if the secret value is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Type alias for a secret string
pub type SecretString = Secret<SecretValue>;

/// Create a SecretString from a String
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

/// Create an optional SecretString from an optional String
#[inline]
pub fn secret_string_opt(value: Option<String>) -> Option<SecretString> {
    value.map(|s| Secret::new(SecretValue::from(s)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_secret_string_creation() {
        let secret = secret_string("test-password".to_string());
        assert_eq!(secret.expose_secret().as_ref(), "test-password");
    }

    #[test]
    fn test_secret_string_opt() {
        assert!(secret_string_opt(Some("pw".to_string())).is_some());
        assert!(secret_string_opt(None).is_none());
    }

    #[test]
    fn test_secret_debug_redacted() {
        let secret = secret_string("sensitive-data".to_string());
        let debug_output = format!("{secret:?}");
        assert!(!debug_output.contains("sensitive-data"));
    }

    #[test]
    fn test_secret_deserializes_from_plain_string() {
        #[derive(serde::Deserialize)]
        struct Wrapper {
            password: SecretString,
        }

        let wrapper: Wrapper = toml::from_str(r#"password = "geheim""#).unwrap();
        assert_eq!(wrapper.password.expose_secret().as_ref(), "geheim");
    }
}
