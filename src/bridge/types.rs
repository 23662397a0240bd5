//! Request and response payloads for the auth endpoints. Both carry
//! credentials, so they must never be logged.

use crate::errors::BridgeError;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Username and password read from a form at submission time.
///
/// Values are kept exactly as typed: no trimming, empty strings allowed.
#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Encodes the `{"username": .., "password": ..}` request body.
    ///
    /// # Errors
    /// Returns `BridgeError::Serialization` if encoding fails.
    pub fn to_json(&self) -> Result<String, BridgeError> {
        serde_json::to_string(&CredentialsPayload {
            username: &self.username,
            password: self.password.expose_secret(),
        })
        .map_err(|err| BridgeError::Serialization(format!("Failed to encode request: {err}")))
    }
}

#[derive(Serialize)]
struct CredentialsPayload<'a> {
    username: &'a str,
    password: &'a str,
}

/// Body of a successful login response.
#[derive(Deserialize)]
pub struct AuthResult {
    pub token: String,
}

impl AuthResult {
    /// # Errors
    /// Returns `BridgeError::Parse` if the body is not JSON or has no string `token`.
    pub fn from_body(body: &str) -> Result<Self, BridgeError> {
        serde_json::from_str(body)
            .map_err(|err| BridgeError::Parse(format!("Failed to decode response: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn credentials_serialize_verbatim() {
        let credentials = Credentials::new(" alice ", "");
        let body: Value = serde_json::from_str(&credentials.to_json().unwrap()).unwrap();
        assert_eq!(body, json!({"username": " alice ", "password": ""}));
    }

    #[test]
    fn credentials_debug_hides_password() {
        let credentials = Credentials::new("alice", "hunter2");
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn auth_result_requires_string_token() {
        assert_eq!(
            AuthResult::from_body(r#"{"token":"abc123","user":"alice"}"#)
                .unwrap()
                .token,
            "abc123"
        );
        assert!(matches!(
            AuthResult::from_body(r#"{"message":"ok"}"#),
            Err(BridgeError::Parse(_))
        ));
        assert!(matches!(
            AuthResult::from_body(r#"{"token":42}"#),
            Err(BridgeError::Parse(_))
        ));
        assert!(matches!(
            AuthResult::from_body("Login successful"),
            Err(BridgeError::Parse(_))
        ));
    }
}
