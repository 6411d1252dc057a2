//! Credential models.

use serde::{Deserialize, Serialize};

/// Opaque bearer credential.
///
/// `Debug` never prints the secret so tokens can travel through `tracing` fields safely.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Body of a successful `POST login/`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub access: AccessToken,
    #[serde(default)]
    pub refresh: Option<AccessToken>,
}

/// Acknowledgement body returned by signup, profile update and delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServerMessage {
    #[serde(default)]
    pub message: Option<String>,
    /// Present when the server signs the user in as part of the call
    #[serde(default)]
    pub access: Option<AccessToken>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_token_debug_is_redacted() {
        let token = AccessToken::new("eyJhbGciOi.secret");
        assert_eq!(format!("{token:?}"), "AccessToken(***)");
        assert_eq!(token.bearer(), "Bearer eyJhbGciOi.secret");
    }

    #[test]
    fn test_login_response() {
        let resp: LoginResponse =
            serde_json::from_str(r#"{"access": "a.b.c", "refresh": "d.e.f"}"#).unwrap();
        assert_eq!(resp.access.as_str(), "a.b.c");
        assert_eq!(resp.refresh.map(|t| t.as_str().to_string()), Some("d.e.f".to_string()));
    }
}
