//! Google `OpenID` Connect client.
//!
//! Implements the authorization code flow: build the consent URL, exchange
//! the returned code for tokens, and read the identity out of the ID token.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::GoogleConfig;
use crate::services::auth::AuthError;

/// Google OAuth authorization endpoint.
const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Google OAuth token endpoint.
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// Scopes requested at sign-in.
const SCOPES: &str = "openid email profile";

/// The identity asserted by a Google ID token.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleIdentity {
    /// Google's stable subject identifier for the account.
    pub sub: String,
    /// Verified email address.
    pub email: String,
    /// Display name from the Google profile.
    pub name: Option<String>,
    /// Profile photo URL.
    pub picture: Option<String>,
    /// Nonce echoed back from the authorization request.
    pub nonce: Option<String>,
}

/// Token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    id_token: String,
}

/// Client for Google's `OpenID` Connect endpoints.
pub struct GoogleClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: SecretString,
}

impl GoogleClient {
    /// Create a new client from configuration.
    #[must_use]
    pub fn new(config: &GoogleConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        }
    }

    /// Build the authorization URL to redirect the browser to.
    ///
    /// `state` protects against CSRF; `nonce` against ID token replay.
    /// Both must be stored in the session and checked on callback.
    #[must_use]
    pub fn authorization_url(&self, redirect_uri: &str, state: &str, nonce: &str) -> String {
        let mut url = url::Url::parse(AUTH_ENDPOINT).unwrap_or_else(|_| {
            unreachable!("authorization endpoint is a valid URL");
        });

        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", SCOPES)
            .append_pair("state", state)
            .append_pair("nonce", nonce);

        url.into()
    }

    /// Exchange an authorization code for the signed-in identity.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Google` if the token exchange fails or the ID
    /// token cannot be decoded.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<GoogleIdentity, AuthError> {
        let response = self
            .http
            .post(TOKEN_ENDPOINT)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.expose_secret()),
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", redirect_uri),
            ])
            .send()
            .await
            .map_err(|e| AuthError::Google(format!("token request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AuthError::Google(format!(
                "token endpoint returned {status}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Google(format!("invalid token response: {e}")))?;

        decode_identity(&token.id_token)
    }
}

/// Decode the identity claims from an ID token.
///
/// The signature is not verified: the token arrives directly from Google's
/// token endpoint over TLS, not from the browser.
fn decode_identity(id_token: &str) -> Result<GoogleIdentity, AuthError> {
    let payload = id_token
        .split('.')
        .nth(1)
        .ok_or_else(|| AuthError::Google("malformed ID token".to_owned()))?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| AuthError::Google(format!("invalid ID token encoding: {e}")))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| AuthError::Google(format!("invalid ID token claims: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fake_id_token(claims: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
        format!("{header}.{payload}.signature")
    }

    fn client() -> GoogleClient {
        GoogleClient::new(&GoogleConfig {
            client_id: "client-123.apps.googleusercontent.com".to_owned(),
            client_secret: SecretString::from("test-client-secret-value"),
        })
    }

    #[test]
    fn test_authorization_url_carries_state_and_nonce() {
        let url = client().authorization_url(
            "http://localhost:3000/auth/google/callback",
            "state-abc",
            "nonce-xyz",
        );

        assert!(url.starts_with(AUTH_ENDPOINT));
        assert!(url.contains("state=state-abc"));
        assert!(url.contains("nonce=nonce-xyz"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("scope=openid+email+profile"));
    }

    #[test]
    fn test_decode_identity_reads_profile_claims() {
        let token = fake_id_token(&json!({
            "sub": "108123456789",
            "email": "hero@example.com",
            "name": "Hero of the Vault",
            "picture": "https://lh3.googleusercontent.com/a/photo",
            "nonce": "nonce-xyz",
        }));

        let identity = decode_identity(&token).unwrap();
        assert_eq!(identity.sub, "108123456789");
        assert_eq!(identity.email, "hero@example.com");
        assert_eq!(identity.name.as_deref(), Some("Hero of the Vault"));
        assert_eq!(identity.nonce.as_deref(), Some("nonce-xyz"));
    }

    #[test]
    fn test_decode_identity_tolerates_missing_profile() {
        let token = fake_id_token(&json!({
            "sub": "108123456789",
            "email": "hero@example.com",
        }));

        let identity = decode_identity(&token).unwrap();
        assert_eq!(identity.name, None);
        assert_eq!(identity.picture, None);
    }

    #[test]
    fn test_decode_identity_rejects_malformed_token() {
        assert!(decode_identity("not-a-jwt").is_err());
        assert!(decode_identity("a.!!!.c").is_err());
    }
}
