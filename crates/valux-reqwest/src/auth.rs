//! Wallet-signature login.
//!
//! The server issues a nonce message, the wallet signs it, and the signed
//! message is exchanged for an access/refresh token pair.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use valux_core::Result;

use crate::client::ApiClient;

/// Tracing target for authentication operations.
pub const TRACING_TARGET: &str = "valux_reqwest::auth";

/// Message to be signed by the wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonceResponse {
    pub nonce: String,
    pub message: String,
}

/// Signed login request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub address: String,
    pub signature: String,
    pub message: String,
}

/// Authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub address: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Issued session.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserProfile,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("user", &self.user)
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}

/// Authentication endpoints.
#[derive(Debug, Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    /// Creates the service over `client`.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Requests the message `address` must sign.
    pub async fn nonce(&self, address: &str) -> Result<NonceResponse> {
        tracing::debug!(target: TRACING_TARGET, %address, "Requesting login nonce");
        self.client
            .get("auth/nonce", &[("address", address.to_owned())])
            .await
    }

    /// Exchanges a signed message for tokens and stores them.
    ///
    /// The session is usable even if the tokens could not be persisted.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        tracing::info!(target: TRACING_TARGET, address = %request.address, "Logging in");
        let response: LoginResponse = self.client.post("auth/login", Some(request)).await?;

        if let Err(error) = self
            .client
            .set_auth_tokens(&response.access_token, &response.refresh_token)
        {
            tracing::warn!(target: TRACING_TARGET, error = %error, "Session tokens not persisted");
        }

        tracing::info!(target: TRACING_TARGET, user_id = %response.user.id, "Logged in");
        Ok(response)
    }

    /// Fetches the authenticated user.
    pub async fn profile(&self) -> Result<UserProfile> {
        self.client.get("auth/profile", &[]).await
    }

    /// Ends the session on the server and forgets the local tokens.
    ///
    /// Local tokens are cleared even when the server call fails.
    pub async fn logout(&self) -> Result<()> {
        let result = self
            .client
            .post::<Value, Value>("auth/logout", None)
            .await
            .map(drop);

        if let Err(error) = &result {
            tracing::warn!(target: TRACING_TARGET, error = %error, "Server logout failed");
        }
        self.client.clear_auth_tokens()?;

        tracing::info!(target: TRACING_TARGET, "Logged out");
        result
    }

    /// Returns true if an access token is present.
    pub fn is_authenticated(&self) -> bool {
        self.client.is_authenticated()
    }

    /// Forgets the local tokens without contacting the server.
    pub fn clear_auth(&self) -> Result<()> {
        self.client.clear_auth_tokens()
    }
}
