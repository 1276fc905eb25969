//! Exchanging the refresh token for a new access token.

use reqwest::Method;
use serde_json::{Value, json};
use valux_core::{Envelope, Error, Result};

use super::{ApiClient, TRACING_TARGET, response};

impl ApiClient {
    /// Obtains a new access token and stores it with the existing refresh
    /// token.
    ///
    /// Uses the bare send path, so a rejected refresh never triggers another
    /// refresh. The token store is left untouched on failure.
    pub(crate) async fn refresh_access_token(&self) -> Result<()> {
        let refresh_token = self.tokens().refresh_token().ok_or_else(|| {
            Error::authentication().with_message("No refresh token available")
        })?;

        let url = self.endpoint("auth/refresh")?;
        let body = json!({ "refresh_token": refresh_token });

        let response = self.send(Method::POST, &url, Some(&body), &[], None).await?;
        let status = response.status();
        let body = response::read_body(response).await?;

        if !status.is_success() {
            return Err(Error::authentication()
                .with_message(format!("Token refresh rejected with HTTP {}", status.as_u16()))
                .with_status(status.as_u16()));
        }

        let access_token = extract_access_token(&body).ok_or_else(|| {
            Error::authentication().with_message("Token refresh response has no access token")
        })?;

        if let Err(error) = self.tokens().set(access_token, refresh_token) {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %error,
                "Refreshed access token could not be persisted"
            );
        }

        tracing::debug!(target: TRACING_TARGET, "Access token refreshed");
        Ok(())
    }
}

/// Finds `access_token` in a raw or enveloped refresh response.
fn extract_access_token(body: &Value) -> Option<String> {
    let payload = match Envelope::detect(body) {
        Some(envelope) if envelope.success => envelope.data?,
        Some(_) => return None,
        None => body.clone(),
    };

    payload
        .get("access_token")
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
}
