//! Teams notification: token acquisition plus a deliberately stubbed send.
//!
//! Authentication uses the OAuth 2.0 resource-owner-password grant (the
//! "username/password flow"): a single form POST to the authority's token
//! endpoint, one response, done. There is no token cache, no refresh, and no
//! retry; the operator runs the tool interactively and can simply run it
//! again.
//!
//! ## The send is a stub
//!
//! The Microsoft Graph chat call that would actually deliver the message is
//! NOT implemented. On successful authentication the notifier logs what it
//! would send and returns a [`NotifyReceipt`] whose `delivered` field is
//! always `false`. Callers must treat the receipt as proof of authentication
//! only, never as proof of delivery.

use crate::config::AuthConfig;
use crate::error::RosterError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// What [`TeamsNotifier::notify`] actually did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyReceipt {
    /// Full recipient address the message was addressed to.
    pub recipient: String,
    /// Always `false`: the Graph send-message call is not implemented.
    pub delivered: bool,
}

/// Successful token response from the identity provider.
///
/// Only the fields this tool consumes; the provider returns more.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: u64,
}

/// Error body returned by the token endpoint on a failed grant.
#[derive(Debug, Deserialize)]
struct TokenErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Username/password authentication against the identity provider, with a
/// stubbed message send.
pub struct TeamsNotifier {
    http: reqwest::Client,
    config: AuthConfig,
}

impl TeamsNotifier {
    /// Create a notifier from the given auth configuration.
    ///
    /// Fails fast when no client id is configured: the token endpoint would
    /// reject the request anyway, with a far less helpful message.
    pub fn new(config: AuthConfig) -> Result<Self, RosterError> {
        if config.client_id.trim().is_empty() {
            return Err(RosterError::AuthNotConfigured {
                hint: "Register an application and set TEAMS_CLIENT_ID (or pass --client-id)."
                    .to_string(),
            });
        }

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| RosterError::Internal(format!("http client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Full token endpoint URL under the configured authority.
    fn token_endpoint(&self) -> String {
        format!(
            "{}/oauth2/v2.0/token",
            self.config.authority.trim_end_matches('/')
        )
    }

    /// Build the full recipient address from an email local part.
    pub fn full_address(&self, email_local: &str) -> String {
        format!("{}@{}", email_local.trim(), self.config.email_domain)
    }

    /// Acquire an access token with the username/password grant.
    ///
    /// One POST, one response. A non-success status is decoded as the
    /// provider's error body and surfaced in [`RosterError::AuthFailed`];
    /// transport failures become [`RosterError::AuthTransport`].
    pub async fn acquire_token(
        &self,
        username: &str,
        password: &str,
    ) -> Result<TokenResponse, RosterError> {
        let endpoint = self.token_endpoint();
        let scope = self.config.scopes.join(" ");
        debug!("Requesting token from {} (scopes: {})", endpoint, scope);

        let form = [
            ("client_id", self.config.client_id.as_str()),
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
            ("scope", scope.as_str()),
        ];

        let response = self
            .http
            .post(&endpoint)
            .form(&form)
            .send()
            .await
            .map_err(|e| RosterError::AuthTransport {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            let token: TokenResponse =
                response
                    .json()
                    .await
                    .map_err(|e| RosterError::AuthTransport {
                        reason: format!("malformed token response: {e}"),
                    })?;

            if token.access_token.is_empty() {
                return Err(RosterError::AuthFailed {
                    error: "invalid_response".to_string(),
                    description: "token response carried no access token".to_string(),
                });
            }

            return Ok(token);
        }

        // Grant rejected: decode the provider's error body as far as possible.
        let body = response.text().await.unwrap_or_default();
        let parsed: TokenErrorBody = serde_json::from_str(&body).unwrap_or(TokenErrorBody {
            error: format!("http_{}", status.as_u16()),
            error_description: None,
        });

        Err(RosterError::AuthFailed {
            error: if parsed.error.is_empty() {
                format!("http_{}", status.as_u16())
            } else {
                parsed.error
            },
            description: parsed
                .error_description
                .unwrap_or_else(|| format!("HTTP {status}")),
        })
    }

    /// Authenticate and report what would be sent.
    ///
    /// On a successful grant this logs the would-be message and returns a
    /// receipt with `delivered: false`; the Graph chat call is intentionally
    /// unimplemented. On a failed grant the error is returned before any
    /// would-send logging happens.
    pub async fn notify(
        &self,
        email_local: &str,
        password: &str,
        message: &str,
    ) -> Result<NotifyReceipt, RosterError> {
        let recipient = self.full_address(email_local);

        let _token = self.acquire_token(&recipient, password).await?;
        info!("Authentication successful");

        // Graph send-message call would go here; delivery is not implemented.
        info!("Message would be sent to {}: {}", recipient, message);

        Ok(NotifyReceipt {
            recipient,
            delivered: false,
        })
    }
}
