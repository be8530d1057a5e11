//! Credential extraction and verification against the identity service.

use crate::config::SupabaseConfig;
use crate::models::{Credential, UserIdentity};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;
use service_core::error::AppError;
use service_core::observability::PropagateTraceContext;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authorization header is required")]
    MissingCredential,

    #[error("{0}")]
    AuthenticationFailed(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredential => AppError::Unauthorized(anyhow::anyhow!(err)),
            AuthError::AuthenticationFailed(msg) => AppError::AuthError(anyhow::anyhow!(msg)),
        }
    }
}

/// External identity service: token in, user identity out.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, credential: &Credential) -> Result<UserIdentity, AuthError>;
}

/// Turns an `Authorization` header into a verified identity.
#[derive(Clone)]
pub struct AuthResolver {
    verifier: Arc<dyn IdentityVerifier>,
}

impl AuthResolver {
    pub fn new(verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self { verifier }
    }

    /// Pull the credential out of the header value.
    ///
    /// With a scheme prefix (`Bearer abc`) the credential is everything after
    /// the first space; without one the whole value is the credential.
    pub fn extract_credential(header: Option<&str>) -> Result<Credential, AuthError> {
        let value = header
            .filter(|v| !v.is_empty())
            .ok_or(AuthError::MissingCredential)?;

        let token = match value.split_once(' ') {
            Some((_scheme, token)) => token,
            None => value,
        };

        Ok(Credential::new(token))
    }

    /// Verify the credential. Every failure collapses to
    /// `AuthenticationFailed`; nothing is retried.
    pub async fn verify(&self, credential: &Credential) -> Result<UserIdentity, AuthError> {
        self.verifier.verify(credential).await.map_err(|e| {
            tracing::warn!(error = %e, "Credential verification failed");
            match e {
                AuthError::AuthenticationFailed(_) => e,
                other => AuthError::AuthenticationFailed(other.to_string()),
            }
        })
    }
}

/// Supabase GoTrue client (`GET /auth/v1/user`).
pub struct SupabaseIdentityClient {
    client: Client,
    settings: SupabaseConfig,
}

#[derive(Debug, Deserialize)]
struct GoTrueUser {
    #[serde(default)]
    id: String,
}

#[derive(Debug, Default, Deserialize)]
struct GoTrueError {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

impl GoTrueError {
    fn into_message(self) -> Option<String> {
        self.msg.or(self.message).or(self.error_description)
    }
}

impl SupabaseIdentityClient {
    pub fn new(client: Client, settings: SupabaseConfig) -> Self {
        Self { client, settings }
    }
}

#[async_trait]
impl IdentityVerifier for SupabaseIdentityClient {
    async fn verify(&self, credential: &Credential) -> Result<UserIdentity, AuthError> {
        let url = format!("{}/auth/v1/user", self.settings.url.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .header("apikey", self.settings.anon_key.expose_secret())
            .bearer_auth(credential.expose())
            .propagate_trace_context()
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach identity service at {}: {}", url, e);
                AuthError::AuthenticationFailed(format!("identity service unreachable: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<GoTrueError>()
                .await
                .ok()
                .and_then(GoTrueError::into_message)
                .unwrap_or_else(|| format!("identity service returned {}", status));
            return Err(AuthError::AuthenticationFailed(message));
        }

        let user: GoTrueUser = response.json().await.map_err(|e| {
            AuthError::AuthenticationFailed(format!("invalid identity response: {}", e))
        })?;

        UserIdentity::new(user.id).ok_or_else(|| {
            AuthError::AuthenticationFailed("identity service returned no user".to_string())
        })
    }
}
