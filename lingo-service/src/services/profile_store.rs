//! User profile lookup.

use crate::config::SupabaseConfig;
use crate::models::{Credential, UserIdentity, UserProfile};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use service_core::observability::PropagateTraceContext;
use thiserror::Error;

/// Never surfaced to callers: a failed lookup degrades to "no profile".
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile store unreachable: {0}")]
    Unreachable(String),

    #[error("profile store returned {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("malformed profile response: {0}")]
    Malformed(String),
}

/// Zero-or-one profile row per user.
///
/// The caller's credential is re-presented on every call so that the store
/// can scope the query to that user.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn fetch_profile(
        &self,
        identity: &UserIdentity,
        credential: &Credential,
    ) -> Result<Option<UserProfile>, ProfileError>;
}

/// PostgREST access to the `profiles` table.
pub struct SupabaseProfileStore {
    client: Client,
    settings: SupabaseConfig,
}

impl SupabaseProfileStore {
    pub fn new(client: Client, settings: SupabaseConfig) -> Self {
        Self { client, settings }
    }
}

#[async_trait]
impl ProfileStore for SupabaseProfileStore {
    async fn fetch_profile(
        &self,
        identity: &UserIdentity,
        credential: &Credential,
    ) -> Result<Option<UserProfile>, ProfileError> {
        let url = format!("{}/rest/v1/profiles", self.settings.url.trim_end_matches('/'));
        let id_filter = format!("eq.{}", identity);

        let response = self
            .client
            .get(&url)
            .query(&[("select", "*"), ("id", id_filter.as_str())])
            .header("apikey", self.settings.anon_key.expose_secret())
            .bearer_auth(credential.expose())
            .propagate_trace_context()
            .send()
            .await
            .map_err(|e| ProfileError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProfileError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let rows: Vec<UserProfile> = response
            .json()
            .await
            .map_err(|e| ProfileError::Malformed(e.to_string()))?;

        Ok(rows.into_iter().next())
    }
}
