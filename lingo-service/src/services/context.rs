//! Context resolution: how a request's effective generation parameters are
//! derived from explicit request fields, the caller's profile and defaults.
//!
//! Precedence is always explicit request value, then profile value, then
//! the hardcoded default. Empty strings count as absent at every level.

use crate::dtos::{PhraseRequest, TranslationRequest};
use crate::models::{Credential, UserIdentity, UserProfile};
use crate::services::profile_store::ProfileStore;

pub const DEFAULT_SOURCE_LANGUAGE: &str = "English";
pub const DEFAULT_TARGET_LANGUAGE: &str = "Spanish";

/// Resolved inputs for the phrase crew.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseParams {
    pub words: Vec<String>,
    pub user_context: String,
}

/// Resolved inputs for the translation crew.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationParams {
    pub word: String,
    pub source_language: String,
    pub target_language: String,
    pub user_context: String,
}

/// Fetch the caller's profile, degrading any store failure to "absent".
///
/// A missing row and a failed fetch are deliberately indistinguishable to
/// the caller; only the log line differs.
pub async fn load_profile(
    store: &dyn ProfileStore,
    identity: &UserIdentity,
    credential: &Credential,
) -> Option<UserProfile> {
    match store.fetch_profile(identity, credential).await {
        Ok(profile) => {
            tracing::debug!(user_id = %identity, found = profile.is_some(), "Profile lookup");
            profile
        }
        Err(e) => {
            tracing::warn!(
                user_id = %identity,
                error = %e,
                "Profile fetch failed, continuing with defaults"
            );
            metrics::counter!("lingo_profile_fetch_degraded_total").increment(1);
            None
        }
    }
}

/// Words pass through unchanged; context comes from the profile if set.
pub fn resolve_phrase_params(request: PhraseRequest, profile: Option<&UserProfile>) -> PhraseParams {
    PhraseParams {
        words: request.into_words(),
        user_context: profile_context(profile),
    }
}

pub fn resolve_translation_params(
    request: TranslationRequest,
    profile: Option<&UserProfile>,
) -> TranslationParams {
    let source_language = pick(
        request.source_language.as_deref(),
        profile.and_then(UserProfile::native_language),
        DEFAULT_SOURCE_LANGUAGE,
    );
    let target_language = pick(
        request.target_language.as_deref(),
        profile.and_then(UserProfile::target_language),
        DEFAULT_TARGET_LANGUAGE,
    );

    TranslationParams {
        word: request.word.unwrap_or_default(),
        source_language,
        target_language,
        user_context: profile_context(profile),
    }
}

fn profile_context(profile: Option<&UserProfile>) -> String {
    profile
        .and_then(UserProfile::context)
        .unwrap_or_default()
        .to_string()
}

fn pick(explicit: Option<&str>, from_profile: Option<&str>, default: &str) -> String {
    explicit
        .filter(|v| !v.is_empty())
        .or(from_profile)
        .unwrap_or(default)
        .to_string()
}
