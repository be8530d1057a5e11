use axum::{extract::State, Json};
use service_core::error::AppError;
use service_core::extract::ValidatedJson;

use crate::dtos::{PhraseRequest, PhraseResult};
use crate::middleware::RequestCredential;
use crate::services::context::{load_profile, resolve_phrase_params};
use crate::startup::AppState;

/// `POST /api/random-phrase`
pub async fn random_phrase(
    State(state): State<AppState>,
    RequestCredential(credential): RequestCredential,
    ValidatedJson(request): ValidatedJson<PhraseRequest>,
) -> Result<Json<PhraseResult>, AppError> {
    let identity = state.auth.verify(&credential).await?;

    let profile = load_profile(state.profiles.as_ref(), &identity, &credential).await;
    let params = resolve_phrase_params(request, profile.as_ref());

    tracing::info!(
        user_id = %identity,
        word_count = params.words.len(),
        has_context = !params.user_context.is_empty(),
        "Generating phrase"
    );

    let result = state.generator.generate_phrase(&params).await?;

    Ok(Json(result))
}
