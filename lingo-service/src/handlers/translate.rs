use axum::{extract::State, Json};
use service_core::error::AppError;
use service_core::extract::ValidatedJson;

use crate::dtos::{TranslationRequest, TranslationResult};
use crate::middleware::RequestCredential;
use crate::services::context::{load_profile, resolve_translation_params};
use crate::startup::AppState;

/// `POST /api/translate`
pub async fn translate(
    State(state): State<AppState>,
    RequestCredential(credential): RequestCredential,
    ValidatedJson(request): ValidatedJson<TranslationRequest>,
) -> Result<Json<TranslationResult>, AppError> {
    let identity = state.auth.verify(&credential).await?;

    let profile = load_profile(state.profiles.as_ref(), &identity, &credential).await;
    let params = resolve_translation_params(request, profile.as_ref());

    tracing::info!(
        user_id = %identity,
        source_language = %params.source_language,
        target_language = %params.target_language,
        "Translating word"
    );

    let result = state.generator.translate(&params).await?;

    Ok(Json(result))
}
