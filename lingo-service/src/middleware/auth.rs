use axum::{
    async_trait,
    extract::{FromRequestParts, Request},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use service_core::error::AppError;

use crate::models::Credential;
use crate::services::AuthResolver;

/// Require an `Authorization` header and stash the extracted credential.
///
/// Only the header is inspected here. Verification against the identity
/// service happens in the handler, after the body has been validated, so a
/// malformed request never costs an external call.
pub async fn credential_middleware(mut req: Request, next: Next) -> Result<Response, AppError> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let credential = AuthResolver::extract_credential(header_value)?;

    req.extensions_mut().insert(credential);

    Ok(next.run(req).await)
}

/// The credential stored by [`credential_middleware`].
pub struct RequestCredential(pub Credential);

#[async_trait]
impl<S> FromRequestParts<S> for RequestCredential
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let credential = parts.extensions.get::<Credential>().ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!(
                "Credential missing from request extensions"
            ))
        })?;

        Ok(RequestCredential(credential.clone()))
    }
}
