use crate::error::ErrorResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::any::Any;

/// Converts a handler panic into a 500 `{"error": ...}` response.
///
/// Intended for `tower_http::catch_panic::CatchPanicLayer::custom`. The
/// panic payload is logged and echoed so that no partial result escapes.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    tracing::error!(panic = %message, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: format!("An error occurred: {}", message),
            details: None,
        }),
    )
        .into_response()
}
