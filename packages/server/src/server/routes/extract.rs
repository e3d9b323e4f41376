use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use link_preview::{ExtractRequest, PreviewError};
use serde::Serialize;
use tracing::{debug, warn};

use crate::server::app::AppState;

#[derive(Serialize)]
pub struct ErrorBody {
    error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Metadata extraction endpoint
///
/// Accepts `{"url": ...}` or `{"urls": [...]}` (1-5 URLs). A single URL
/// returns the record or a 500 with its error; a batch always returns 200
/// with failures confined to their own result slots.
///
/// The body is decoded as JSON whatever its `Content-Type`.
pub async fn extract_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let request = match serde_json::from_slice::<ExtractRequest>(&body) {
        Ok(request) => request,
        Err(e) => {
            debug!(error = %e, "Rejected request body");
            return error_response(StatusCode::BAD_REQUEST, "Invalid JSON body");
        }
    };

    let target = match state.previewer.target(request) {
        Ok(target) => target,
        Err(PreviewError::InvalidBatchSize { count: 0, .. }) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "At least one URL is required (use 'url' or 'urls' field)",
            );
        }
        Err(PreviewError::InvalidBatchSize { max, .. }) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("Maximum {} URLs allowed per request", max),
            );
        }
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    debug!(count = target.len(), "Extract request accepted");

    match state.previewer.run(target).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            warn!(error = %e, "Extraction failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// Any method other than POST on `/extract`
pub async fn method_not_allowed() -> Response {
    error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed. Use POST.")
}
