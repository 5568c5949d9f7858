use axum::Json;
use axum::extract::State;
use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use docsift_core::PipelineError;
use docsift_document::DocumentError;

use super::server::AppState;
use super::upload::parse_multipart;

#[derive(serde::Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

pub(crate) async fn analyze_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    tracing::debug!("starting PDF analysis request");

    let form = match multipart {
        Ok(multipart) => match parse_multipart(multipart).await {
            Ok(form) => form,
            Err(e) => {
                tracing::error!("failed to read upload: {e}");
                return error_response(e.status(), e.body_text());
            }
        },
        Err(e) => {
            tracing::error!("request is not a multipart upload: {e}");
            return error_response(StatusCode::BAD_REQUEST, PipelineError::NoFiles.to_string());
        }
    };

    if form.nothing_selected() {
        tracing::error!("no PDF files selected");
        return error_response(StatusCode::BAD_REQUEST, "No PDF files selected");
    }

    match state.pipeline.run(form.files, form.api_key).await {
        Ok(response) => Json(response).into_response(),
        Err(e @ (PipelineError::NoFiles | PipelineError::Document(DocumentError::EmptyCorpus))) => {
            tracing::error!("{e}");
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(e) => {
            let message = format!("An error occurred: {e}");
            tracing::error!("error in analyze: {message}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, message)
        }
    }
}

pub(crate) async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
