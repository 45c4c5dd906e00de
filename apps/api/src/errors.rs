use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::portfolio::pipeline::PipelineError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("LLM error: {0}")]
    Llm(String),

    /// Parsing or packaging of the model output failed. The detail is shown to the user.
    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::NoUpload => {
                AppError::Validation("Please upload a PDF resume.".to_string())
            }
            PipelineError::NotPdf => {
                AppError::Validation("Only PDF files are accepted.".to_string())
            }
            PipelineError::UnreadablePdf => AppError::UnprocessableEntity(
                "Could not read text from the PDF. Please try another file.".to_string(),
            ),
            PipelineError::Extraction(e) => {
                tracing::warn!("PDF extraction failed: {e}");
                AppError::UnprocessableEntity(
                    "Could not read text from the PDF. Please try another file.".to_string(),
                )
            }
            PipelineError::Inference(e) => AppError::Llm(e.to_string()),
            PipelineError::Packaging(e) => AppError::Generation(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::Llm(detail) => {
                tracing::error!("LLM error: {detail}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    format!(
                        "The AI service could not generate a portfolio. Please try again. Details: {detail}"
                    ),
                )
            }
            AppError::Generation(detail) => {
                tracing::error!("Generation error: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "GENERATION_ERROR",
                    format!("AI output format error. Please generate again. Details: {detail}"),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
