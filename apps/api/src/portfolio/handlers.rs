//! Axum route handlers for the Portfolio API.

use axum::{
    body::Body,
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::Response,
};

use crate::errors::AppError;
use crate::models::site::ParseTier;
use crate::portfolio::packager::DOWNLOAD_NAME;
use crate::portfolio::pipeline::Upload;
use crate::state::AppState;

/// Multipart field carrying the resume.
const UPLOAD_FIELD: &str = "resume";
/// Response header naming the parser tier that produced the assets.
pub const PARSE_TIER_HEADER: &str = "x-folio-parse-tier";

/// POST /api/v1/portfolio
///
/// Accepts a multipart PDF upload and answers with the generated site as a zip download.
pub async fn handle_generate(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let upload = read_upload(&mut multipart).await?;
    let site = state.pipeline.run(upload).await?;
    tracing::info!(
        "Portfolio ready: html={}B css={}B js={}B archive={}B",
        site.assets.html.len(),
        site.assets.css.len(),
        site.assets.js.len(),
        site.archive.len()
    );
    archive_response(site.archive, Some(site.tier))
}

/// GET /api/v1/portfolio/archive
///
/// Re-serves the archive written by the most recent successful run.
pub async fn handle_latest_archive(State(state): State<AppState>) -> Result<Response, AppError> {
    let archive = state
        .pipeline
        .packager()
        .read_archive()
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .ok_or_else(|| {
            AppError::NotFound("No portfolio archive has been generated yet.".to_string())
        })?;
    archive_response(archive, None)
}

/// Pulls the `resume` field out of the form. Other fields are ignored.
async fn read_upload(multipart: &mut Multipart) -> Result<Option<Upload>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(String::from);
        let content_type = field.content_type().map(String::from);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        tracing::debug!(
            "Received resume upload: file_name={:?}, content_type={:?}, {} bytes",
            file_name,
            content_type,
            bytes.len()
        );

        return Ok(Some(Upload {
            file_name,
            content_type,
            bytes,
        }));
    }
    Ok(None)
}

fn archive_response(archive: Vec<u8>, tier: Option<ParseTier>) -> Result<Response, AppError> {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/zip")
        .header(header::CONTENT_LENGTH, archive.len())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{DOWNLOAD_NAME}\""),
        );
    if let Some(tier) = tier {
        builder = builder.header(PARSE_TIER_HEADER, tier.as_str());
    }
    builder
        .body(Body::from(archive))
        .map_err(|e| AppError::Internal(e.into()))
}
