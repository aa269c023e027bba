//! Axum route handlers for the CV API.

use std::path::Path as FsPath;

use axum::{
    extract::{Path, State},
    http::{header, HeaderName},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;

use crate::cvs::generator::{generate_cv, GenerateCvRequest};
use crate::cvs::service::{delete_cv, get_cv, list_cvs, list_cvs_for_profile, read_cv_pdf};
use crate::errors::AppError;
use crate::models::cv::{CvRow, CvWithProfile};
use crate::state::AppState;

const CV_ID_HEADER: &str = "x-cv-id";

/// POST /cvs/generate
///
/// Runs the tailoring pipeline and returns the rendered PDF.
pub async fn handle_generate_cv(
    State(state): State<AppState>,
    Json(request): Json<GenerateCvRequest>,
) -> Result<Response, AppError> {
    let generated = generate_cv(
        &state.db,
        state.cv_drafter.as_ref(),
        &state.store,
        request,
    )
    .await?;

    Ok(pdf_response(&generated.record, generated.pdf))
}

/// GET /cvs
pub async fn handle_list_cvs(
    State(state): State<AppState>,
) -> Result<Json<Vec<CvWithProfile>>, AppError> {
    Ok(Json(list_cvs(&state.db).await?))
}

/// GET /cvs/:id
pub async fn handle_get_cv(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CvWithProfile>, AppError> {
    Ok(Json(get_cv(&state.db, id).await?))
}

/// GET /profiles/:id/cvs
pub async fn handle_list_profile_cvs(
    State(state): State<AppState>,
    Path(profile_id): Path<i32>,
) -> Result<Json<Vec<CvRow>>, AppError> {
    Ok(Json(list_cvs_for_profile(&state.db, profile_id).await?))
}

/// GET /cvs/:id/pdf
pub async fn handle_download_cv(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let (cv, bytes) = read_cv_pdf(&state.db, &state.store, id).await?;
    Ok(pdf_response(&cv, bytes))
}

/// DELETE /cvs/:id
pub async fn handle_delete_cv(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CvRow>, AppError> {
    Ok(Json(delete_cv(&state.db, &state.store, id).await?))
}

fn pdf_response(cv: &CvRow, bytes: Vec<u8>) -> Response {
    let filename = FsPath::new(&cv.pdf_path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("cv.pdf");

    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
            (HeaderName::from_static(CV_ID_HEADER), cv.id.to_string()),
        ],
        Bytes::from(bytes),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_pdf_response_headers() {
        let cv = CvRow {
            id: 9,
            profile_id: 2,
            job_description: "Rust".to_string(),
            pdf_path: "uploads/cvs/cv_2_1700000000000.pdf".to_string(),
            cv_data: serde_json::json!({}),
            created_at: Utc::now(),
        };

        let response = pdf_response(&cv, b"%PDF-1.3".to_vec());
        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"cv_2_1700000000000.pdf\""
        );
        assert_eq!(headers["x-cv-id"], "9");
    }
}
