use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::http::{current_user, ApiState};

#[derive(Deserialize)]
pub struct UploadQuery {
    /// Original filename; only its extension is kept.
    filename: Option<String>,
}

#[derive(Serialize)]
pub struct UploadResponse {
    url: String,
}

/// Accept a binary upload under a category and hand back its public URL.
/// The caller attaches the URL to a job in a follow-up request.
pub async fn upload(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(category): Path<String>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Result<(StatusCode, Json<UploadResponse>)> {
    current_user(&state, &headers).await?;

    let filename = query.filename.unwrap_or_default();
    let url = state.attachments.save(&category, &filename, &body).await?;
    Ok((StatusCode::CREATED, Json(UploadResponse { url })))
}
