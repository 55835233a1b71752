use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{Capability, Profile, Role};
use crate::error::Result;
use crate::http::{current_user, require, ApiState};

/// All accounts, newest first. Admin panel listing.
pub async fn list_users(
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Profile>>> {
    let user = current_user(&state, &headers).await?;
    require(&user, Capability::ManageUsers)?;

    Ok(Json(state.directory.read().await.list()))
}

#[derive(Deserialize)]
pub struct ApprovalRequest {
    approved: bool,
}

pub async fn set_approval(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<ApprovalRequest>,
) -> Result<Json<Profile>> {
    let user = current_user(&state, &headers).await?;
    require(&user, Capability::ManageUsers)?;

    let profile = state
        .directory
        .write()
        .await
        .set_approval(&id, req.approved)?;
    Ok(Json(profile))
}

#[derive(Deserialize)]
pub struct RoleRequest {
    role: Role,
}

pub async fn set_role(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<RoleRequest>,
) -> Result<Json<Profile>> {
    let user = current_user(&state, &headers).await?;
    require(&user, Capability::ManageUsers)?;

    let profile = state.directory.write().await.set_role(&id, req.role)?;
    Ok(Json(profile))
}
