use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{password, Profile};
use crate::error::{QueueError, Result};
use crate::http::{current_user, ApiState};

#[derive(Deserialize)]
pub struct SignupRequest {
    email: String,
    password: String,
    full_name: String,
}

pub async fn signup(
    State(state): State<ApiState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<Profile>)> {
    password::validate(&req.password)?;
    if req.full_name.trim().is_empty() {
        return Err(QueueError::Validation(
            "Full name is required".to_string(),
        ));
    }

    let hash = password::hash(&req.password).await?;
    let profile = state
        .directory
        .write()
        .await
        .create_user(&req.email, &req.full_name, hash)?;
    Ok((StatusCode::CREATED, Json(profile)))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    token: Uuid,
    user: Profile,
}

pub async fn login(
    State(state): State<ApiState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let profile = state
        .directory
        .read()
        .await
        .find_by_email(&req.email)
        .cloned()
        .ok_or(QueueError::BadCredentials)?;

    if !password::verify(&req.password, &profile.password_hash).await? {
        return Err(QueueError::BadCredentials);
    }

    let token = state.sessions.write().await.issue(profile.id);
    tracing::info!(user_id = %profile.id, "User signed in");
    Ok(Json(LoginResponse {
        token,
        user: profile,
    }))
}

pub async fn logout(State(state): State<ApiState>, headers: HeaderMap) -> Result<StatusCode> {
    // Resolve first so an already-dead token still returns cleanly.
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .and_then(|v| Uuid::parse_str(v.trim()).ok());
    if let Some(token) = token {
        state.sessions.write().await.revoke(&token);
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn me(State(state): State<ApiState>, headers: HeaderMap) -> Result<Json<Profile>> {
    let profile = current_user(&state, &headers).await?;
    Ok(Json(profile))
}

#[derive(Deserialize)]
pub struct UpdatePasswordRequest {
    password: String,
    confirm: String,
}

pub async fn update_password(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(req): Json<UpdatePasswordRequest>,
) -> Result<StatusCode> {
    let user = current_user(&state, &headers).await?;

    if req.password != req.confirm {
        return Err(QueueError::Validation(
            "Passwords don't match".to_string(),
        ));
    }
    password::validate(&req.password)?;

    let hash = password::hash(&req.password).await?;
    state
        .directory
        .write()
        .await
        .set_password_hash(&user.id, hash)?;
    tracing::info!(user_id = %user.id, "Password updated");
    Ok(StatusCode::NO_CONTENT)
}
