mod auth;
mod files;
mod jobs;
mod users;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde::Serialize;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use uuid::Uuid;

use crate::auth::{Capability, Directory, Profile, SessionStore};
use crate::config::AppConfig;
use crate::error::{QueueError, Result};
use crate::queue::JobStore;
use crate::storage::AttachmentStore;

/// Shared state behind every handler.
#[derive(Clone)]
pub struct ApiState {
    pub config: AppConfig,
    pub jobs: Arc<RwLock<JobStore>>,
    pub directory: Arc<RwLock<Directory>>,
    pub sessions: Arc<RwLock<SessionStore>>,
    pub attachments: AttachmentStore,
}

impl ApiState {
    pub fn new(config: AppConfig) -> Self {
        let attachments = AttachmentStore::new(&config.storage);
        let sessions = SessionStore::new(config.session_ttl_hours);
        Self {
            config,
            jobs: Arc::new(RwLock::new(JobStore::new())),
            directory: Arc::new(RwLock::new(Directory::new())),
            sessions: Arc::new(RwLock::new(sessions)),
            attachments,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for QueueError {
    fn into_response(self) -> Response {
        let status = match &self {
            QueueError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            QueueError::ClaimConflict(_) => StatusCode::CONFLICT,
            QueueError::JobNotFound(_) | QueueError::UserNotFound(_) => StatusCode::NOT_FOUND,
            QueueError::Unauthorized | QueueError::BadCredentials => StatusCode::UNAUTHORIZED,
            QueueError::Forbidden(_) => StatusCode::FORBIDDEN,
            QueueError::Store(_) | QueueError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Resolve the caller from the `Authorization: Bearer <token>` header.
pub(crate) async fn current_user(state: &ApiState, headers: &HeaderMap) -> Result<Profile> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
        .ok_or(QueueError::Unauthorized)?;

    let user_id = state
        .sessions
        .write()
        .await
        .resolve(&token)
        .ok_or(QueueError::Unauthorized)?;

    state
        .directory
        .read()
        .await
        .get(&user_id)
        .cloned()
        .ok_or(QueueError::Unauthorized)
}

/// The single capability gate every mutating handler goes through.
pub(crate) fn require(profile: &Profile, cap: Capability) -> Result<()> {
    if !profile.is_approved {
        return Err(QueueError::Forbidden(
            "account is awaiting approval".to_string(),
        ));
    }
    if !profile.role.allows(cap) {
        return Err(QueueError::Forbidden(format!(
            "role {} cannot do this",
            profile.role
        )));
    }
    Ok(())
}

pub fn router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/password", post(auth::update_password))
        .route("/api/jobs", get(jobs::list_jobs).post(jobs::submit_job))
        .route("/api/jobs/mine", get(jobs::my_jobs))
        .route("/api/jobs/:id/claim", post(jobs::claim_job))
        .route("/api/jobs/:id/unclaim", post(jobs::unclaim_job))
        .route("/api/jobs/:id/complete", post(jobs::complete_job))
        .route("/api/jobs/:id/move-up", post(jobs::move_job_up))
        .route("/api/jobs/:id/move-down", post(jobs::move_job_down))
        .route("/api/jobs/:id", patch(jobs::edit_job).delete(jobs::delete_job))
        .route("/api/stats", get(jobs::stats))
        .route("/api/progress", get(jobs::progress))
        .route("/api/users", get(users::list_users))
        .route("/api/users/:id/approval", post(users::set_approval))
        .route("/api/users/:id/role", post(users::set_role))
        .route("/api/files/:category", post(files::upload))
        .nest_service("/files", ServeDir::new(state.attachments.root()))
        .layer(DefaultBodyLimit::max(state.config.storage.max_upload_bytes))
        .layer(cors)
        .with_state(state)
}
