use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Capability;
use crate::config::UnclaimPolicy;
use crate::error::{QueueError, Result};
use crate::http::{current_user, require, ApiState};
use crate::queue::{Job, JobDraft, JobStatus, JobType, MoveDirection, Priority};

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(rename = "type")]
    job_type: JobType,
    status: Option<JobStatus>,
}

/// The queue for one job type, in display order. Asking for `Completed`
/// returns the finished list instead (newest completion first).
pub async fn list_jobs(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Job>>> {
    current_user(&state, &headers).await?;

    let store = state.jobs.read().await;
    let jobs = match query.status {
        Some(JobStatus::Completed) => store.finished_for_type(query.job_type),
        Some(status) => store
            .queue_for_type(query.job_type)
            .into_iter()
            .filter(|j| j.status == status)
            .collect(),
        None => store.queue_for_type(query.job_type),
    };
    Ok(Json(jobs))
}

/// The caller's claimed, unfinished jobs, oldest first.
pub async fn my_jobs(
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Job>>> {
    let user = current_user(&state, &headers).await?;
    let jobs = state.jobs.read().await.claimed_by(user.id);
    Ok(Json(jobs))
}

#[derive(Deserialize)]
pub struct SubmitJobRequest {
    #[serde(rename = "type")]
    job_type: JobType,
    part_name: String,
    description: Option<String>,
    quantity: Option<u32>,
    material: Option<String>,
    priority: Option<Priority>,
    est_hours: Option<u32>,
    est_minutes: Option<u32>,
    g_code_url: Option<String>,
    drawing_url: Option<String>,
    /// Defaults to the submitting user's full name.
    requester: Option<String>,
}

pub async fn submit_job(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(req): Json<SubmitJobRequest>,
) -> Result<(StatusCode, Json<Job>)> {
    let user = current_user(&state, &headers).await?;
    require(&user, Capability::SubmitJob)?;

    if req.part_name.trim().is_empty() {
        return Err(QueueError::Validation(
            "Part name is required".to_string(),
        ));
    }

    let est_minutes = match (req.est_hours, req.est_minutes) {
        (None, None) => None,
        (h, m) => Some(h.unwrap_or(0) * 60 + m.unwrap_or(0)),
    };

    let draft = JobDraft {
        job_type: req.job_type,
        part_name: req.part_name.trim().to_string(),
        requester: req
            .requester
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| user.full_name.clone()),
        description: req.description,
        quantity: req.quantity.unwrap_or(1),
        material: req.material,
        priority: req.priority.unwrap_or(Priority::Medium),
        est_minutes,
        g_code_url: req.g_code_url,
        drawing_url: req.drawing_url,
    };

    let job = Job::new(draft);
    tracing::info!(job_id = %job.id, job_type = %job.job_type, part = %job.part_name, "Job submitted");
    state.jobs.write().await.add_job(job.clone());
    Ok((StatusCode::CREATED, Json(job)))
}

pub async fn claim_job(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Job>> {
    let user = current_user(&state, &headers).await?;
    require(&user, Capability::ClaimJob)?;

    let job = state.jobs.write().await.claim(&id, user.id)?;
    Ok(Json(job))
}

pub async fn unclaim_job(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Job>> {
    let user = current_user(&state, &headers).await?;
    require(&user, Capability::ClaimJob)?;

    // Admins can always release a job, whatever the configured policy.
    let policy = if user.role == crate::auth::Role::Admin {
        UnclaimPolicy::Anyone
    } else {
        state.config.unclaim_policy
    };
    let job = state.jobs.write().await.unclaim(&id, user.id, policy)?;
    Ok(Json(job))
}

#[derive(Deserialize)]
pub struct CompleteJobRequest {
    completion_image_url: String,
}

pub async fn complete_job(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<CompleteJobRequest>,
) -> Result<Json<Job>> {
    let user = current_user(&state, &headers).await?;
    require(&user, Capability::CompleteJob)?;

    let job = state
        .jobs
        .write()
        .await
        .complete(&id, &req.completion_image_url, Utc::now())?;
    Ok(Json(job))
}

#[derive(Serialize)]
pub struct MoveResponse {
    moved: bool,
}

pub async fn move_job_up(
    state: State<ApiState>,
    headers: HeaderMap,
    id: Path<Uuid>,
) -> Result<Json<MoveResponse>> {
    move_job(state, headers, id, MoveDirection::Up).await
}

pub async fn move_job_down(
    state: State<ApiState>,
    headers: HeaderMap,
    id: Path<Uuid>,
) -> Result<Json<MoveResponse>> {
    move_job(state, headers, id, MoveDirection::Down).await
}

async fn move_job(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    direction: MoveDirection,
) -> Result<Json<MoveResponse>> {
    let user = current_user(&state, &headers).await?;
    require(&user, Capability::ReorderQueue)?;

    let moved = state.jobs.write().await.move_in_queue(&id, direction)?;
    Ok(Json(MoveResponse { moved }))
}

#[derive(Deserialize)]
pub struct EditJobRequest {
    priority: Option<Priority>,
    on_hold: Option<bool>,
}

pub async fn edit_job(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<EditJobRequest>,
) -> Result<Json<Job>> {
    let user = current_user(&state, &headers).await?;
    require(&user, Capability::EditJob)?;

    let mut store = state.jobs.write().await;
    let mut job = store
        .get_job(&id)
        .cloned()
        .ok_or(QueueError::JobNotFound(id))?;
    if let Some(priority) = req.priority {
        job = store.set_priority(&id, priority)?;
    }
    if let Some(on_hold) = req.on_hold {
        job = store.set_hold(&id, on_hold)?;
    }
    Ok(Json(job))
}

pub async fn delete_job(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    let user = current_user(&state, &headers).await?;
    require(&user, Capability::DeleteJob)?;

    let job = state.jobs.write().await.remove_job(&id)?;
    tracing::info!(job_id = %id, part = %job.part_name, "Job deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Serialize)]
pub struct StatsResponse {
    active_jobs: usize,
    completed_today: usize,
}

pub async fn stats(
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> Result<Json<StatsResponse>> {
    current_user(&state, &headers).await?;

    let midnight = Utc::now()
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|t| t.and_utc())
        .unwrap_or_else(Utc::now);

    let store = state.jobs.read().await;
    Ok(Json(StatsResponse {
        active_jobs: store.active_count(),
        completed_today: store.completed_since(midnight),
    }))
}

#[derive(Serialize)]
pub struct ProgressEntry {
    #[serde(flatten)]
    job: Job,
    claimed_by_name: Option<String>,
}

/// Every job, newest first, with claimants resolved to display names.
pub async fn progress(
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ProgressEntry>>> {
    current_user(&state, &headers).await?;

    let names = state.directory.read().await.display_names();
    let jobs = state.jobs.read().await.all_jobs();
    let entries = jobs
        .into_iter()
        .map(|job| {
            let claimed_by_name = job.claimed_by.map(|id| {
                names
                    .get(&id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown User".to_string())
            });
            ProgressEntry {
                job,
                claimed_by_name,
            }
        })
        .collect();
    Ok(Json(entries))
}
