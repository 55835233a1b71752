use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::UnclaimPolicy;
use crate::error::{QueueError, Result};
use crate::queue::job::{Job, JobStatus, JobType, Priority};
use crate::queue::ordering;

/// Direction for a manual reorder of the visible queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Manages the job collection and all job state transitions.
///
/// This is the one place where transitions are guarded: claiming is a
/// conditional update keyed on the job still being `Pending`, and the
/// reorder pair-write happens as a single mutation so a failure cannot
/// leave the two `display_order` values half-updated.
#[derive(Debug, Default)]
pub struct JobStore {
    jobs: HashMap<Uuid, Job>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_job(&mut self, job: Job) -> Uuid {
        let id = job.id;
        self.jobs.insert(id, job);
        id
    }

    pub fn get_job(&self, id: &Uuid) -> Option<&Job> {
        self.jobs.get(id)
    }

    pub fn remove_job(&mut self, id: &Uuid) -> Result<Job> {
        self.jobs.remove(id).ok_or(QueueError::JobNotFound(*id))
    }

    /// All jobs, newest first. Used by the progress view.
    pub fn all_jobs(&self) -> Vec<Job> {
        let mut jobs: Vec<Job> = self.jobs.values().cloned().collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        jobs
    }

    /// The visible queue for one job type, in display order. Completed jobs
    /// have left the queue.
    pub fn queue_for_type(&self, job_type: JobType) -> Vec<Job> {
        let mut jobs: Vec<Job> = self
            .jobs
            .values()
            .filter(|j| j.job_type == job_type && j.status != JobStatus::Completed)
            .cloned()
            .collect();
        ordering::sort_for_display(&mut jobs);
        jobs
    }

    /// Completed jobs of one type, most recently finished first.
    pub fn finished_for_type(&self, job_type: JobType) -> Vec<Job> {
        let mut jobs: Vec<Job> = self
            .jobs
            .values()
            .filter(|j| j.job_type == job_type && j.status == JobStatus::Completed)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.completed_at.cmp(&a.completed_at).then(a.id.cmp(&b.id)));
        jobs
    }

    /// Jobs claimed by one user that are not finished, oldest first.
    pub fn claimed_by(&self, user_id: Uuid) -> Vec<Job> {
        let mut jobs: Vec<Job> = self
            .jobs
            .values()
            .filter(|j| j.claimed_by == Some(user_id) && j.status != JobStatus::Completed)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        jobs
    }

    /// Count of jobs still moving through the queue.
    pub fn active_count(&self) -> usize {
        self.jobs
            .values()
            .filter(|j| matches!(j.status, JobStatus::Pending | JobStatus::InProgress))
            .count()
    }

    /// Count of jobs completed at or after `since`.
    pub fn completed_since(&self, since: DateTime<Utc>) -> usize {
        self.jobs
            .values()
            .filter(|j| j.status == JobStatus::Completed)
            .filter(|j| j.completed_at.is_some_and(|t| t >= since))
            .count()
    }

    /// Claim a pending job for `user_id`.
    ///
    /// Conditional update: the transition only applies if the job is still
    /// `Pending` at the moment of the mutation. A job that was claimed in
    /// the meantime fails with `ClaimConflict` and is left untouched.
    pub fn claim(&mut self, id: &Uuid, user_id: Uuid) -> Result<Job> {
        let job = self.jobs.get_mut(id).ok_or(QueueError::JobNotFound(*id))?;
        if job.status != JobStatus::Pending {
            return Err(QueueError::ClaimConflict(*id));
        }
        job.status = JobStatus::InProgress;
        job.claimed_by = Some(user_id);
        tracing::info!(job_id = %id, user_id = %user_id, "Job claimed");
        Ok(job.clone())
    }

    /// Release a job back to the queue, clearing the claimant.
    ///
    /// `policy` decides whether callers other than the claimant may do
    /// this. Completed jobs are never put back.
    pub fn unclaim(&mut self, id: &Uuid, caller: Uuid, policy: UnclaimPolicy) -> Result<Job> {
        let job = self.jobs.get_mut(id).ok_or(QueueError::JobNotFound(*id))?;
        if job.status == JobStatus::Completed {
            return Err(QueueError::Validation(
                "Finished jobs cannot be unclaimed".to_string(),
            ));
        }
        if policy == UnclaimPolicy::ClaimantOnly
            && job.claimed_by.is_some_and(|claimant| claimant != caller)
        {
            return Err(QueueError::Forbidden(
                "only the claimant can release this job".to_string(),
            ));
        }
        job.status = JobStatus::Pending;
        job.claimed_by = None;
        tracing::info!(job_id = %id, user_id = %caller, "Job unclaimed");
        Ok(job.clone())
    }

    /// Mark an in-progress job finished, attaching the completion photo.
    ///
    /// The image reference is required; without it the job is left
    /// untouched.
    pub fn complete(&mut self, id: &Uuid, image_url: &str, now: DateTime<Utc>) -> Result<Job> {
        if image_url.trim().is_empty() {
            return Err(QueueError::Validation(
                "A picture of the finished part is required".to_string(),
            ));
        }
        let job = self.jobs.get_mut(id).ok_or(QueueError::JobNotFound(*id))?;
        if job.status != JobStatus::InProgress {
            return Err(QueueError::Validation(format!(
                "Only a job in progress can be completed (currently {})",
                job.status
            )));
        }
        job.status = JobStatus::Completed;
        job.completed_at = Some(now);
        job.completion_image_url = Some(image_url.to_string());
        tracing::info!(job_id = %id, "Job completed");
        Ok(job.clone())
    }

    pub fn set_priority(&mut self, id: &Uuid, priority: Priority) -> Result<Job> {
        let job = self.jobs.get_mut(id).ok_or(QueueError::JobNotFound(*id))?;
        job.priority = priority;
        Ok(job.clone())
    }

    /// Put a job on hold or take it off hold. Claim/complete transitions go
    /// through their own guarded methods.
    pub fn set_hold(&mut self, id: &Uuid, on_hold: bool) -> Result<Job> {
        let job = self.jobs.get_mut(id).ok_or(QueueError::JobNotFound(*id))?;
        match (on_hold, job.status) {
            (true, JobStatus::Pending) => job.status = JobStatus::OnHold,
            (false, JobStatus::OnHold) => job.status = JobStatus::Pending,
            _ => {
                return Err(QueueError::Validation(format!(
                    "Cannot change hold state of a job that is {}",
                    job.status
                )))
            }
        }
        Ok(job.clone())
    }

    /// Swap a job with its neighbor in the currently visible display order
    /// of its type.
    ///
    /// Returns `false` (and changes nothing) when the job is already at the
    /// boundary. Both `display_order` writes are applied together; stale or
    /// duplicate values produced by concurrent edits are tolerated by the
    /// ordering fallback.
    pub fn move_in_queue(&mut self, id: &Uuid, direction: MoveDirection) -> Result<bool> {
        let job_type = self
            .jobs
            .get(id)
            .ok_or(QueueError::JobNotFound(*id))?
            .job_type;

        let visible = self.queue_for_type(job_type);
        let idx = visible
            .iter()
            .position(|j| j.id == *id)
            .ok_or(QueueError::JobNotFound(*id))?;

        let neighbor_idx = match direction {
            MoveDirection::Up if idx == 0 => return Ok(false),
            MoveDirection::Down if idx + 1 == visible.len() => return Ok(false),
            MoveDirection::Up => idx - 1,
            MoveDirection::Down => idx + 1,
        };
        let neighbor_id = visible[neighbor_idx].id;

        // Single mutation for the pair: both jobs were just looked up, so
        // these writes cannot half-apply.
        if let Some(job) = self.jobs.get_mut(id) {
            job.display_order = Some(neighbor_idx as i64);
        }
        if let Some(neighbor) = self.jobs.get_mut(&neighbor_id) {
            neighbor.display_order = Some(idx as i64);
        }
        tracing::debug!(job_id = %id, neighbor_id = %neighbor_id, ?direction, "Queue reordered");
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
