use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    #[serde(rename = "On Hold")]
    OnHold,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "Pending"),
            JobStatus::InProgress => write!(f, "In Progress"),
            JobStatus::Completed => write!(f, "Completed"),
            JobStatus::OnHold => write!(f, "On Hold"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobType {
    #[serde(rename = "CAM")]
    Cam,
    Machining,
}

impl std::fmt::Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobType::Cam => write!(f, "CAM"),
            JobType::Machining => write!(f, "Machining"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Urgent,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Ordinal used as a sort key: Urgent sorts before Low.
    pub fn rank(self) -> u8 {
        match self {
            Priority::Urgent => 0,
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Urgent => write!(f, "Urgent"),
            Priority::High => write!(f, "High"),
            Priority::Medium => write!(f, "Medium"),
            Priority::Low => write!(f, "Low"),
        }
    }
}

/// A part request tracked through the queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub part_name: String,
    pub requester: String,
    pub description: Option<String>,
    pub quantity: u32,
    pub material: Option<String>,
    pub status: JobStatus,
    pub priority: Priority,
    /// Explicit manual rank; overrides priority-based ordering when set.
    pub display_order: Option<i64>,
    pub claimed_by: Option<Uuid>,
    pub est_minutes: Option<u32>,
    pub g_code_url: Option<String>,
    pub drawing_url: Option<String>,
    pub completion_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Fields supplied by the submission form; everything else starts at its
/// queue-entry default (Pending, unclaimed, no explicit order).
#[derive(Debug, Clone)]
pub struct JobDraft {
    pub job_type: JobType,
    pub part_name: String,
    pub requester: String,
    pub description: Option<String>,
    pub quantity: u32,
    pub material: Option<String>,
    pub priority: Priority,
    pub est_minutes: Option<u32>,
    pub g_code_url: Option<String>,
    pub drawing_url: Option<String>,
}

impl Job {
    pub fn new(draft: JobDraft) -> Self {
        Self::with_id(Uuid::new_v4(), draft, Utc::now())
    }

    pub fn with_id(id: Uuid, draft: JobDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            job_type: draft.job_type,
            part_name: draft.part_name,
            requester: draft.requester,
            description: draft.description,
            quantity: draft.quantity,
            material: draft.material,
            status: JobStatus::Pending,
            priority: draft.priority,
            display_order: None,
            claimed_by: None,
            est_minutes: draft.est_minutes,
            g_code_url: draft.g_code_url,
            drawing_url: draft.drawing_url,
            completion_image_url: None,
            created_at,
            completed_at: None,
        }
    }

    /// "2h 30m" style estimate for display, if one was given.
    pub fn est_time(&self) -> Option<String> {
        self.est_minutes
            .map(|m| format!("{}h {}m", m / 60, m % 60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> JobDraft {
        JobDraft {
            job_type: JobType::Machining,
            part_name: "Intake Plate v2".to_string(),
            requester: "Dana".to_string(),
            description: None,
            quantity: 1,
            material: Some("6061".to_string()),
            priority: Priority::Medium,
            est_minutes: Some(150),
            g_code_url: None,
            drawing_url: None,
        }
    }

    #[test]
    fn new_job_enters_queue_unclaimed() {
        let job = Job::new(draft());
        assert_eq!(job.status, JobStatus::Pending);
        assert!(job.claimed_by.is_none());
        assert!(job.display_order.is_none());
        assert!(job.completed_at.is_none());
    }

    #[test]
    fn est_time_formats_hours_and_minutes() {
        let job = Job::new(draft());
        assert_eq!(job.est_time().as_deref(), Some("2h 30m"));

        let mut d = draft();
        d.est_minutes = None;
        assert!(Job::new(d).est_time().is_none());
    }

    #[test]
    fn status_serializes_by_display_name() {
        let s = serde_json::to_string(&JobStatus::InProgress).unwrap();
        assert_eq!(s, "\"In Progress\"");
        let s = serde_json::to_string(&JobType::Cam).unwrap();
        assert_eq!(s, "\"CAM\"");
    }

    #[test]
    fn priority_ranks_are_ordered() {
        assert!(Priority::Urgent.rank() < Priority::High.rank());
        assert!(Priority::High.rank() < Priority::Medium.rank());
        assert!(Priority::Medium.rank() < Priority::Low.rank());
    }
}
