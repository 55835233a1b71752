use std::cmp::Ordering;

use crate::queue::job::Job;

/// Compare two jobs for display.
///
/// Manually ranked jobs (non-null `display_order`) come first, ascending by
/// rank; anything without a rank sorts after everything that has one.
/// Equal or missing ranks fall back to priority (Urgent first), then newest
/// `created_at`, then id so the order is a pure function of the job set.
pub fn display_cmp(a: &Job, b: &Job) -> Ordering {
    match (a.display_order, b.display_order) {
        (Some(x), Some(y)) if x != y => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        // Both unranked, or duplicate ranks: degrade to priority ordering.
        _ => a
            .priority
            .rank()
            .cmp(&b.priority.rank())
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| a.id.cmp(&b.id)),
    }
}

/// Sort a job set into its display order.
pub fn sort_for_display(jobs: &mut [Job]) {
    jobs.sort_by(display_cmp);
}
