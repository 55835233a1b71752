use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

use shopqueue::queue::job::{Job, JobDraft, JobType, Priority};
use shopqueue::queue::ordering::sort_for_display;

fn job(priority: Priority, minutes_after_epoch: i64) -> Job {
    let draft = JobDraft {
        job_type: JobType::Machining,
        part_name: "part".to_string(),
        requester: "req".to_string(),
        description: None,
        quantity: 1,
        material: None,
        priority,
        est_minutes: None,
        g_code_url: None,
        drawing_url: None,
    };
    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    Job::with_id(
        Uuid::new_v4(),
        draft,
        t0 + Duration::minutes(minutes_after_epoch),
    )
}

#[test]
fn sorting_is_deterministic_and_idempotent() {
    let mut jobs = vec![
        job(Priority::Low, 0),
        job(Priority::Urgent, 5),
        job(Priority::Medium, 3),
        job(Priority::Urgent, 1),
    ];
    sort_for_display(&mut jobs);
    let first_pass: Vec<Uuid> = jobs.iter().map(|j| j.id).collect();

    sort_for_display(&mut jobs);
    let second_pass: Vec<Uuid> = jobs.iter().map(|j| j.id).collect();
    assert_eq!(first_pass, second_pass);

    // Same set in a different input order lands in the same sequence.
    jobs.reverse();
    sort_for_display(&mut jobs);
    let third_pass: Vec<Uuid> = jobs.iter().map(|j| j.id).collect();
    assert_eq!(first_pass, third_pass);
}

#[test]
fn explicit_order_beats_priority() {
    let mut ranked_low = job(Priority::Low, 0);
    ranked_low.display_order = Some(0);
    let mut ranked_medium = job(Priority::Medium, 1);
    ranked_medium.display_order = Some(1);
    let unranked_urgent = job(Priority::Urgent, 2);

    let ids = (ranked_low.id, ranked_medium.id, unranked_urgent.id);
    let mut jobs = vec![unranked_urgent, ranked_medium, ranked_low];
    sort_for_display(&mut jobs);

    assert_eq!(jobs[0].id, ids.0);
    assert_eq!(jobs[1].id, ids.1);
    assert_eq!(jobs[2].id, ids.2);
}

#[test]
fn priority_then_newest_first() {
    let urgent_old = job(Priority::Urgent, 0);
    let urgent_new = job(Priority::Urgent, 10);
    let high = job(Priority::High, 20);
    let low = job(Priority::Low, 30);

    let mut jobs = vec![low.clone(), urgent_old.clone(), high.clone(), urgent_new.clone()];
    sort_for_display(&mut jobs);

    assert_eq!(jobs[0].id, urgent_new.id);
    assert_eq!(jobs[1].id, urgent_old.id);
    assert_eq!(jobs[2].id, high.id);
    assert_eq!(jobs[3].id, low.id);
}

#[test]
fn urgent_newcomer_overtakes_old_low_priority_job() {
    let low_old = job(Priority::Low, 0);
    let urgent_new = job(Priority::Urgent, 1);

    let mut jobs = vec![low_old.clone(), urgent_new.clone()];
    sort_for_display(&mut jobs);

    assert_eq!(jobs[0].id, urgent_new.id);
    assert_eq!(jobs[1].id, low_old.id);
}

#[test]
fn duplicate_explicit_ranks_fall_back_to_priority() {
    let mut dup_low = job(Priority::Low, 0);
    dup_low.display_order = Some(3);
    let mut dup_urgent = job(Priority::Urgent, 0);
    dup_urgent.display_order = Some(3);
    let mut ranked_first = job(Priority::Low, 0);
    ranked_first.display_order = Some(1);

    let mut jobs = vec![dup_low.clone(), dup_urgent.clone(), ranked_first.clone()];
    sort_for_display(&mut jobs);

    assert_eq!(jobs[0].id, ranked_first.id);
    // Among the duplicates, priority decides.
    assert_eq!(jobs[1].id, dup_urgent.id);
    assert_eq!(jobs[2].id, dup_low.id);
}

#[test]
fn unranked_jobs_sort_after_all_ranked_jobs() {
    let mut ranked = job(Priority::Low, 0);
    ranked.display_order = Some(50);
    let unranked = job(Priority::Urgent, 100);

    let mut jobs = vec![unranked.clone(), ranked.clone()];
    sort_for_display(&mut jobs);

    assert_eq!(jobs[0].id, ranked.id);
    assert_eq!(jobs[1].id, unranked.id);
}
