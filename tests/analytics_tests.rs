use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use planforge::models::Task;
use planforge::report::analytics::{
    self, ScheduleStatus, TaskCounts, project_completion, schedule_status, timeline,
};
use planforge::report::checklist::Checklist;

fn task(status: &str) -> Task {
    Task {
        id: Uuid::now_v7(),
        project_id: Uuid::now_v7(),
        title: "task".to_string(),
        description: String::new(),
        status: status.to_string(),
        completed: status == "completed",
        priority: "medium".to_string(),
        assigned_to: None,
        phase_name: String::new(),
        phase_order: 0,
        task_order: 0,
        estimated_duration: String::new(),
        deadline: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn jan(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
}

fn mid_january_timeline() -> analytics::Timeline {
    // Created Jan 1, due Jan 31, clock at Jan 16: halfway through.
    timeline(
        jan(1),
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        jan(16),
    )
}

#[test]
fn progress_is_zero_without_tasks_and_full_when_all_complete() {
    let empty = TaskCounts::from_merged(&[], &[]);
    assert_eq!(empty.progress_percentage(), 0.0);

    let done = TaskCounts::from_merged(&[task("completed"), task("completed")], &[]);
    assert_eq!(done.progress_percentage(), 100.0);
}

#[test]
fn merged_counts_classify_by_status_then_completed() {
    let db_tasks = [task("completed"), task("in_progress"), task("todo")];
    let checklist = Checklist::parse(r#"[{"title": "a", "completed": true}, {"title": "b"}]"#);

    let counts = TaskCounts::from_merged(&db_tasks, checklist.tasks());
    assert_eq!(counts.total, 5);
    assert_eq!(counts.completed, 2);
    assert_eq!(counts.in_progress, 1);
    assert_eq!(counts.todo, 2);
}

#[test]
fn override_list_replaces_status_counting() {
    let db_tasks = [task("in_progress"), task("in_progress")];
    let checklist = Checklist::parse(
        "___LOCAL_STORAGE_DATA___\
         [{\"title\": \"a\", \"completed\": true}, {\"title\": \"b\"}, {\"title\": \"c\"}]\
         ___END_LOCAL_STORAGE___",
    );

    let metrics = analytics::compute(
        &db_tasks,
        &checklist,
        jan(1),
        NaiveDate::from_ymd_opt(2024, 1, 31),
        jan(16),
    );
    // The persisted rows are ignored entirely.
    assert_eq!(metrics.counts.total, 3);
    assert_eq!(metrics.counts.completed, 1);
    assert_eq!(metrics.counts.in_progress, 0);
    assert_eq!(metrics.counts.todo, 2);
}

#[test]
fn halfway_timeline_expects_fifty_percent() {
    let t = mid_january_timeline();
    assert_eq!(t.days_elapsed, 15);
    assert_eq!(t.days_remaining, 15);
    assert_eq!(t.total_duration, 30);
    assert_eq!(t.overdue_days, 0);
    assert!((t.expected_progress - 50.0).abs() < 0.01);
}

#[test]
fn schedule_status_uses_ten_point_band() {
    let t = mid_january_timeline();
    assert_eq!(schedule_status(30.0, Some(&t)), ScheduleStatus::BehindSchedule);
    assert_eq!(schedule_status(70.0, Some(&t)), ScheduleStatus::AheadOfSchedule);
    assert_eq!(schedule_status(50.0, Some(&t)), ScheduleStatus::OnTrack);
    // The band edges read as on track.
    assert_eq!(schedule_status(40.0, Some(&t)), ScheduleStatus::OnTrack);
    assert_eq!(schedule_status(60.0, Some(&t)), ScheduleStatus::OnTrack);
}

#[test]
fn passed_deadline_is_overdue_unless_finished() {
    let deadline = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    let t = timeline(jan(1), deadline, jan(20));
    assert_eq!(t.days_remaining, 0);
    assert_eq!(t.overdue_days, 5);
    assert_eq!(schedule_status(80.0, Some(&t)), ScheduleStatus::Overdue);
    assert_eq!(schedule_status(100.0, Some(&t)), ScheduleStatus::Completed);
}

#[test]
fn missing_timeline_defaults_to_on_track() {
    assert_eq!(schedule_status(5.0, None), ScheduleStatus::OnTrack);
}

#[test]
fn projection_extrapolates_burn_rate() {
    let t = mid_january_timeline();

    // 25% done after half the time: 60 estimated days, 30 over the deadline.
    let slow = project_completion(25.0, &t).unwrap();
    assert_eq!(slow.additional_days, 30);

    // 75% done: 20 estimated days, 10 days early.
    let fast = project_completion(75.0, &t).unwrap();
    assert_eq!(fast.additional_days, -10);

    assert!(project_completion(0.0, &t).is_none());
}

#[test]
fn no_projection_after_deadline() {
    let t = timeline(jan(1), NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(), jan(20));
    assert!(project_completion(50.0, &t).is_none());
}

#[test]
fn insight_rules_fire_on_their_conditions() {
    // Scope risk: under 50% with under a third of the span left.
    let late = timeline(jan(1), NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(), jan(27));
    let counts = TaskCounts::from_merged(&[task("completed"), task("todo"), task("todo")], &[]);
    let insights = analytics::insights(&counts, 33.3, Some(&late));
    assert!(insights.iter().any(|i| i.contains("re-evaluating the scope")));

    // Near completion.
    let insights = analytics::insights(&counts, 95.0, Some(&mid_january_timeline()));
    assert!(insights.iter().any(|i| i.contains("nearing completion")));

    // WIP overload: more in progress than everything else combined.
    let wip = TaskCounts::from_merged(
        &[task("in_progress"), task("in_progress"), task("in_progress"), task("todo")],
        &[],
    );
    let insights = analytics::insights(&wip, 0.0, None);
    assert!(insights.iter().any(|i| i.contains("in progress simultaneously")));

    // No tasks at all.
    let empty = TaskCounts::from_merged(&[], &[]);
    let insights = analytics::insights(&empty, 0.0, None);
    assert!(insights.iter().any(|i| i.contains("No tasks have been created")));
}

#[test]
fn normalize_makes_status_and_completed_agree() {
    let mut t = task("completed");
    t.completed = false;
    t.normalize();
    assert!(t.completed);

    let mut t = task("todo");
    t.completed = true;
    t.normalize();
    assert_eq!(t.status, "completed");

    let mut t = task("in_progress");
    t.normalize();
    assert_eq!(t.status, "in_progress");
    assert!(!t.completed);
}
