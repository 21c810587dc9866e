//! Pure progress and timeline metrics backing the PDF report. No I/O here:
//! callers pass the persisted tasks, the parsed checklist, and the clock.

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::task::{STATUS_COMPLETED, STATUS_IN_PROGRESS, Task};
use crate::report::checklist::{Checklist, ChecklistTask};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub todo: usize,
}

impl TaskCounts {
    /// Counts from a client-state override list. Override tasks carry only a
    /// completion flag, so nothing is ever counted as in-progress.
    pub fn from_override(tasks: &[ChecklistTask]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();
        TaskCounts {
            total,
            completed,
            in_progress: 0,
            todo: total - completed,
        }
    }

    /// Counts over the persisted rows merged with checklist-derived tasks.
    /// Persisted rows classify by status; checklist tasks only know done or
    /// not done.
    pub fn from_merged(db_tasks: &[Task], checklist_tasks: &[ChecklistTask]) -> Self {
        let mut counts = TaskCounts {
            total: db_tasks.len() + checklist_tasks.len(),
            ..Default::default()
        };
        for task in db_tasks {
            match task.status.as_str() {
                STATUS_COMPLETED => counts.completed += 1,
                STATUS_IN_PROGRESS => counts.in_progress += 1,
                _ => counts.todo += 1,
            }
        }
        for task in checklist_tasks {
            if task.completed {
                counts.completed += 1;
            } else {
                counts.todo += 1;
            }
        }
        counts
    }

    /// Completion percentage, zero for an empty project.
    pub fn progress_percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64 * 100.0
        }
    }

    /// Share of the total for one bucket, zero for an empty project.
    pub fn share(&self, bucket: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            bucket as f64 / self.total as f64 * 100.0
        }
    }
}

/// Derived only when both a creation timestamp and a deadline exist.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timeline {
    pub days_elapsed: i64,
    /// Clamped at zero once the deadline passes.
    pub days_remaining: i64,
    /// Days the deadline has been missed by; zero while it is still ahead.
    pub overdue_days: i64,
    pub total_duration: i64,
    /// Where completion "should" be if work burned down linearly.
    pub expected_progress: f64,
}

pub fn timeline(created_at: DateTime<Utc>, deadline: NaiveDate, now: DateTime<Utc>) -> Timeline {
    let deadline_dt = deadline
        .and_hms_opt(0, 0, 0)
        .expect("midnight is always valid")
        .and_utc();

    let days_elapsed = (now - created_at).num_days().max(0);
    let raw_remaining = (deadline_dt - now).num_days();
    let total_duration = (deadline_dt - created_at).num_days().max(1);

    Timeline {
        days_elapsed,
        days_remaining: raw_remaining.max(0),
        overdue_days: (-raw_remaining).max(0),
        total_duration,
        expected_progress: days_elapsed as f64 / total_duration as f64 * 100.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleStatus {
    OnTrack,
    BehindSchedule,
    AheadOfSchedule,
    Overdue,
    Completed,
}

impl ScheduleStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ScheduleStatus::OnTrack => "On Track",
            ScheduleStatus::BehindSchedule => "Behind Schedule",
            ScheduleStatus::AheadOfSchedule => "Ahead of Schedule",
            ScheduleStatus::Overdue => "Overdue",
            ScheduleStatus::Completed => "Completed",
        }
    }
}

/// Classify schedule health. A 10-point band around expected progress reads
/// as on track; behind/ahead are only meaningful while the deadline is still
/// ahead, after which the project is either overdue or done. Without a
/// timeline the default is on track.
pub fn schedule_status(progress: f64, timeline: Option<&Timeline>) -> ScheduleStatus {
    let Some(t) = timeline else {
        return ScheduleStatus::OnTrack;
    };
    if t.days_remaining > 0 {
        if progress < t.expected_progress - 10.0 {
            ScheduleStatus::BehindSchedule
        } else if progress > t.expected_progress + 10.0 {
            ScheduleStatus::AheadOfSchedule
        } else {
            ScheduleStatus::OnTrack
        }
    } else if progress < 100.0 {
        ScheduleStatus::Overdue
    } else {
        ScheduleStatus::Completed
    }
}

/// Days beyond (positive) or before (negative) the deadline the project is
/// projected to finish, extrapolating the burn rate so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionProjection {
    pub additional_days: i64,
}

/// `additional_days` stays signed instead of being clamped at zero: a
/// negative value is a projected early finish with its real margin.
pub fn project_completion(progress: f64, t: &Timeline) -> Option<CompletionProjection> {
    if t.days_remaining <= 0 || progress <= 0.0 {
        return None;
    }
    let total_estimated = t.days_elapsed as f64 * (100.0 / progress);
    Some(CompletionProjection {
        additional_days: (total_estimated - t.days_elapsed as f64 - t.days_remaining as f64)
            as i64,
    })
}

pub fn insights(
    counts: &TaskCounts,
    progress: f64,
    timeline: Option<&Timeline>,
) -> Vec<&'static str> {
    let mut out = Vec::new();

    if progress < 50.0
        && timeline.is_some_and(|t| {
            t.days_remaining > 0
                && (t.days_remaining as f64) < (t.days_elapsed + t.days_remaining) as f64 / 3.0
        })
    {
        out.push(
            "The project is less than 50% complete with less than a third of the timeline \
             remaining. Consider re-evaluating the scope or allocating additional resources.",
        );
    }

    if progress > 90.0 {
        out.push(
            "The project is nearing completion. Focus on final quality checks and documentation.",
        );
    }

    if counts.in_progress > counts.completed + counts.todo {
        out.push(
            "There are a large number of tasks in progress simultaneously. Consider focusing on \
             completing some in-progress tasks before starting new ones.",
        );
    }

    if counts.total == 0 {
        out.push(
            "No tasks have been created. Breaking down the project into specific tasks improves \
             tracking and accountability.",
        );
    }

    out
}

/// Everything the report renderer needs, computed in one place.
#[derive(Debug, Clone)]
pub struct ReportMetrics {
    pub counts: TaskCounts,
    pub progress: f64,
    pub timeline: Option<Timeline>,
    pub status: ScheduleStatus,
    pub projection: Option<CompletionProjection>,
    pub insights: Vec<&'static str>,
}

pub fn compute(
    db_tasks: &[Task],
    checklist: &Checklist,
    created_at: DateTime<Utc>,
    deadline: Option<NaiveDate>,
    now: DateTime<Utc>,
) -> ReportMetrics {
    let counts = match checklist.override_tasks() {
        Some(tasks) => TaskCounts::from_override(tasks),
        None => TaskCounts::from_merged(db_tasks, checklist.tasks()),
    };
    let progress = counts.progress_percentage();
    let timeline = deadline.map(|d| timeline(created_at, d, now));
    let status = schedule_status(progress, timeline.as_ref());
    let projection = timeline
        .as_ref()
        .and_then(|t| project_completion(progress, t));
    let insights = insights(&counts, progress, timeline.as_ref());

    ReportMetrics {
        counts,
        progress,
        timeline,
        status,
        projection,
        insights,
    }
}
