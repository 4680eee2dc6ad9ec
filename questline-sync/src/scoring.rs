//! Completion state machine — when to score a destination task up or down.
//!
//! Scoring is the mutation that actually awards or retracts points, so it
//! must fire exactly when the completion state transitions, not on every
//! update. Recurring tasks have one extra rule: advancing the due date past
//! the stored one counts as checking the task off, even when the explicit
//! completed flag did not change.

use chrono::{DateTime, Utc};
use serde::Serialize;

use questline_core::types::{DestinationReference, DestinationTask, TaskKind};

/// Direction of a score mutation: `Up` marks complete, `Down` incomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreDirection {
    Up,
    Down,
}

impl ScoreDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            ScoreDirection::Up => "up",
            ScoreDirection::Down => "down",
        }
    }
}

impl std::fmt::Display for ScoreDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the completion state transitioned since the last sync.
///
/// True when the computed flag differs from a recorded one, or when the flag
/// is newly true and no flag was ever recorded (the task was completed
/// before it was first synced).
pub fn needs_scoring(new_completed: bool, recorded: Option<bool>) -> bool {
    match recorded {
        Some(previous) => new_completed != previous,
        None => new_completed,
    }
}

/// Decide the score mutation for `task` against what the destination last
/// recorded, adjusting the task body in the process.
///
/// `Up` stamps the completion timestamp; `Down` clears it. A recurring task
/// whose new due date is at or past the recorded one is forced complete
/// before the direction is chosen. Returns `None` when no scoring is needed
/// (in particular for attribute-only or label-only changes).
pub fn plan_score(
    task: &mut DestinationTask,
    recorded: &DestinationReference,
    now: DateTime<Utc>,
) -> Option<ScoreDirection> {
    if !needs_scoring(task.completed, recorded.completed) {
        return None;
    }

    if task.kind == TaskKind::Recurring {
        if let (Some(due), Some(recorded_due)) = (task.date, recorded.due_date) {
            // The user "checked off" the recurring task by advancing its date.
            if due >= recorded_due {
                task.completed = true;
            }
        }
    }

    if task.completed {
        task.completed_at = Some(now);
        Some(ScoreDirection::Up)
    } else {
        task.completed_at = None;
        Some(ScoreDirection::Down)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn task(kind: TaskKind, completed: bool, date: Option<DateTime<Utc>>) -> DestinationTask {
        DestinationTask {
            text: "Walk the dog".to_string(),
            kind,
            repeat: None,
            completed,
            date,
            completed_at: completed.then(|| Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()),
            attribute: None,
        }
    }

    fn reference(kind: TaskKind, completed: Option<bool>, due_date: Option<DateTime<Utc>>) -> DestinationReference {
        DestinationReference {
            id: None,
            kind,
            completed,
            due_date,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn scoring_fires_only_on_transitions() {
        assert!(needs_scoring(true, Some(false)));
        assert!(needs_scoring(false, Some(true)));
        assert!(!needs_scoring(true, Some(true)));
        assert!(!needs_scoring(false, Some(false)));
        // Completed before any flag was recorded.
        assert!(needs_scoring(true, None));
        assert!(!needs_scoring(false, None));
    }

    #[test]
    fn newly_completed_scores_up_and_stamps_timestamp() {
        let mut body = task(TaskKind::Single, true, None);
        body.completed_at = None;
        let direction = plan_score(&mut body, &reference(TaskKind::Single, None, None), now());
        assert_eq!(direction, Some(ScoreDirection::Up));
        assert_eq!(body.completed_at, Some(now()));
    }

    #[test]
    fn unchecking_scores_down_and_clears_timestamp() {
        let mut body = task(TaskKind::Single, false, None);
        body.completed_at = Some(now());
        let direction = plan_score(&mut body, &reference(TaskKind::Single, Some(true), None), now());
        assert_eq!(direction, Some(ScoreDirection::Down));
        assert_eq!(body.completed_at, None);
    }

    #[test]
    fn unchanged_completion_is_not_scored() {
        let mut body = task(TaskKind::Single, true, None);
        let direction = plan_score(&mut body, &reference(TaskKind::Single, Some(true), None), now());
        assert_eq!(direction, None);
    }

    #[test]
    fn advanced_due_date_forces_recurring_task_complete() {
        let stored_due = now();
        let advanced = stored_due + Duration::days(1);
        // Flag flipped back to incomplete, but the date moved forward.
        let mut body = task(TaskKind::Recurring, false, Some(advanced));
        let direction = plan_score(
            &mut body,
            &reference(TaskKind::Recurring, Some(true), Some(stored_due)),
            now(),
        );
        assert_eq!(direction, Some(ScoreDirection::Up));
        assert!(body.completed, "date advancement forces completion");
        assert_eq!(body.completed_at, Some(now()));
    }

    #[test]
    fn equal_due_date_also_forces_completion() {
        let due = now();
        let mut body = task(TaskKind::Recurring, false, Some(due));
        let direction = plan_score(
            &mut body,
            &reference(TaskKind::Recurring, Some(true), Some(due)),
            now(),
        );
        assert_eq!(direction, Some(ScoreDirection::Up));
        assert!(body.completed);
    }

    #[test]
    fn regressed_due_date_scores_down_normally() {
        let stored_due = now();
        let earlier = stored_due - Duration::days(3);
        let mut body = task(TaskKind::Recurring, false, Some(earlier));
        let direction = plan_score(
            &mut body,
            &reference(TaskKind::Recurring, Some(true), Some(stored_due)),
            now(),
        );
        assert_eq!(direction, Some(ScoreDirection::Down));
        assert!(!body.completed);
    }

    #[test]
    fn missing_dates_skip_the_advancement_rule() {
        let mut body = task(TaskKind::Recurring, false, None);
        let direction = plan_score(
            &mut body,
            &reference(TaskKind::Recurring, Some(true), Some(now())),
            now(),
        );
        assert_eq!(direction, Some(ScoreDirection::Down));
    }

    #[test]
    fn single_tasks_ignore_due_date_advancement() {
        let stored_due = now();
        let advanced = stored_due + Duration::days(1);
        let mut body = task(TaskKind::Single, false, Some(advanced));
        let direction = plan_score(
            &mut body,
            &reference(TaskKind::Single, Some(true), Some(stored_due)),
            now(),
        );
        assert_eq!(direction, Some(ScoreDirection::Down));
        assert!(!body.completed);
    }
}
