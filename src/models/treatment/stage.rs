//! Stage resolution for treatment plans.
//!
//! A plan carries an ordered list of named steps and a free-text status. The
//! status is either the name of the step the patient is on, or one of the
//! sentinels `completed`, `cancelled`, `in-progress`, `pending`, or something
//! else entirely (which is then shown as-is). [`resolve`] turns that pair into
//! what the treatment pages display: where the patient is, what comes next,
//! and how far along they are.
//!
//! Step names win over sentinels: a plan that has a step literally called
//! "Completed" resolves to that step, not to the sentinel.

use serde::Serialize;

use super::types::TreatmentStep;

pub const NOT_STARTED: &str = "not started";
pub const UNDETERMINED: &str = "undetermined";
pub const COMPLETED: &str = "completed";
pub const CANCELLED: &str = "cancelled";
pub const IN_PROGRESS: &str = "in-progress";
pub const PENDING: &str = "pending";
pub const STARTING: &str = "starting";
pub const NOT_APPLICABLE: &str = "not applicable";

/// Where a plan stands, derived from its steps and status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageProgress {
    /// 0..=100.
    pub progress: u8,
    pub current_stage: String,
    pub next_stage: String,
    pub total_steps: usize,
    pub completed_steps: usize,
}

impl StageProgress {
    pub fn is_finished(&self) -> bool {
        self.total_steps > 0 && self.completed_steps == self.total_steps
    }
}

/// Percentage rounded half-up, computed in integers so ties are exact.
pub fn percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total);
    ((completed * 200 + total) / (total * 2)) as u8
}

/// Resolve the current and next stage of a plan.
///
/// `steps` need not be sorted; a sorted copy is used. Equal `step_order`
/// values keep their input order. Never fails.
pub fn resolve(steps: &[TreatmentStep], status: &str) -> StageProgress {
    if steps.is_empty() {
        let current = if status.is_empty() { NOT_STARTED } else { status };
        return StageProgress {
            progress: 0,
            current_stage: current.to_string(),
            next_stage: UNDETERMINED.to_string(),
            total_steps: 0,
            completed_steps: 0,
        };
    }

    let mut ordered: Vec<&TreatmentStep> = steps.iter().collect();
    ordered.sort_by_key(|s| s.step_order);

    let total = ordered.len();
    let name_at = |i: usize| ordered[i].step_name.clone();
    let after = |i: usize| {
        if i + 1 < total {
            name_at(i + 1)
        } else {
            COMPLETED.to_string()
        }
    };

    let (completed, current, next) = if status.is_empty() {
        (0, NOT_STARTED.to_string(), name_at(0))
    } else if let Some(i) = ordered
        .iter()
        .position(|s| s.step_name.to_lowercase() == status.to_lowercase())
    {
        (i + 1, name_at(i), after(i))
    } else {
        match status.to_lowercase().as_str() {
            COMPLETED => (total, COMPLETED.to_string(), COMPLETED.to_string()),
            CANCELLED => (0, CANCELLED.to_string(), NOT_APPLICABLE.to_string()),
            IN_PROGRESS => (1, name_at(0), after(0)),
            PENDING => (0, STARTING.to_string(), name_at(0)),
            _ => (0, status.to_string(), name_at(0)),
        }
    };

    StageProgress {
        progress: percent(completed, total),
        current_stage: current,
        next_stage: next,
        total_steps: total,
        completed_steps: completed,
    }
}
