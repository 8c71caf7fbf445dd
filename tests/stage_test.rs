//! Stage resolution tests.
//!
//! Covers the documented example plans, the sentinel statuses, step-name
//! precedence, ordering of unsorted and tied steps, and the progress rounding.

mod common;

use ivfcare::models::treatment::{PlanProgress, TreatmentPlan, resolve};
use ivfcare::models::treatment::stage::{self, StageProgress};
use common::*;

fn ivf_steps() -> Vec<ivfcare::models::treatment::TreatmentStep> {
    steps(&[(1, "Khám ban đầu"), (2, "Kích trứng"), (3, "Chuyển phôi")])
}

// --- Example plans ---

#[test]
fn test_status_names_middle_step() {
    let got = resolve(&ivf_steps(), "Kích trứng");
    assert_eq!(
        got,
        StageProgress {
            progress: 67,
            current_stage: "Kích trứng".to_string(),
            next_stage: "Chuyển phôi".to_string(),
            total_steps: 3,
            completed_steps: 2,
        }
    );
}

#[test]
fn test_no_steps_echoes_status() {
    let got = resolve(&[], "in-progress");
    assert_eq!(
        got,
        StageProgress {
            progress: 0,
            current_stage: "in-progress".to_string(),
            next_stage: "undetermined".to_string(),
            total_steps: 0,
            completed_steps: 0,
        }
    );
}

#[test]
fn test_completed_sentinel() {
    let got = resolve(&steps(&[(1, "A"), (2, "B")]), "completed");
    assert_eq!(
        got,
        StageProgress {
            progress: 100,
            current_stage: "completed".to_string(),
            next_stage: "completed".to_string(),
            total_steps: 2,
            completed_steps: 2,
        }
    );
}

#[test]
fn test_pending_sentinel() {
    let got = resolve(&steps(&[(1, "A")]), "pending");
    assert_eq!(
        got,
        StageProgress {
            progress: 0,
            current_stage: "starting".to_string(),
            next_stage: "A".to_string(),
            total_steps: 1,
            completed_steps: 0,
        }
    );
}

// --- Empty plans ---

#[test]
fn test_no_steps_and_no_status() {
    let got = resolve(&[], "");
    assert_eq!(got.current_stage, stage::NOT_STARTED);
    assert_eq!(got.next_stage, stage::UNDETERMINED);
    assert_eq!(got.progress, 0);
}

#[test]
fn test_no_steps_any_status_is_zero() {
    for status in ["", "completed", "cancelled", "pending", "Kích trứng", "whatever"] {
        let got = resolve(&[], status);
        assert_eq!(got.total_steps, 0, "status {status:?}");
        assert_eq!(got.completed_steps, 0, "status {status:?}");
        assert_eq!(got.progress, 0, "status {status:?}");
    }
}

// --- Step matches ---

#[test]
fn test_each_step_match_counts_through_that_step() {
    let plan = ivf_steps();
    let expected = [33, 67, 100];
    for (i, s) in plan.iter().enumerate() {
        let got = resolve(&plan, &s.step_name);
        assert_eq!(got.completed_steps, i + 1);
        assert_eq!(got.progress, expected[i]);
        assert_eq!(got.current_stage, s.step_name);
    }
}

#[test]
fn test_last_step_next_is_completed() {
    let got = resolve(&ivf_steps(), "Chuyển phôi");
    assert_eq!(got.next_stage, stage::COMPLETED);
    assert_eq!(got.progress, 100);
    assert!(got.is_finished());
}

#[test]
fn test_step_match_ignores_case() {
    let got = resolve(&ivf_steps(), "KÍCH TRỨNG");
    assert_eq!(got.current_stage, "Kích trứng");
    assert_eq!(got.completed_steps, 2);
}

#[test]
fn test_step_name_beats_sentinel() {
    let plan = steps(&[(1, "Pending"), (2, "Completed"), (3, "Follow-up")]);

    let got = resolve(&plan, "completed");
    assert_eq!(got.current_stage, "Completed");
    assert_eq!(got.next_stage, "Follow-up");
    assert_eq!(got.completed_steps, 2);
    assert_eq!(got.progress, 67);

    let got = resolve(&plan, "pending");
    assert_eq!(got.current_stage, "Pending");
    assert_eq!(got.completed_steps, 1);
}

// --- Sentinels ---

#[test]
fn test_sentinels_ignore_case() {
    let plan = steps(&[(1, "A"), (2, "B")]);
    assert_eq!(resolve(&plan, "COMPLETED").progress, 100);
    assert_eq!(resolve(&plan, "Cancelled").next_stage, stage::NOT_APPLICABLE);
    assert_eq!(resolve(&plan, "Pending").current_stage, stage::STARTING);
}

#[test]
fn test_cancelled_sentinel() {
    let got = resolve(&ivf_steps(), "cancelled");
    assert_eq!(got.progress, 0);
    assert_eq!(got.completed_steps, 0);
    assert_eq!(got.current_stage, stage::CANCELLED);
    assert_eq!(got.next_stage, stage::NOT_APPLICABLE);
}

#[test]
fn test_in_progress_sentinel_is_on_first_step() {
    let got = resolve(&ivf_steps(), "in-progress");
    assert_eq!(got.current_stage, "Khám ban đầu");
    assert_eq!(got.next_stage, "Kích trứng");
    assert_eq!(got.completed_steps, 1);
    assert_eq!(got.progress, 33);
}

#[test]
fn test_in_progress_single_step_next_is_completed() {
    let got = resolve(&steps(&[(1, "A")]), "in-progress");
    assert_eq!(got.current_stage, "A");
    assert_eq!(got.next_stage, stage::COMPLETED);
    assert_eq!(got.progress, 100);
}

#[test]
fn test_empty_status_not_started() {
    let got = resolve(&ivf_steps(), "");
    assert_eq!(got.current_stage, stage::NOT_STARTED);
    assert_eq!(got.next_stage, "Khám ban đầu");
    assert_eq!(got.progress, 0);
}

#[test]
fn test_unknown_status_shown_verbatim() {
    let got = resolve(&ivf_steps(), "Chờ kết quả xét nghiệm");
    assert_eq!(got.current_stage, "Chờ kết quả xét nghiệm");
    assert_eq!(got.next_stage, "Khám ban đầu");
    assert_eq!(got.completed_steps, 0);
    assert_eq!(got.progress, 0);
}

#[test]
fn test_status_is_not_trimmed() {
    // A stray space means the status no longer names a step.
    let got = resolve(&ivf_steps(), "Kích trứng ");
    assert_eq!(got.current_stage, "Kích trứng ");
    assert_eq!(got.completed_steps, 0);
}

// --- Ordering ---

#[test]
fn test_unsorted_input_is_ordered_by_step_order() {
    let plan = steps(&[(3, "Chuyển phôi"), (1, "Khám ban đầu"), (2, "Kích trứng")]);
    let got = resolve(&plan, "Khám ban đầu");
    assert_eq!(got.completed_steps, 1);
    assert_eq!(got.next_stage, "Kích trứng");
    // Input untouched.
    assert_eq!(plan[0].step_name, "Chuyển phôi");
}

#[test]
fn test_equal_orders_keep_input_order() {
    let plan = steps(&[(2, "B1"), (1, "A"), (2, "B2"), (3, "C")]);
    let got = resolve(&plan, "B1");
    assert_eq!(got.completed_steps, 2);
    assert_eq!(got.next_stage, "B2");

    let got = resolve(&plan, "B2");
    assert_eq!(got.completed_steps, 3);
    assert_eq!(got.next_stage, "C");
}

#[test]
fn test_duplicate_names_first_match_wins() {
    let plan = steps(&[(1, "Siêu âm"), (2, "Kích trứng"), (3, "Siêu âm")]);
    let got = resolve(&plan, "siêu âm");
    assert_eq!(got.completed_steps, 1);
    assert_eq!(got.next_stage, "Kích trứng");
}

// --- Rounding ---

#[test]
fn test_progress_rounds_half_up() {
    let eight: Vec<_> = (1..=8).map(|i| step(i, &format!("S{i}"))).collect();
    assert_eq!(resolve(&eight, "S1").progress, 13);
    assert_eq!(resolve(&eight, "S3").progress, 38);
    assert_eq!(resolve(&eight, "S4").progress, 50);

    let three = steps(&[(1, "X"), (2, "Y"), (3, "Z")]);
    assert_eq!(resolve(&three, "X").progress, 33);
    assert_eq!(resolve(&three, "Y").progress, 67);
}

#[test]
fn test_resolve_is_pure() {
    let plan = ivf_steps();
    assert_eq!(resolve(&plan, "Kích trứng"), resolve(&plan, "Kích trứng"));
}

// --- PlanProgress ---

fn plan_with_status(status: &str) -> TreatmentPlan {
    serde_json::from_value(serde_json::json!({
        "id": 11,
        "patientId": PATIENT_ID,
        "doctorId": DOCTOR_ID,
        "startDate": "2026-09-01",
        "status": status,
    }))
    .expect("bad test plan")
}

#[test]
fn test_plan_progress_sorts_steps_and_resolves() {
    let plan = plan_with_status("Kích trứng");
    let p = PlanProgress::new(plan, steps(&[(3, "Chuyển phôi"), (1, "Khám ban đầu"), (2, "Kích trứng")]));
    let names: Vec<&str> = p.steps.iter().map(|s| s.step_name.as_str()).collect();
    assert_eq!(names, ["Khám ban đầu", "Kích trứng", "Chuyển phôi"]);
    assert_eq!(p.stage.completed_steps, 2);
}

#[test]
fn test_plan_status_options_list_steps_between_sentinels() {
    let p = PlanProgress::new(plan_with_status("pending"), steps(&[(1, "A"), (2, "B")]));
    assert_eq!(p.status_options(), ["pending", "in-progress", "A", "B", "completed", "cancelled"]);
}

#[test]
fn test_plan_missing_status_defaults_to_not_started() {
    let plan: TreatmentPlan = serde_json::from_value(serde_json::json!({
        "id": 12,
        "patientId": PATIENT_ID,
        "startDate": "2026-09-01",
    }))
    .expect("bad test plan");
    let p = PlanProgress::new(plan, steps(&[(1, "A")]));
    assert_eq!(p.stage.current_stage, stage::NOT_STARTED);
    assert!(p.plan.is_active());
}
