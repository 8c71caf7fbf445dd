use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::stage::{self, StageProgress};

/// One named, ordered stage of a treatment plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentStep {
    #[serde(default)]
    pub id: Option<i64>,
    pub step_order: i32,
    pub step_name: String,
    #[serde(default)]
    pub description: String,
}

impl TreatmentStep {
    pub fn new(step_order: i32, step_name: &str) -> Self {
        Self {
            id: None,
            step_order,
            step_name: step_name.to_string(),
            description: String::new(),
        }
    }

    pub fn id_or_zero(&self) -> i64 {
        self.id.unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentPlan {
    pub id: i64,
    pub patient_id: i64,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub doctor_id: Option<i64>,
    #[serde(default)]
    pub doctor_name: Option<String>,
    #[serde(default)]
    pub service_name: Option<String>,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Free text: a step name or one of the sentinels in `stage`.
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl TreatmentPlan {
    /// Neither completed nor cancelled.
    pub fn is_active(&self) -> bool {
        let s = self.status.trim().to_lowercase();
        s != stage::COMPLETED && s != stage::CANCELLED
    }

    pub fn patient_label(&self) -> &str {
        self.patient_name.as_deref().unwrap_or("—")
    }

    pub fn doctor_label(&self) -> &str {
        self.doctor_name.as_deref().unwrap_or("—")
    }

    pub fn service_label(&self) -> &str {
        self.service_name.as_deref().unwrap_or("—")
    }

    pub fn notes_text(&self) -> &str {
        self.notes.as_deref().unwrap_or("")
    }

    pub fn start_label(&self) -> String {
        self.start_date.format("%d/%m/%Y").to_string()
    }

    pub fn end_label(&self) -> String {
        self.end_date
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_default()
    }
}

/// A plan together with its steps (sorted) and resolved stage.
#[derive(Debug, Clone)]
pub struct PlanProgress {
    pub plan: TreatmentPlan,
    pub steps: Vec<TreatmentStep>,
    pub stage: StageProgress,
}

impl PlanProgress {
    pub fn new(plan: TreatmentPlan, mut steps: Vec<TreatmentStep>) -> Self {
        let stage = stage::resolve(&steps, &plan.status);
        steps.sort_by_key(|s| s.step_order);
        Self { plan, steps, stage }
    }

    /// Values offered in the doctor's status dropdown: sentinels, then steps.
    pub fn status_options(&self) -> Vec<String> {
        let mut options: Vec<String> = [stage::PENDING, stage::IN_PROGRESS]
            .iter()
            .map(|s| s.to_string())
            .collect();
        options.extend(self.steps.iter().map(|s| s.step_name.clone()));
        options.push(stage::COMPLETED.to_string());
        options.push(stage::CANCELLED.to_string());
        options
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlan {
    pub patient_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<i64>,
    pub start_date: NaiveDate,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepInput {
    pub step_order: i32,
    pub step_name: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct PlanStatusUpdate<'a> {
    pub status: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct PlanForm {
    #[serde(default)]
    pub patient_id: String,
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub notes: String,
    pub csrf_token: String,
}

#[derive(Debug, Deserialize)]
pub struct StepForm {
    #[serde(default)]
    pub step_order: String,
    #[serde(default)]
    pub step_name: String,
    #[serde(default)]
    pub description: String,
    pub csrf_token: String,
}

#[derive(Debug, Deserialize)]
pub struct PlanStatusForm {
    pub status: String,
    pub csrf_token: String,
}
