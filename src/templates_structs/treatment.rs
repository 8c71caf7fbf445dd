use askama::Template;

use crate::models::service::Service;
use crate::models::treatment::{PlanProgress, StageProgress, TreatmentPlan, TreatmentStep};

use super::PageContext;

pub struct StepRow {
    pub step: TreatmentStep,
    pub done: bool,
}

pub struct StatusOption {
    pub value: String,
    pub selected: bool,
}

/// Everything a plan panel shows: the plan, its resolved stage, and its steps
/// marked done/pending.
pub struct PlanCard {
    pub plan: TreatmentPlan,
    pub stage: StageProgress,
    pub steps: Vec<StepRow>,
    pub status_options: Vec<StatusOption>,
}

impl From<PlanProgress> for PlanCard {
    fn from(p: PlanProgress) -> Self {
        // Same case folding as the stage resolver.
        let current = p.plan.status.to_lowercase();
        let status_options = p
            .status_options()
            .into_iter()
            .map(|value| StatusOption {
                selected: value.to_lowercase() == current,
                value,
            })
            .collect();
        let completed = p.stage.completed_steps;
        let steps = p
            .steps
            .into_iter()
            .enumerate()
            .map(|(i, step)| StepRow { step, done: i < completed })
            .collect();
        PlanCard {
            plan: p.plan,
            stage: p.stage,
            steps,
            status_options,
        }
    }
}

/// A patient a doctor can open a plan for, derived from their appointments.
pub struct PatientOption {
    pub id: i64,
    pub name: String,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "treatment/patient_list.html")]
pub struct PatientTreatmentsTemplate {
    pub ctx: PageContext,
    pub plans: Vec<PlanCard>,
}

#[derive(Template)]
#[template(path = "treatment/doctor_list.html")]
pub struct DoctorPlansTemplate {
    pub ctx: PageContext,
    pub plans: Vec<PlanCard>,
}

#[derive(Template)]
#[template(path = "treatment/doctor_detail.html")]
pub struct DoctorPlanDetailTemplate {
    pub ctx: PageContext,
    pub card: PlanCard,
    pub errors: Vec<String>,
    pub step_order: String,
    pub step_name: String,
    pub description: String,
}

#[derive(Template)]
#[template(path = "treatment/plan_form.html")]
pub struct PlanFormTemplate {
    pub ctx: PageContext,
    pub errors: Vec<String>,
    pub patients: Vec<PatientOption>,
    pub services: Vec<Service>,
    pub service_id: i64,
    pub start_date: String,
    pub status: String,
    pub notes: String,
}
