use futures::future::try_join_all;
use reqwest::Method;

use crate::api::{ApiClient, ApiError};

use super::types::{NewPlan, PlanProgress, PlanStatusUpdate, StepInput, TreatmentPlan, TreatmentStep};

/// Plans visible to the caller (own plans for patients, authored plans for doctors).
pub async fn find_plans(api: &ApiClient, token: &str) -> Result<Vec<TreatmentPlan>, ApiError> {
    api.get("/treatment-plans", Some(token)).await
}

pub async fn find_plan(api: &ApiClient, token: &str, plan_id: i64) -> Result<TreatmentPlan, ApiError> {
    api.get(&format!("/treatment-plans/{plan_id}"), Some(token)).await
}

pub async fn find_steps(api: &ApiClient, token: &str, plan_id: i64) -> Result<Vec<TreatmentStep>, ApiError> {
    api.get(&format!("/treatment-plans/{plan_id}/steps"), Some(token)).await
}

pub async fn create_plan(api: &ApiClient, token: &str, new: &NewPlan) -> Result<TreatmentPlan, ApiError> {
    api.post("/treatment-plans", Some(token), new).await
}

pub async fn update_status(api: &ApiClient, token: &str, plan_id: i64, status: &str) -> Result<(), ApiError> {
    api.send(
        Method::PUT,
        &format!("/treatment-plans/{plan_id}/status"),
        Some(token),
        Some(&PlanStatusUpdate { status }),
    )
    .await
}

pub async fn add_step(api: &ApiClient, token: &str, plan_id: i64, step: &StepInput) -> Result<TreatmentStep, ApiError> {
    api.post(&format!("/treatment-plans/{plan_id}/steps"), Some(token), step).await
}

pub async fn update_step(api: &ApiClient, token: &str, step_id: i64, step: &StepInput) -> Result<TreatmentStep, ApiError> {
    api.put(&format!("/treatment-steps/{step_id}"), Some(token), step).await
}

/// One plan with its steps and resolved stage.
pub async fn load_progress(api: &ApiClient, token: &str, plan: TreatmentPlan) -> Result<PlanProgress, ApiError> {
    let steps = find_steps(api, token, plan.id).await?;
    Ok(PlanProgress::new(plan, steps))
}

/// Fetch steps for every plan concurrently; each plan is resolved as soon as
/// its own steps arrive. Output keeps the input order.
pub async fn load_all_progress(api: &ApiClient, token: &str, plans: Vec<TreatmentPlan>) -> Result<Vec<PlanProgress>, ApiError> {
    try_join_all(plans.into_iter().map(|plan| load_progress(api, token, plan))).await
}
