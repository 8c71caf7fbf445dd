use std::collections::BTreeMap;

use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::api::ApiClient;
use crate::auth::session::{require_role, set_flash};
use crate::auth::{csrf, validate};
use crate::config::AppConfig;
use crate::errors::{AppError, render, see_other};
use crate::models::booking::{self, Booking};
use crate::models::service;
use crate::models::treatment::{
    self, NewPlan, PlanForm, PlanStatusForm, StepForm, StepInput, TreatmentPlan,
};
use crate::models::user::Role;
use crate::templates_structs::{
    DoctorPlanDetailTemplate, DoctorPlansTemplate, PageContext, PatientOption, PatientTreatmentsTemplate, PlanCard,
    PlanFormTemplate,
};

use super::{form_error, parse_or_collect};

/// Validate a new-plan form.
pub fn validate_plan(form: &PlanForm) -> Result<NewPlan, Vec<String>> {
    let mut errors: Vec<String> = vec![];
    let patient_id = parse_or_collect(validate::parse_id(&form.patient_id, "Patient"), &mut errors);
    let start_date = parse_or_collect(validate::parse_date(&form.start_date, "Start date"), &mut errors);
    errors.extend(validate::validate_required(&form.status, "Status", 200));
    errors.extend(validate::validate_optional(&form.notes, "Notes", 2000));

    // An empty service select means "no particular service".
    let service_id = if form.service_id.trim().is_empty() {
        None
    } else {
        parse_or_collect(validate::parse_id(&form.service_id, "Service"), &mut errors)
    };

    match (patient_id, start_date) {
        (Some(patient_id), Some(start_date)) if errors.is_empty() => {
            let notes = form.notes.trim();
            Ok(NewPlan {
                patient_id,
                service_id,
                start_date,
                status: form.status.trim().to_string(),
                notes: (!notes.is_empty()).then(|| notes.to_string()),
            })
        }
        _ => Err(errors),
    }
}

/// Validate an add/edit step form.
pub fn validate_step(form: &StepForm) -> Result<StepInput, Vec<String>> {
    let mut errors: Vec<String> = vec![];
    let step_order = parse_or_collect(validate::parse_step_order(&form.step_order), &mut errors);
    errors.extend(validate::validate_required(&form.step_name, "Step name", 200));
    errors.extend(validate::validate_optional(&form.description, "Description", 1000));

    match step_order {
        Some(step_order) if errors.is_empty() => Ok(StepInput {
            step_order,
            step_name: form.step_name.trim().to_string(),
            description: form.description.trim().to_string(),
        }),
        _ => Err(errors),
    }
}

/// Distinct patients among a doctor's bookings, by name.
pub fn patients_of(bookings: &[Booking], selected: i64) -> Vec<PatientOption> {
    let mut seen: BTreeMap<i64, String> = BTreeMap::new();
    for b in bookings {
        seen.entry(b.patient_id).or_insert_with(|| b.patient_label().to_string());
    }
    let mut options: Vec<PatientOption> = seen
        .into_iter()
        .map(|(id, name)| PatientOption { id, name, selected: id == selected })
        .collect();
    options.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    options
}

/// A plan authored by this doctor, or 404.
async fn own_plan(api: &ApiClient, token: &str, doctor_id: i64, plan_id: i64) -> Result<TreatmentPlan, AppError> {
    let plan = treatment::find_plan(api, token, plan_id).await?;
    match plan.doctor_id {
        Some(id) if id != doctor_id => Err(AppError::NotFound),
        _ => Ok(plan),
    }
}

pub async fn patient_list(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let auth = require_role(&session, Role::Patient)?;
    let ctx = PageContext::build(&session, &config, "/patient/treatments")?;
    let plans = treatment::find_plans(&api, &auth.token).await?;
    let progress = treatment::load_all_progress(&api, &auth.token, plans).await?;
    let tmpl = PatientTreatmentsTemplate {
        ctx,
        plans: progress.into_iter().map(PlanCard::from).collect(),
    };
    render(tmpl)
}

pub async fn doctor_list(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let auth = require_role(&session, Role::Doctor)?;
    let ctx = PageContext::build(&session, &config, "/doctor/treatments")?;
    let plans = treatment::find_plans(&api, &auth.token).await?;
    let progress = treatment::load_all_progress(&api, &auth.token, plans).await?;
    let tmpl = DoctorPlansTemplate {
        ctx,
        plans: progress.into_iter().map(PlanCard::from).collect(),
    };
    render(tmpl)
}

async fn plan_form_page(
    api: &ApiClient,
    token: &str,
    ctx: PageContext,
    form: Option<&PlanForm>,
    errors: Vec<String>,
) -> Result<HttpResponse, AppError> {
    let (bookings, services) = futures::try_join!(booking::find_all(api, token), service::find_services(api, token))?;
    let selected = form.and_then(|f| f.patient_id.trim().parse().ok()).unwrap_or(0);
    let tmpl = PlanFormTemplate {
        ctx,
        errors,
        patients: patients_of(&bookings, selected),
        services,
        service_id: form.and_then(|f| f.service_id.trim().parse().ok()).unwrap_or(0),
        start_date: form
            .map(|f| f.start_date.clone())
            .unwrap_or_else(|| super::today().format("%Y-%m-%d").to_string()),
        status: form.map(|f| f.status.clone()).unwrap_or_else(|| treatment::stage::PENDING.to_string()),
        notes: form.map(|f| f.notes.clone()).unwrap_or_default(),
    };
    render(tmpl)
}

pub async fn new_form(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let auth = require_role(&session, Role::Doctor)?;
    let ctx = PageContext::build(&session, &config, "/doctor/treatments")?;
    plan_form_page(&api, &auth.token, ctx, None, vec![]).await
}

pub async fn create(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    form: web::Form<PlanForm>,
) -> Result<HttpResponse, AppError> {
    let auth = require_role(&session, Role::Doctor)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let errors = match validate_plan(&form) {
        Ok(new) => match treatment::create_plan(&api, &auth.token, &new).await {
            Ok(plan) => {
                log::info!("Doctor {} opened plan #{} for patient {}", auth.profile.id, plan.id, plan.patient_id);
                set_flash(&session, "Treatment plan created. Add its steps below.");
                return Ok(see_other(&format!("/doctor/treatments/{}", plan.id)));
            }
            Err(e) => vec![form_error(e)?],
        },
        Err(errors) => errors,
    };

    let ctx = PageContext::build(&session, &config, "/doctor/treatments")?;
    plan_form_page(&api, &auth.token, ctx, Some(&*form), errors).await
}

async fn detail_page(
    api: &ApiClient,
    token: &str,
    ctx: PageContext,
    plan: TreatmentPlan,
    draft: Option<&StepForm>,
    errors: Vec<String>,
) -> Result<HttpResponse, AppError> {
    let progress = treatment::load_progress(api, token, plan).await?;
    let next_order = progress.steps.iter().map(|s| s.step_order).max().unwrap_or(0) + 1;
    let tmpl = DoctorPlanDetailTemplate {
        ctx,
        card: PlanCard::from(progress),
        errors,
        step_order: draft.map(|d| d.step_order.clone()).unwrap_or_else(|| next_order.to_string()),
        step_name: draft.map(|d| d.step_name.clone()).unwrap_or_default(),
        description: draft.map(|d| d.description.clone()).unwrap_or_default(),
    };
    render(tmpl)
}

pub async fn detail(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let auth = require_role(&session, Role::Doctor)?;
    let plan = own_plan(&api, &auth.token, auth.profile.id, path.into_inner()).await?;
    let ctx = PageContext::build(&session, &config, "/doctor/treatments")?;
    detail_page(&api, &auth.token, ctx, plan, None, vec![]).await
}

pub async fn update_status(
    api: web::Data<ApiClient>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<PlanStatusForm>,
) -> Result<HttpResponse, AppError> {
    let auth = require_role(&session, Role::Doctor)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let plan = own_plan(&api, &auth.token, auth.profile.id, path.into_inner()).await?;
    let back = format!("/doctor/treatments/{}", plan.id);

    if let Some(e) = validate::validate_required(&form.status, "Status", 200) {
        set_flash(&session, &e);
        return Ok(see_other(&back));
    }

    match treatment::update_status(&api, &auth.token, plan.id, form.status.trim()).await {
        Ok(()) => {
            log::info!("Plan #{} status set to {:?}", plan.id, form.status.trim());
            set_flash(&session, "Plan status updated");
        }
        Err(e) => set_flash(&session, &form_error(e)?),
    }
    Ok(see_other(&back))
}

pub async fn add_step(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<StepForm>,
) -> Result<HttpResponse, AppError> {
    let auth = require_role(&session, Role::Doctor)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let plan = own_plan(&api, &auth.token, auth.profile.id, path.into_inner()).await?;

    let errors = match validate_step(&form) {
        Ok(step) => match treatment::add_step(&api, &auth.token, plan.id, &step).await {
            Ok(_) => {
                set_flash(&session, "Step added");
                return Ok(see_other(&format!("/doctor/treatments/{}", plan.id)));
            }
            Err(e) => vec![form_error(e)?],
        },
        Err(errors) => errors,
    };

    let ctx = PageContext::build(&session, &config, "/doctor/treatments")?;
    detail_page(&api, &auth.token, ctx, plan, Some(&*form), errors).await
}

pub async fn update_step(
    api: web::Data<ApiClient>,
    session: Session,
    path: web::Path<(i64, i64)>,
    form: web::Form<StepForm>,
) -> Result<HttpResponse, AppError> {
    let auth = require_role(&session, Role::Doctor)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let (plan_id, step_id) = path.into_inner();
    let plan = own_plan(&api, &auth.token, auth.profile.id, plan_id).await?;
    let back = format!("/doctor/treatments/{}", plan.id);

    // Steps that came back without an id cannot be addressed.
    if step_id <= 0 {
        return Err(AppError::NotFound);
    }
    let steps = treatment::find_steps(&api, &auth.token, plan.id).await?;
    if !steps.iter().any(|s| s.id == Some(step_id)) {
        return Err(AppError::NotFound);
    }

    match validate_step(&form) {
        Ok(step) => match treatment::update_step(&api, &auth.token, step_id, &step).await {
            Ok(_) => set_flash(&session, "Step updated"),
            Err(e) => set_flash(&session, &form_error(e)?),
        },
        Err(errors) => set_flash(&session, &errors.join(". ")),
    }
    Ok(see_other(&back))
}
