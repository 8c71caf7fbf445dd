use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::api::ApiClient;
use crate::auth::session::{require_role, set_flash};
use crate::auth::{csrf, validate};
use crate::config::AppConfig;
use crate::errors::{AppError, render, see_other};
use crate::models::booking::{self, Booking, BookingStatus};
use crate::models::examination::{self, ExaminationForm, NewExamination};
use crate::models::user::Role;
use crate::templates_structs::{ExaminationFormTemplate, PageContext, PatientExaminationsTemplate};

use super::form_error;

const TEXT_LIMIT: usize = 2000;

/// Validate an examination form for the given booking.
pub fn validate_examination(form: &ExaminationForm, booking_id: i64) -> Result<NewExamination, Vec<String>> {
    let mut errors: Vec<String> = vec![];
    errors.extend(validate::validate_required(&form.diagnosis, "Diagnosis", TEXT_LIMIT));
    errors.extend(validate::validate_optional(&form.result, "Result", TEXT_LIMIT));
    errors.extend(validate::validate_optional(&form.note, "Note", TEXT_LIMIT));
    if !errors.is_empty() {
        return Err(errors);
    }

    let optional = |s: &str| {
        let t = s.trim();
        (!t.is_empty()).then(|| t.to_string())
    };
    Ok(NewExamination {
        booking_id,
        diagnosis: form.diagnosis.trim().to_string(),
        result: optional(&form.result),
        note: optional(&form.note),
    })
}

/// The doctor's own, non-cancelled booking.
async fn examinable_booking(api: &ApiClient, token: &str, doctor_id: i64, id: i64) -> Result<Booking, AppError> {
    let found = booking::find_by_id(api, token, id).await?;
    if found.doctor_id != doctor_id {
        return Err(AppError::NotFound);
    }
    if found.status == BookingStatus::Cancelled {
        return Err(AppError::PermissionDenied("Booking was cancelled".to_string()));
    }
    Ok(found)
}

pub async fn form(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let auth = require_role(&session, Role::Doctor)?;
    let id = path.into_inner();
    let found = examinable_booking(&api, &auth.token, auth.profile.id, id).await?;
    let existing = examination::find_by_booking(&api, &auth.token, id).await?;

    let ctx = PageContext::build(&session, &config, "/doctor/appointments")?;
    let tmpl = ExaminationFormTemplate {
        ctx,
        booking: found,
        existing,
        errors: vec![],
        diagnosis: String::new(),
        result: String::new(),
        note: String::new(),
    };
    render(tmpl)
}

pub async fn submit(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<ExaminationForm>,
) -> Result<HttpResponse, AppError> {
    let auth = require_role(&session, Role::Doctor)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let id = path.into_inner();
    let found = examinable_booking(&api, &auth.token, auth.profile.id, id).await?;

    let errors = match validate_examination(&form, id) {
        Ok(new) => match examination::create(&api, &auth.token, &new).await {
            Ok(saved) => {
                log::info!("Doctor {} recorded examination #{} for booking #{id}", auth.profile.id, saved.id);
                set_flash(&session, "Examination saved");
                return Ok(see_other(&format!("/doctor/appointments/{id}/examination")));
            }
            Err(e) => vec![form_error(e)?],
        },
        Err(errors) => errors,
    };

    let existing = examination::find_by_booking(&api, &auth.token, id).await?;
    let ctx = PageContext::build(&session, &config, "/doctor/appointments")?;
    let tmpl = ExaminationFormTemplate {
        ctx,
        booking: found,
        existing,
        errors,
        diagnosis: form.diagnosis.clone(),
        result: form.result.clone(),
        note: form.note.clone(),
    };
    render(tmpl)
}

pub async fn patient_list(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let auth = require_role(&session, Role::Patient)?;
    let ctx = PageContext::build(&session, &config, "/patient/examinations")?;
    let exams = examination::find_all(&api, &auth.token).await?;
    render(PatientExaminationsTemplate { ctx, exams })
}
