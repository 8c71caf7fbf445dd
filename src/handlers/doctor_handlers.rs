use std::collections::HashMap;

use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::api::ApiClient;
use crate::auth::csrf;
use crate::auth::session::{require_role, set_flash};
use crate::config::AppConfig;
use crate::errors::{AppError, render, see_other};
use crate::models::booking::{self, BookingFilter, BookingStatus, StatusForm};
use crate::models::user::Role;
use crate::templates_structs::{BookingRow, DoctorAppointmentsTemplate, PageContext};

use super::{form_error, today};

pub async fn appointments(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let auth = require_role(&session, Role::Doctor)?;
    let ctx = PageContext::build(&session, &config, "/doctor/appointments")?;

    let filter = BookingFilter::from_params(&query);
    let bookings = booking::find_all(&api, &auth.token).await?;
    let rows = BookingRow::rows(filter.apply(bookings), today());

    let tmpl = DoctorAppointmentsTemplate {
        ctx,
        rows,
        filter,
        statuses: BookingStatus::ALL.to_vec(),
    };
    render(tmpl)
}

pub async fn update_status(
    api: web::Data<ApiClient>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<StatusForm>,
) -> Result<HttpResponse, AppError> {
    let auth = require_role(&session, Role::Doctor)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let id = path.into_inner();

    let Some(next) = BookingStatus::parse(&form.status) else {
        set_flash(&session, "Unknown appointment status");
        return Ok(see_other("/doctor/appointments"));
    };

    let existing = booking::find_by_id(&api, &auth.token, id).await?;
    if existing.doctor_id != auth.profile.id {
        return Err(AppError::NotFound);
    }
    if !existing.status.doctor_transitions().contains(&next) {
        set_flash(
            &session,
            &format!("A {} appointment cannot be marked {}", existing.status.as_str(), next.as_str()),
        );
        return Ok(see_other("/doctor/appointments"));
    }

    match booking::update_status(&api, &auth.token, id, next).await {
        Ok(()) => {
            log::info!("Doctor {} set booking #{id} to {}", auth.profile.id, next.as_str());
            set_flash(&session, &format!("Appointment marked {}", next.label().to_lowercase()));
        }
        Err(e) => set_flash(&session, &form_error(e)?),
    }
    Ok(see_other("/doctor/appointments"))
}
