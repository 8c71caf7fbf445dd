use std::collections::HashMap;

use actix_session::Session;
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::api::ApiClient;
use crate::auth::session::{require_role, set_flash};
use crate::auth::{csrf, validate};
use crate::config::AppConfig;
use crate::errors::{AppError, render, see_other};
use crate::models::booking::{
    self, Booking, BookingFilter, BookingForm, BookingStatus, NewBooking, Reschedule, RescheduleForm,
};
use crate::models::service;
use crate::models::user::Role;
use crate::templates_structs::{BookingFormTemplate, BookingRow, PageContext, PatientBookingsTemplate, RescheduleTemplate};

use super::auth_handlers::CsrfOnly;
use super::{form_error, parse_or_collect, today};

/// Query string of the booking form while the patient narrows down a slot.
#[derive(Debug, Default, Deserialize)]
pub struct SlotQuery {
    #[serde(default)]
    pub doctor_id: Option<i64>,
    #[serde(default)]
    pub service_id: Option<i64>,
    #[serde(default)]
    pub date: Option<String>,
}

/// What the booking form should show again after a failed submit.
struct Draft {
    doctor_id: i64,
    service_id: i64,
    date: String,
    slot: String,
    note: String,
}

/// Validate a new-booking form. Returns the request body or all messages.
pub fn validate_booking(form: &BookingForm, today: NaiveDate) -> Result<NewBooking, Vec<String>> {
    let mut errors: Vec<String> = vec![];

    let doctor_id = parse_or_collect(validate::parse_id(&form.doctor_id, "Doctor"), &mut errors);
    let service_id = parse_or_collect(validate::parse_id(&form.service_id, "Service"), &mut errors);
    let date = parse_or_collect(validate::parse_future_date(&form.date, "Date", today), &mut errors);
    errors.extend(validate::validate_slot(&form.slot));
    errors.extend(validate::validate_optional(&form.note, "Note", 1000));

    match (doctor_id, service_id, date) {
        (Some(doctor_id), Some(service_id), Some(date)) if errors.is_empty() => {
            let note = form.note.trim();
            Ok(NewBooking {
                doctor_id,
                service_id,
                date,
                slot: form.slot.trim().to_string(),
                note: (!note.is_empty()).then(|| note.to_string()),
            })
        }
        _ => Err(errors),
    }
}

/// Validate a reschedule form against the same date and slot rules.
pub fn validate_reschedule(form: &RescheduleForm, today: NaiveDate) -> Result<Reschedule, Vec<String>> {
    let mut errors: Vec<String> = vec![];
    let date = parse_or_collect(validate::parse_future_date(&form.date, "Date", today), &mut errors);
    errors.extend(validate::validate_slot(&form.slot));
    match date {
        Some(date) if errors.is_empty() => Ok(Reschedule { date, slot: form.slot.trim().to_string() }),
        _ => Err(errors),
    }
}

/// Slots are only worth asking for once a doctor and a usable date are known.
fn slot_date(doctor_id: i64, date: &str, today: NaiveDate) -> Option<NaiveDate> {
    if doctor_id <= 0 {
        return None;
    }
    validate::parse_future_date(date, "Date", today).ok()
}

async fn booking_form_page(
    api: &ApiClient,
    token: &str,
    ctx: PageContext,
    draft: Draft,
    errors: Vec<String>,
) -> Result<HttpResponse, AppError> {
    let today = today();
    let (services, doctors) = futures::try_join!(service::find_services(api, token), service::find_doctors(api, token))?;
    let slots = match slot_date(draft.doctor_id, &draft.date, today) {
        Some(date) => service::find_slots(api, token, draft.doctor_id, date).await?,
        None => vec![],
    };
    let tmpl = BookingFormTemplate {
        ctx,
        errors,
        services,
        doctors,
        slots,
        doctor_id: draft.doctor_id,
        service_id: draft.service_id,
        date: draft.date,
        slot: draft.slot,
        note: draft.note,
        min_date: today.format("%Y-%m-%d").to_string(),
    };
    render(tmpl)
}

/// A booking owned by the current patient, or 404.
async fn own_booking(api: &ApiClient, token: &str, patient_id: i64, id: i64) -> Result<Booking, AppError> {
    let booking = booking::find_by_id(api, token, id).await?;
    if booking.patient_id != patient_id {
        return Err(AppError::NotFound);
    }
    Ok(booking)
}

pub async fn list(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let auth = require_role(&session, Role::Patient)?;
    let ctx = PageContext::build(&session, &config, "/patient/bookings")?;

    let filter = BookingFilter::from_params(&query);
    let bookings = booking::find_all(&api, &auth.token).await?;
    let rows = BookingRow::rows(filter.apply(bookings), today());

    let tmpl = PatientBookingsTemplate {
        ctx,
        rows,
        filter,
        statuses: BookingStatus::ALL.to_vec(),
    };
    render(tmpl)
}

pub async fn new_form(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    query: web::Query<SlotQuery>,
) -> Result<HttpResponse, AppError> {
    let auth = require_role(&session, Role::Patient)?;
    let ctx = PageContext::build(&session, &config, "/patient/bookings/new")?;
    let query = query.into_inner();
    let draft = Draft {
        doctor_id: query.doctor_id.unwrap_or(0),
        service_id: query.service_id.unwrap_or(0),
        date: query.date.unwrap_or_default(),
        slot: String::new(),
        note: String::new(),
    };
    booking_form_page(&api, &auth.token, ctx, draft, vec![]).await
}

pub async fn create(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    form: web::Form<BookingForm>,
) -> Result<HttpResponse, AppError> {
    let auth = require_role(&session, Role::Patient)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let errors = match validate_booking(&form, today()) {
        Ok(new) => match booking::create(&api, &auth.token, &new).await {
            Ok(created) => {
                log::info!("Patient {} booked #{} on {} {}", auth.profile.id, created.id, created.date, created.slot);
                set_flash(&session, "Appointment booked");
                return Ok(see_other("/patient/bookings"));
            }
            Err(e) => vec![form_error(e)?],
        },
        Err(errors) => errors,
    };

    let ctx = PageContext::build(&session, &config, "/patient/bookings/new")?;
    let draft = Draft {
        doctor_id: form.doctor_id.trim().parse().unwrap_or(0),
        service_id: form.service_id.trim().parse().unwrap_or(0),
        date: form.date.clone(),
        slot: form.slot.clone(),
        note: form.note.clone(),
    };
    booking_form_page(&api, &auth.token, ctx, draft, errors).await
}

pub async fn cancel(
    api: web::Data<ApiClient>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    let auth = require_role(&session, Role::Patient)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let id = path.into_inner();

    let existing = own_booking(&api, &auth.token, auth.profile.id, id).await?;
    if !existing.is_cancellable(today()) {
        set_flash(&session, "This appointment can no longer be cancelled");
        return Ok(see_other("/patient/bookings"));
    }

    match booking::cancel(&api, &auth.token, id).await {
        Ok(()) => {
            log::info!("Patient {} cancelled booking #{id}", auth.profile.id);
            set_flash(&session, "Appointment cancelled");
        }
        Err(e) => set_flash(&session, &form_error(e)?),
    }
    Ok(see_other("/patient/bookings"))
}

#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    #[serde(default)]
    pub date: Option<String>,
}

async fn reschedule_page(
    api: &ApiClient,
    token: &str,
    ctx: PageContext,
    booking: Booking,
    date: String,
    slot: String,
    errors: Vec<String>,
) -> Result<HttpResponse, AppError> {
    let today = today();
    let slots = match slot_date(booking.doctor_id, &date, today) {
        Some(d) => service::find_slots(api, token, booking.doctor_id, d).await?,
        None => vec![],
    };
    let tmpl = RescheduleTemplate {
        ctx,
        errors,
        booking,
        slots,
        date,
        slot,
        min_date: today.format("%Y-%m-%d").to_string(),
    };
    render(tmpl)
}

pub async fn reschedule_form(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    path: web::Path<i64>,
    query: web::Query<DateQuery>,
) -> Result<HttpResponse, AppError> {
    let auth = require_role(&session, Role::Patient)?;
    let existing = own_booking(&api, &auth.token, auth.profile.id, path.into_inner()).await?;
    if !existing.is_reschedulable(today()) {
        set_flash(&session, "This appointment can no longer be rescheduled");
        return Ok(see_other("/patient/bookings"));
    }
    let ctx = PageContext::build(&session, &config, "/patient/bookings")?;
    let date = query.into_inner().date.unwrap_or_default();
    reschedule_page(&api, &auth.token, ctx, existing, date, String::new(), vec![]).await
}

pub async fn reschedule(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<RescheduleForm>,
) -> Result<HttpResponse, AppError> {
    let auth = require_role(&session, Role::Patient)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let id = path.into_inner();

    let existing = own_booking(&api, &auth.token, auth.profile.id, id).await?;
    if !existing.is_reschedulable(today()) {
        set_flash(&session, "This appointment can no longer be rescheduled");
        return Ok(see_other("/patient/bookings"));
    }

    let errors = match validate_reschedule(&form, today()) {
        Ok(to) => match booking::reschedule(&api, &auth.token, id, &to).await {
            Ok(moved) => {
                log::info!("Patient {} moved booking #{id} to {} {}", auth.profile.id, moved.date, moved.slot);
                set_flash(&session, "Appointment rescheduled");
                return Ok(see_other("/patient/bookings"));
            }
            Err(e) => vec![form_error(e)?],
        },
        Err(errors) => errors,
    };

    let ctx = PageContext::build(&session, &config, "/patient/bookings")?;
    reschedule_page(&api, &auth.token, ctx, existing, form.date.clone(), form.slot.clone(), errors).await
}
