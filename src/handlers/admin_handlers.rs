use std::collections::HashMap;

use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::api::ApiClient;
use crate::auth::csrf;
use crate::auth::session::{require_role, set_flash};
use crate::config::AppConfig;
use crate::errors::{AppError, render, see_other};
use crate::models::booking::{self, BookingFilter, BookingStatus};
use crate::models::dashboard;
use crate::models::user::{self, Role};
use crate::templates_structs::{AdminBookingsTemplate, AdminUsersTemplate, PageContext};

use super::auth_handlers::CsrfOnly;
use super::form_error;

pub async fn users(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let auth = require_role(&session, Role::Admin)?;
    let ctx = PageContext::build(&session, &config, "/admin/users")?;

    let mut users = user::find_all(&api, &auth.token).await?;
    users.sort_by(|a, b| {
        a.role
            .as_str()
            .cmp(b.role.as_str())
            .then_with(|| a.full_name.to_lowercase().cmp(&b.full_name.to_lowercase()))
    });
    let counts = dashboard::role_counts(&users);

    render(AdminUsersTemplate { ctx, users, counts })
}

pub async fn toggle_active(
    api: web::Data<ApiClient>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    let auth = require_role(&session, Role::Admin)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let id = path.into_inner();

    // Self-deactivation protection
    if id == auth.profile.id {
        set_flash(&session, "You cannot deactivate your own account");
        return Ok(see_other("/admin/users"));
    }

    let all = user::find_all(&api, &auth.token).await?;
    let target = all.into_iter().find(|u| u.id == id).ok_or(AppError::NotFound)?;

    match user::set_active(&api, &auth.token, id, !target.active).await {
        Ok(updated) => {
            let verb = if updated.active { "activated" } else { "deactivated" };
            log::info!("Admin {} {verb} user {id}", auth.profile.id);
            set_flash(&session, &format!("{} {verb}", updated.full_name));
        }
        Err(e) => set_flash(&session, &form_error(e)?),
    }
    Ok(see_other("/admin/users"))
}

pub async fn bookings(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let auth = require_role(&session, Role::Admin)?;
    let ctx = PageContext::build(&session, &config, "/admin/bookings")?;

    let filter = BookingFilter::from_params(&query);
    let shown = filter.apply(booking::find_all(&api, &auth.token).await?);
    let stats = dashboard::booking_stats(&shown);

    let tmpl = AdminBookingsTemplate {
        ctx,
        bookings: shown,
        filter,
        statuses: BookingStatus::ALL.to_vec(),
        stats,
    };
    render(tmpl)
}
