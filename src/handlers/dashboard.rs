use actix_session::Session;
use actix_web::{HttpResponse, web};
use chrono::{Local, Timelike};

use crate::api::ApiClient;
use crate::auth::session::SessionManager;
use crate::config::AppConfig;
use crate::errors::{AppError, render};
use crate::models::user::Role;
use crate::models::{booking, dashboard, treatment, user};
use crate::templates_structs::{
    AdminDashboardTemplate, BookingRow, DoctorDashboardTemplate, PageContext, PatientDashboardTemplate, PlanCard,
};

use super::today;

const RECENT_LIMIT: usize = 8;

fn time_greeting(name: &str) -> String {
    let hour = Local::now().hour();
    let period = match hour {
        5..=11 => "Good morning",
        12..=16 => "Good afternoon",
        _ => "Good evening",
    };
    format!("{period}, {name}")
}

pub async fn index(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let auth = SessionManager::new(&session).current()?;
    let ctx = PageContext::build(&session, &config, "/dashboard")?;
    let greeting = time_greeting(&ctx.user.full_name);
    let token = auth.token.as_str();

    match auth.role() {
        Role::Admin => {
            let (bookings, users) = futures::try_join!(
                booking::find_all(&api, token),
                user::find_all(&api, token)
            )?;
            let tmpl = AdminDashboardTemplate {
                ctx,
                greeting,
                stats: dashboard::booking_stats(&bookings),
                roles: dashboard::role_counts(&users),
                recent: dashboard::recent(&bookings, RECENT_LIMIT),
            };
            render(tmpl)
        }
        Role::Doctor => {
            let (bookings, plans) = futures::try_join!(
                booking::find_all(&api, token),
                treatment::find_plans(&api, token)
            )?;
            let today = today();
            let tmpl = DoctorDashboardTemplate {
                ctx,
                greeting,
                today_label: today.format("%d/%m/%Y").to_string(),
                todays: dashboard::todays(&bookings, today),
                upcoming_count: dashboard::upcoming(&bookings, today).len(),
                active_plans: dashboard::active_plan_count(&plans),
            };
            render(tmpl)
        }
        Role::Patient => {
            let (bookings, plans) = futures::try_join!(
                booking::find_all(&api, token),
                treatment::find_plans(&api, token)
            )?;
            let progress = treatment::load_all_progress(&api, token, plans).await?;
            let today = today();
            let tmpl = PatientDashboardTemplate {
                ctx,
                greeting,
                upcoming: BookingRow::rows(dashboard::upcoming(&bookings, today), today),
                unpaid: BookingRow::rows(dashboard::unpaid(&bookings), today),
                plans: progress.into_iter().map(PlanCard::from).collect(),
            };
            render(tmpl)
        }
    }
}
