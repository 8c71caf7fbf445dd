use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::middleware::from_fn;
use actix_web::{HttpResponse, cookie::Key, web};

use crate::auth::middleware::{require_admin, require_auth, require_doctor, require_patient};
use crate::config::AppConfig;
use crate::handlers::{
    account_handlers, admin_handlers, auth_handlers, booking_handlers, dashboard, doctor_handlers,
    examination_handlers, payment_handlers, treatment_handlers,
};

/// Signed cookie session carrying the login state.
pub fn session_middleware(config: &AppConfig, key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_secure(config.cookie_secure)
        .cookie_http_only(true)
        .build()
}

/// Every route of the portal. Static files and the session middleware are
/// added by the caller.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Public routes
        .route("/login", web::get().to(auth_handlers::login_page))
        .route("/login", web::post().to(auth_handlers::login_submit))
        .route("/register", web::get().to(auth_handlers::register_page))
        .route("/register", web::post().to(auth_handlers::register_submit))
        .route(
            "/",
            web::get().to(|| async {
                HttpResponse::SeeOther()
                    .insert_header(("Location", "/dashboard"))
                    .finish()
            }),
        )
        // Protected routes
        .service(
            web::scope("")
                .wrap(from_fn(require_auth))
                .route("/dashboard", web::get().to(dashboard::index))
                .route("/logout", web::post().to(auth_handlers::logout))
                .route("/account", web::get().to(account_handlers::form))
                .route("/account", web::post().to(account_handlers::submit))
                .route("/payment/return", web::get().to(payment_handlers::payment_return))
                .service(
                    web::scope("/patient")
                        .wrap(from_fn(require_patient))
                        .route("/bookings", web::get().to(booking_handlers::list))
                        .route("/bookings/new", web::get().to(booking_handlers::new_form))
                        .route("/bookings", web::post().to(booking_handlers::create))
                        .route("/bookings/{id}/cancel", web::post().to(booking_handlers::cancel))
                        .route("/bookings/{id}/reschedule", web::get().to(booking_handlers::reschedule_form))
                        .route("/bookings/{id}/reschedule", web::post().to(booking_handlers::reschedule))
                        .route("/bookings/{id}/pay", web::post().to(payment_handlers::pay))
                        .route("/treatments", web::get().to(treatment_handlers::patient_list))
                        .route("/examinations", web::get().to(examination_handlers::patient_list)),
                )
                .service(
                    web::scope("/doctor")
                        .wrap(from_fn(require_doctor))
                        .route("/appointments", web::get().to(doctor_handlers::appointments))
                        .route("/appointments/{id}/status", web::post().to(doctor_handlers::update_status))
                        .route("/appointments/{id}/examination", web::get().to(examination_handlers::form))
                        .route("/appointments/{id}/examination", web::post().to(examination_handlers::submit))
                        // /treatments/new BEFORE /treatments/{id}
                        .route("/treatments", web::get().to(treatment_handlers::doctor_list))
                        .route("/treatments/new", web::get().to(treatment_handlers::new_form))
                        .route("/treatments/new", web::post().to(treatment_handlers::create))
                        .route("/treatments/{id}", web::get().to(treatment_handlers::detail))
                        .route("/treatments/{id}/status", web::post().to(treatment_handlers::update_status))
                        .route("/treatments/{id}/steps", web::post().to(treatment_handlers::add_step))
                        .route(
                            "/treatments/{id}/steps/{step_id}",
                            web::post().to(treatment_handlers::update_step),
                        ),
                )
                .service(
                    web::scope("/admin")
                        .wrap(from_fn(require_admin))
                        .route("/users", web::get().to(admin_handlers::users))
                        .route("/users/{id}/toggle", web::post().to(admin_handlers::toggle_active))
                        .route("/bookings", web::get().to(admin_handlers::bookings)),
                ),
        );
}

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body("<!DOCTYPE html><title>Not found</title><h1>Page not found</h1><p><a href=\"/dashboard\">Back to the dashboard</a></p>")
}
