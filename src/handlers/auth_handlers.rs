use std::net::{IpAddr, Ipv4Addr};

use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};
use chrono::Utc;
use serde::Deserialize;

use crate::api::{ApiClient, ApiError};
use crate::auth::rate_limit::LoginThrottle;
use crate::auth::session::{AuthSession, SessionManager, set_flash, take_flash};
use crate::auth::{csrf, validate};
use crate::config::AppConfig;
use crate::errors::{AppError, render, see_other};
use crate::models::user::{self, LoginForm, RegisterForm, RegisterRequest};
use crate::templates_structs::{LoginTemplate, RegisterTemplate};

const EXPIRED_NOTICE: &str = "Your session has expired. Please log in again.";
const BAD_CREDENTIALS: &str = "Invalid email or password";

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct LoginQuery {
    pub expired: Option<String>,
}

fn login_form(
    session: &Session,
    config: &AppConfig,
    email: &str,
    error: Option<String>,
    notice: Option<String>,
) -> Result<HttpResponse, AppError> {
    let tmpl = LoginTemplate {
        error,
        notice,
        email: email.to_string(),
        app_name: config.app_name.clone(),
        csrf_token: csrf::get_or_create_token(session),
    };
    render(tmpl)
}

pub async fn login_page(
    config: web::Data<AppConfig>,
    session: Session,
    query: web::Query<LoginQuery>,
) -> Result<HttpResponse, AppError> {
    let manager = SessionManager::new(&session);

    // Redirected here after the backend rejected our token.
    if query.expired.is_some() {
        manager.clear();
        return login_form(&session, &config, "", None, Some(EXPIRED_NOTICE.to_string()));
    }

    if manager.get().is_some() && !manager.is_expired() {
        return Ok(see_other("/dashboard"));
    }

    let notice = take_flash(&session);
    login_form(&session, &config, "", None, notice)
}

pub async fn login_submit(
    req: HttpRequest,
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    form: web::Form<LoginForm>,
    throttle: web::Data<LoginThrottle>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    // Throttle check BEFORE any backend call
    let ip = req
        .peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    if throttle.is_blocked(ip) {
        log::warn!("Login throttled for {ip}");
        return login_form(
            &session,
            &config,
            &form.email,
            Some("Too many failed login attempts. Please try again later.".to_string()),
            None,
        );
    }

    let mut errors: Vec<String> = vec![];
    errors.extend(validate::validate_email(&form.email));
    if form.password.is_empty() {
        errors.push("Password is required".to_string());
    }
    if let Some(first) = errors.into_iter().next() {
        return login_form(&session, &config, &form.email, Some(first), None);
    }

    match user::login(&api, &form.email, &form.password).await {
        Ok(login) => {
            throttle.clear(ip);
            if !login.user.active {
                return login_form(
                    &session,
                    &config,
                    &form.email,
                    Some("This account has been deactivated.".to_string()),
                    None,
                );
            }
            let auth = AuthSession::from_login(login, config.session_ttl_minutes, Utc::now().timestamp());
            log::info!("User {} logged in as {}", auth.profile.id, auth.role().as_str());
            SessionManager::new(&session).set(&auth)?;
            Ok(see_other("/dashboard"))
        }
        Err(ApiError::Unauthorized) | Err(ApiError::BadRequest(_)) | Err(ApiError::NotFound) => {
            throttle.record_failure(ip);
            login_form(&session, &config, &form.email, Some(BAD_CREDENTIALS.to_string()), None)
        }
        Err(ApiError::Forbidden) => login_form(
            &session,
            &config,
            &form.email,
            Some("This account has been deactivated.".to_string()),
            None,
        ),
        Err(e) => {
            log::warn!("Login failed: {e}");
            login_form(&session, &config, &form.email, Some(e.user_message()), None)
        }
    }
}

fn register_form(
    session: &Session,
    config: &AppConfig,
    form: Option<&RegisterForm>,
    errors: Vec<String>,
) -> Result<HttpResponse, AppError> {
    let tmpl = RegisterTemplate {
        errors,
        full_name: form.map(|f| f.full_name.clone()).unwrap_or_default(),
        email: form.map(|f| f.email.clone()).unwrap_or_default(),
        phone: form.map(|f| f.phone.clone()).unwrap_or_default(),
        app_name: config.app_name.clone(),
        csrf_token: csrf::get_or_create_token(session),
    };
    render(tmpl)
}

/// Validate the self-registration form. Empty means valid.
pub fn validate_registration(form: &RegisterForm) -> Vec<String> {
    let mut errors: Vec<String> = vec![];
    errors.extend(validate::validate_required(&form.full_name, "Full name", 100));
    errors.extend(validate::validate_email(&form.email));
    errors.extend(validate::validate_phone(&form.phone));
    errors.extend(validate::validate_password(&form.password));
    if form.password != form.confirm_password {
        errors.push("Passwords do not match".to_string());
    }
    errors
}

pub async fn register_page(
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    register_form(&session, &config, None, vec![])
}

pub async fn register_submit(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    form: web::Form<RegisterForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let errors = validate_registration(&form);
    if !errors.is_empty() {
        return register_form(&session, &config, Some(&*form), errors);
    }

    let req = RegisterRequest {
        full_name: form.full_name.trim().to_string(),
        email: form.email.trim().to_string(),
        phone: form.phone.trim().to_string(),
        password: form.password.clone(),
    };

    match user::register(&api, &req).await {
        Ok(profile) => {
            log::info!("Registered patient {}", profile.id);
            set_flash(&session, "Registration successful. Please log in.");
            Ok(see_other("/login"))
        }
        Err(ApiError::Conflict(_)) => register_form(
            &session,
            &config,
            Some(&*form),
            vec!["An account with this email already exists".to_string()],
        ),
        Err(e) => {
            log::warn!("Registration failed: {e}");
            register_form(&session, &config, Some(&*form), vec![e.user_message()])
        }
    }
}

pub async fn logout(session: Session, form: web::Form<CsrfOnly>) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    if let Some(auth) = SessionManager::new(&session).get() {
        log::info!("User {} logged out", auth.profile.id);
    }
    session.purge();
    Ok(see_other("/login"))
}
