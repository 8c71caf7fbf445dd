use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::api::ApiClient;
use crate::auth::session::{SessionManager, set_flash};
use crate::auth::{csrf, validate};
use crate::config::AppConfig;
use crate::errors::{AppError, render, see_other};
use crate::models::user::{self, AccountForm, ProfileUpdate};
use crate::templates_structs::{AccountTemplate, PageContext};

use super::form_error;

pub async fn form(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let manager = SessionManager::new(&session);
    let token = manager.token()?;

    // Refresh the cached profile so the form shows what the backend holds.
    let profile = user::find_me(&api, &token).await?;
    manager.update_profile(&profile)?;

    let ctx = PageContext::build(&session, &config, "/account")?;
    let tmpl = AccountTemplate {
        ctx,
        errors: vec![],
        full_name: profile.full_name.clone(),
        phone: profile.phone.clone().unwrap_or_default(),
    };
    render(tmpl)
}

pub async fn submit(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    form: web::Form<AccountForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let manager = SessionManager::new(&session);
    let token = manager.token()?;

    let mut errors: Vec<String> = vec![];
    errors.extend(validate::validate_required(&form.full_name, "Full name", 100));
    errors.extend(validate::validate_phone(&form.phone));

    if errors.is_empty() {
        let update = ProfileUpdate {
            full_name: form.full_name.trim().to_string(),
            phone: form.phone.trim().to_string(),
        };
        match user::update_me(&api, &token, &update).await {
            Ok(profile) => {
                manager.update_profile(&profile)?;
                set_flash(&session, "Profile updated");
                return Ok(see_other("/account"));
            }
            Err(e) => errors.push(form_error(e)?),
        }
    }

    let ctx = PageContext::build(&session, &config, "/account")?;
    let tmpl = AccountTemplate {
        ctx,
        errors,
        full_name: form.full_name.clone(),
        phone: form.phone.clone(),
    };
    render(tmpl)
}
