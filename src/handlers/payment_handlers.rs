use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};

use crate::api::ApiClient;
use crate::auth::csrf;
use crate::auth::session::{SessionManager, require_role, set_flash};
use crate::config::AppConfig;
use crate::errors::{AppError, render, see_other};
use crate::models::booking;
use crate::models::payment;
use crate::models::user::Role;
use crate::templates_structs::{PageContext, PaymentResultTemplate};

use super::auth_handlers::CsrfOnly;
use super::form_error;

/// Start a gateway payment for one of the patient's bookings and send the
/// browser there.
pub async fn pay(
    api: web::Data<ApiClient>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    let auth = require_role(&session, Role::Patient)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let id = path.into_inner();

    let found = booking::find_by_id(&api, &auth.token, id).await?;
    if found.patient_id != auth.profile.id {
        return Err(AppError::NotFound);
    }
    if !found.is_payable() {
        set_flash(&session, "This appointment does not need paying");
        return Ok(see_other("/patient/bookings"));
    }

    match payment::create_link(&api, &auth.token, id).await {
        Ok(link) if link.is_redirectable() => {
            log::info!("Patient {} sent to gateway for booking #{id}", auth.profile.id);
            Ok(see_other(link.payment_url.trim()))
        }
        Ok(link) => {
            log::warn!("Backend returned an unusable payment URL for booking #{id}: {:?}", link.payment_url);
            set_flash(&session, "Payment could not be started. Please try again later.");
            Ok(see_other("/patient/bookings"))
        }
        Err(e) => {
            set_flash(&session, &form_error(e)?);
            Ok(see_other("/patient/bookings"))
        }
    }
}

/// Landing page after the gateway. The query string is passed through
/// verbatim so the backend can check its signature.
pub async fn payment_return(
    req: HttpRequest,
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let token = SessionManager::new(&session).token()?;
    let result = payment::verify_return(&api, &token, req.query_string()).await?;
    if result.success {
        log::info!("Payment settled for booking #{}", result.booking_id);
    } else {
        log::warn!("Payment failed for booking #{}: {}", result.booking_id, result.message_text());
    }

    let ctx = PageContext::build(&session, &config, "/patient/bookings")?;
    render(PaymentResultTemplate { ctx, result })
}
