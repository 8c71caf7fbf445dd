use actix_session::SessionExt;
use actix_web::{
    Error, HttpResponse,
    body::{EitherBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
};

use crate::auth::session::{SessionManager, set_flash};
use crate::models::user::Role;

/// Middleware function that checks for a live (present, unexpired) session.
/// Redirects to /login otherwise.
pub async fn require_auth(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let session = req.get_session();
    let manager = SessionManager::new(&session);

    let live = match manager.get() {
        Some(_) if !manager.is_expired() => true,
        Some(_) => {
            manager.clear();
            set_flash(&session, "Your session has expired. Please log in again.");
            false
        }
        None => false,
    };

    if !live {
        let response = HttpResponse::SeeOther()
            .insert_header(("Location", "/login"))
            .finish();
        return Ok(req.into_response(response).map_into_right_body());
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}

async fn guard_role<B: MessageBody + 'static>(
    req: ServiceRequest,
    next: Next<B>,
    role: Role,
) -> Result<ServiceResponse<EitherBody<B>>, Error> {
    let session = req.get_session();
    let allowed = SessionManager::new(&session)
        .get()
        .map(|auth| auth.role() == role)
        .unwrap_or(false);

    if !allowed {
        log::warn!("Blocked {} for non-{} user", req.path(), role.as_str());
        let response = HttpResponse::Forbidden().body("Forbidden");
        return Ok(req.into_response(response).map_into_right_body());
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}

pub async fn require_admin(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    guard_role(req, next, Role::Admin).await
}

pub async fn require_doctor(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    guard_role(req, next, Role::Doctor).await
}

pub async fn require_patient(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    guard_role(req, next, Role::Patient).await
}
