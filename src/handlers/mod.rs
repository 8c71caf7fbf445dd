pub mod account_handlers;
pub mod admin_handlers;
pub mod auth_handlers;
pub mod booking_handlers;
pub mod dashboard;
pub mod doctor_handlers;
pub mod examination_handlers;
pub mod payment_handlers;
pub mod treatment_handlers;

use chrono::{Local, NaiveDate};

use crate::api::ApiError;
use crate::errors::AppError;

/// Decide whether a backend failure on a form submit can be shown next to the
/// form, or must end the request (lost session, no permission, gone record).
pub(crate) fn form_error(e: ApiError) -> Result<String, AppError> {
    match e {
        ApiError::Unauthorized | ApiError::Forbidden | ApiError::NotFound => Err(AppError::Api(e)),
        other => {
            log::warn!("Form submit rejected: {other}");
            Ok(other.user_message())
        }
    }
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Keep the parsed value, or record its message and carry on validating.
pub(crate) fn parse_or_collect<T>(result: Result<T, String>, errors: &mut Vec<String>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            errors.push(e);
            None
        }
    }
}
