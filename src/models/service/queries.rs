use chrono::NaiveDate;

use crate::api::{ApiClient, ApiError};

use super::types::{Doctor, Service, Slot};

pub async fn find_services(api: &ApiClient, token: &str) -> Result<Vec<Service>, ApiError> {
    api.get("/services", Some(token)).await
}

pub async fn find_doctors(api: &ApiClient, token: &str) -> Result<Vec<Doctor>, ApiError> {
    api.get("/doctors", Some(token)).await
}

/// Slots for one doctor on one day, sorted by start time. Taken slots are kept
/// so the form can show them disabled.
pub async fn find_slots(api: &ApiClient, token: &str, doctor_id: i64, date: NaiveDate) -> Result<Vec<Slot>, ApiError> {
    let date = date.format("%Y-%m-%d").to_string();
    let mut slots: Vec<Slot> = api
        .get_with_query(&format!("/doctors/{doctor_id}/slots"), Some(token), &[("date", date.as_str())])
        .await?;
    slots.sort_by(|a, b| a.start_time.cmp(&b.start_time));
    Ok(slots)
}
