use crate::api::{ApiClient, ApiError};

use super::types::{Examination, NewExamination};

/// Examinations visible to the caller, newest first.
pub async fn find_all(api: &ApiClient, token: &str) -> Result<Vec<Examination>, ApiError> {
    let mut exams: Vec<Examination> = api.get("/examinations", Some(token)).await?;
    exams.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(exams)
}

pub async fn find_by_booking(api: &ApiClient, token: &str, booking_id: i64) -> Result<Vec<Examination>, ApiError> {
    let booking_id = booking_id.to_string();
    api.get_with_query("/examinations", Some(token), &[("bookingId", booking_id.as_str())])
        .await
}

pub async fn create(api: &ApiClient, token: &str, new: &NewExamination) -> Result<Examination, ApiError> {
    api.post("/examinations", Some(token), new).await
}
