use reqwest::Method;

use crate::api::{ApiClient, ApiError};

use super::types::{Booking, BookingStatus, NewBooking, Reschedule, StatusUpdate};

/// Bookings visible to the caller. The backend scopes the list by role:
/// patients get their own, doctors their appointments, admins everything.
pub async fn find_all(api: &ApiClient, token: &str) -> Result<Vec<Booking>, ApiError> {
    api.get("/bookings", Some(token)).await
}

pub async fn find_by_id(api: &ApiClient, token: &str, id: i64) -> Result<Booking, ApiError> {
    api.get(&format!("/bookings/{id}"), Some(token)).await
}

pub async fn create(api: &ApiClient, token: &str, new: &NewBooking) -> Result<Booking, ApiError> {
    api.post("/bookings", Some(token), new).await
}

pub async fn cancel(api: &ApiClient, token: &str, id: i64) -> Result<(), ApiError> {
    api.send::<()>(Method::PUT, &format!("/bookings/{id}/cancel"), Some(token), None)
        .await
}

pub async fn reschedule(api: &ApiClient, token: &str, id: i64, to: &Reschedule) -> Result<Booking, ApiError> {
    api.put(&format!("/bookings/{id}/reschedule"), Some(token), to).await
}

pub async fn update_status(api: &ApiClient, token: &str, id: i64, status: BookingStatus) -> Result<(), ApiError> {
    api.send(Method::PUT, &format!("/bookings/{id}/status"), Some(token), Some(&StatusUpdate { status }))
        .await
}
