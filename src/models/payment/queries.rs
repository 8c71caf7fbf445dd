use crate::api::{ApiClient, ApiError};

use super::types::{PaymentLink, PaymentResult};

/// Ask the backend to open a gateway transaction for a booking.
pub async fn create_link(api: &ApiClient, token: &str, booking_id: i64) -> Result<PaymentLink, ApiError> {
    api.post(&format!("/payments/{booking_id}"), Some(token), &serde_json::json!({}))
        .await
}

/// Forward the gateway's return query string untouched; the backend verifies
/// the signature and settles the booking.
pub async fn verify_return(api: &ApiClient, token: &str, raw_query: &str) -> Result<PaymentResult, ApiError> {
    let path = if raw_query.is_empty() {
        "/payments/return".to_string()
    } else {
        format!("/payments/return?{raw_query}")
    };
    api.get(&path, Some(token)).await
}
