//! Shared test infrastructure.
//!
//! - Step and booking builders for the pure model tests
//! - A `wiremock` backend plus an `ApiClient` pointed at it
//! - CSRF token extraction for handler round trips

#![allow(dead_code)]

use std::time::Duration;

use chrono::NaiveDate;
use regex::Regex;
use serde_json::{Value, json};
use wiremock::MockServer;

use ivfcare::api::ApiClient;
use ivfcare::config::AppConfig;
use ivfcare::models::booking::Booking;
use ivfcare::models::treatment::TreatmentStep;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const PATIENT_ID: i64 = 7;
pub const DOCTOR_ID: i64 = 3;
pub const TOKEN: &str = "test-token";

// ============================================================================
// MODEL BUILDERS
// ============================================================================

pub fn step(order: i32, name: &str) -> TreatmentStep {
    TreatmentStep::new(order, name)
}

pub fn steps(items: &[(i32, &str)]) -> Vec<TreatmentStep> {
    items.iter().map(|(order, name)| step(*order, name)).collect()
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("bad test date")
}

/// Booking JSON as the backend sends it.
pub fn booking_json(id: i64, date: &str, slot: &str, status: &str) -> Value {
    json!({
        "id": id,
        "patientId": PATIENT_ID,
        "patientName": "Nguyễn Thị Lan",
        "doctorId": DOCTOR_ID,
        "doctorName": "Trần Văn Minh",
        "serviceId": 1,
        "serviceName": "IVF consultation",
        "date": date,
        "slot": slot,
        "status": status,
    })
}

pub fn booking(id: i64, date: &str, slot: &str, status: &str) -> Booking {
    serde_json::from_value(booking_json(id, date, slot, status)).expect("bad test booking")
}

/// Booking with a payment attached.
pub fn paid_booking(id: i64, date: &str, status: &str, amount: i64, payment_status: &str) -> Booking {
    let mut v = booking_json(id, date, "09:00", status);
    v["payment"] = json!({ "amount": amount, "status": payment_status });
    serde_json::from_value(v).expect("bad test booking")
}

pub fn profile_json(id: i64, role: &str) -> Value {
    json!({
        "id": id,
        "fullName": "Nguyễn Thị Lan",
        "email": "lan@example.com",
        "phone": "0901234567",
        "role": role,
    })
}

// ============================================================================
// MOCK BACKEND
// ============================================================================

pub async fn mock_backend() -> MockServer {
    MockServer::start().await
}

pub fn api_for(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.uri(), Duration::from_secs(5)).expect("Failed to build ApiClient")
}

pub fn config_for(server: &MockServer) -> AppConfig {
    AppConfig::from_lookup(|name| match name {
        "API_BASE_URL" => Some(server.uri()),
        "APP_NAME" => Some("IVF Care Test".to_string()),
        _ => None,
    })
}

// ============================================================================
// CSRF TOKEN EXTRACTION
// ============================================================================

pub fn extract_csrf_token(html: &str) -> String {
    // <input type="hidden" name="csrf_token" value="...">
    let re = Regex::new(r#"name="csrf_token"\s+value="([^"]+)""#).expect("Failed to compile regex");
    re.captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "invalid_token".to_string())
}
