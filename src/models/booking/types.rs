use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::payment::{Payment, PaymentStatus, format_vnd};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Completed => "Completed",
            BookingStatus::Cancelled => "Cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "completed" => Some(BookingStatus::Completed),
            "cancelled" | "canceled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }

    /// Transitions a doctor may apply from this status.
    pub fn doctor_transitions(&self) -> &'static [BookingStatus] {
        match self {
            BookingStatus::Pending => &[BookingStatus::Confirmed, BookingStatus::Cancelled],
            BookingStatus::Confirmed => &[BookingStatus::Completed, BookingStatus::Cancelled],
            BookingStatus::Completed | BookingStatus::Cancelled => &[],
        }
    }
}

/// An appointment between a patient and a doctor for one service in one slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    pub patient_id: i64,
    #[serde(default)]
    pub patient_name: Option<String>,
    pub doctor_id: i64,
    #[serde(default)]
    pub doctor_name: Option<String>,
    pub service_id: i64,
    #[serde(default)]
    pub service_name: Option<String>,
    pub date: NaiveDate,
    pub slot: String, // HH:MM
    pub status: BookingStatus,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub payment: Option<Payment>,
}

impl Booking {
    pub fn starts_at(&self) -> Option<NaiveDateTime> {
        NaiveTime::parse_from_str(self.slot.trim(), "%H:%M")
            .ok()
            .map(|t| self.date.and_time(t))
    }

    /// Not cancelled or completed, and dated today or later.
    pub fn is_upcoming(&self, today: NaiveDate) -> bool {
        self.is_open() && self.date >= today
    }

    fn is_open(&self) -> bool {
        matches!(self.status, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    pub fn is_cancellable(&self, today: NaiveDate) -> bool {
        self.is_upcoming(today)
    }

    pub fn is_reschedulable(&self, today: NaiveDate) -> bool {
        self.is_upcoming(today)
    }

    pub fn payment_status(&self) -> PaymentStatus {
        self.payment.as_ref().map(|p| p.status).unwrap_or_default()
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status() == PaymentStatus::Paid
    }

    pub fn is_payable(&self) -> bool {
        self.status != BookingStatus::Cancelled
            && !matches!(self.payment_status(), PaymentStatus::Paid | PaymentStatus::Refunded)
    }

    pub fn paid_amount(&self) -> i64 {
        match &self.payment {
            Some(p) if p.status == PaymentStatus::Paid => p.amount,
            _ => 0,
        }
    }

    pub fn amount_label(&self) -> String {
        self.payment
            .as_ref()
            .map(|p| format_vnd(p.amount))
            .unwrap_or_default()
    }

    pub fn patient_label(&self) -> &str {
        self.patient_name.as_deref().unwrap_or("—")
    }

    pub fn doctor_label(&self) -> &str {
        self.doctor_name.as_deref().unwrap_or("—")
    }

    pub fn service_label(&self) -> &str {
        self.service_name.as_deref().unwrap_or("—")
    }

    pub fn note_text(&self) -> &str {
        self.note.as_deref().unwrap_or("")
    }

    pub fn date_label(&self) -> String {
        self.date.format("%d/%m/%Y").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub doctor_id: i64,
    pub service_id: i64,
    pub date: NaiveDate,
    pub slot: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reschedule {
    pub date: NaiveDate,
    pub slot: String,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdate {
    pub status: BookingStatus,
}

/// Form data from the new-booking page. Ids arrive as strings so an empty
/// select can be reported as a validation error instead of a 400.
#[derive(Debug, Deserialize)]
pub struct BookingForm {
    #[serde(default)]
    pub doctor_id: String,
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub slot: String,
    #[serde(default)]
    pub note: String,
    pub csrf_token: String,
}

#[derive(Debug, Deserialize)]
pub struct RescheduleForm {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub slot: String,
    pub csrf_token: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
    pub csrf_token: String,
}
