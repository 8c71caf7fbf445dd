use askama::Template;
use chrono::NaiveDate;

use crate::models::booking::{Booking, BookingFilter, BookingStatus};
use crate::models::service::{Doctor, Service, Slot};

use super::PageContext;

/// A booking plus the actions the current viewer may take on it today.
pub struct BookingRow {
    pub booking: Booking,
    pub can_cancel: bool,
    pub can_reschedule: bool,
    pub can_pay: bool,
    pub transitions: Vec<BookingStatus>,
}

impl BookingRow {
    pub fn new(booking: Booking, today: NaiveDate) -> Self {
        Self {
            can_cancel: booking.is_cancellable(today),
            can_reschedule: booking.is_reschedulable(today),
            can_pay: booking.is_payable(),
            transitions: booking.status.doctor_transitions().to_vec(),
            booking,
        }
    }

    pub fn rows(bookings: Vec<Booking>, today: NaiveDate) -> Vec<Self> {
        bookings.into_iter().map(|b| Self::new(b, today)).collect()
    }
}

#[derive(Template)]
#[template(path = "bookings/patient_list.html")]
pub struct PatientBookingsTemplate {
    pub ctx: PageContext,
    pub rows: Vec<BookingRow>,
    pub filter: BookingFilter,
    pub statuses: Vec<BookingStatus>,
}

#[derive(Template)]
#[template(path = "bookings/form.html")]
pub struct BookingFormTemplate {
    pub ctx: PageContext,
    pub errors: Vec<String>,
    pub services: Vec<Service>,
    pub doctors: Vec<Doctor>,
    /// Slots for the selected doctor and date; empty until both are chosen.
    pub slots: Vec<Slot>,
    pub doctor_id: i64,
    pub service_id: i64,
    pub date: String,
    pub slot: String,
    pub note: String,
    pub min_date: String,
}

#[derive(Template)]
#[template(path = "bookings/reschedule.html")]
pub struct RescheduleTemplate {
    pub ctx: PageContext,
    pub errors: Vec<String>,
    pub booking: Booking,
    pub slots: Vec<Slot>,
    pub date: String,
    pub slot: String,
    pub min_date: String,
}

#[derive(Template)]
#[template(path = "doctor/appointments.html")]
pub struct DoctorAppointmentsTemplate {
    pub ctx: PageContext,
    pub rows: Vec<BookingRow>,
    pub filter: BookingFilter,
    pub statuses: Vec<BookingStatus>,
}
