use askama::Template;

use crate::models::booking::Booking;
use crate::models::dashboard::{BookingStats, RoleCounts};

use super::PageContext;
use super::booking::BookingRow;
use super::treatment::PlanCard;

#[derive(Template)]
#[template(path = "dashboard/admin.html")]
pub struct AdminDashboardTemplate {
    pub ctx: PageContext,
    pub greeting: String,
    pub stats: BookingStats,
    pub roles: RoleCounts,
    pub recent: Vec<Booking>,
}

#[derive(Template)]
#[template(path = "dashboard/doctor.html")]
pub struct DoctorDashboardTemplate {
    pub ctx: PageContext,
    pub greeting: String,
    pub today_label: String,
    pub todays: Vec<Booking>,
    pub upcoming_count: usize,
    pub active_plans: usize,
}

#[derive(Template)]
#[template(path = "dashboard/patient.html")]
pub struct PatientDashboardTemplate {
    pub ctx: PageContext,
    pub greeting: String,
    pub upcoming: Vec<BookingRow>,
    pub unpaid: Vec<BookingRow>,
    pub plans: Vec<PlanCard>,
}
