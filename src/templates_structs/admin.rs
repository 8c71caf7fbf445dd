use askama::Template;

use crate::models::booking::{Booking, BookingFilter, BookingStatus};
use crate::models::dashboard::{BookingStats, RoleCounts};
use crate::models::user::UserProfile;

use super::PageContext;

#[derive(Template)]
#[template(path = "admin/users.html")]
pub struct AdminUsersTemplate {
    pub ctx: PageContext,
    pub users: Vec<UserProfile>,
    pub counts: RoleCounts,
}

#[derive(Template)]
#[template(path = "admin/bookings.html")]
pub struct AdminBookingsTemplate {
    pub ctx: PageContext,
    pub bookings: Vec<Booking>,
    pub filter: BookingFilter,
    pub statuses: Vec<BookingStatus>,
    pub stats: BookingStats,
}
