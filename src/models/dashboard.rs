use chrono::NaiveDate;

use crate::models::booking::{self, Booking, BookingStatus, SortDir};
use crate::models::payment::format_vnd;
use crate::models::treatment::TreatmentPlan;
use crate::models::user::{Role, UserProfile};

// ---------- Types ----------

/// Booking counts per status plus collected revenue, for the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingStats {
    pub total: usize,
    pub pending: usize,
    pub confirmed: usize,
    pub completed: usize,
    pub cancelled: usize,
    /// Sum of paid payment amounts, VND.
    pub revenue: i64,
}

impl BookingStats {
    pub fn revenue_label(&self) -> String {
        format_vnd(self.revenue)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoleCounts {
    pub admins: usize,
    pub doctors: usize,
    pub patients: usize,
    pub inactive: usize,
}

// ---------- Aggregation ----------

pub fn booking_stats(bookings: &[Booking]) -> BookingStats {
    bookings.iter().fold(BookingStats::default(), |mut acc, b| {
        acc.total += 1;
        match b.status {
            BookingStatus::Pending => acc.pending += 1,
            BookingStatus::Confirmed => acc.confirmed += 1,
            BookingStatus::Completed => acc.completed += 1,
            BookingStatus::Cancelled => acc.cancelled += 1,
        }
        acc.revenue += b.paid_amount();
        acc
    })
}

pub fn role_counts(users: &[UserProfile]) -> RoleCounts {
    users.iter().fold(RoleCounts::default(), |mut acc, u| {
        match u.role {
            Role::Admin => acc.admins += 1,
            Role::Doctor => acc.doctors += 1,
            Role::Patient => acc.patients += 1,
        }
        if !u.active {
            acc.inactive += 1;
        }
        acc
    })
}

/// The `limit` latest bookings by (date, slot).
pub fn recent(bookings: &[Booking], limit: usize) -> Vec<Booking> {
    let mut all = bookings.to_vec();
    booking::sort_by_schedule(&mut all, SortDir::Desc);
    all.truncate(limit);
    all
}

/// Today's non-cancelled appointments in slot order.
pub fn todays(bookings: &[Booking], today: NaiveDate) -> Vec<Booking> {
    let mut day: Vec<Booking> = bookings
        .iter()
        .filter(|b| b.date == today && b.status != BookingStatus::Cancelled)
        .cloned()
        .collect();
    booking::sort_by_schedule(&mut day, SortDir::Asc);
    day
}

/// Open bookings from today on, soonest first.
pub fn upcoming(bookings: &[Booking], today: NaiveDate) -> Vec<Booking> {
    let mut next: Vec<Booking> = bookings
        .iter()
        .filter(|b| b.is_upcoming(today))
        .cloned()
        .collect();
    booking::sort_by_schedule(&mut next, SortDir::Asc);
    next
}

/// Bookings that still need paying, soonest first.
pub fn unpaid(bookings: &[Booking]) -> Vec<Booking> {
    let mut due: Vec<Booking> = bookings.iter().filter(|b| b.is_payable()).cloned().collect();
    booking::sort_by_schedule(&mut due, SortDir::Asc);
    due
}

pub fn active_plan_count(plans: &[TreatmentPlan]) -> usize {
    plans.iter().filter(|p| p.is_active()).count()
}
