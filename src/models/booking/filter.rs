use std::collections::HashMap;

use chrono::NaiveDate;

use super::types::{Booking, BookingStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn from_param(dir: Option<&str>) -> Self {
        if dir == Some("desc") { SortDir::Desc } else { SortDir::Asc }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }

    pub fn toggle(&self) -> &'static str {
        match self {
            SortDir::Asc => "desc",
            SortDir::Desc => "asc",
        }
    }
}

/// Criteria for booking tables. Every present criterion must match.
#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub query: String,
    pub dir: SortDir,
}

fn parse_date(value: Option<&String>) -> Option<NaiveDate> {
    value.and_then(|v| NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d").ok())
}

impl BookingFilter {
    /// Build from query parameters: `status`, `from`, `to`, `q`, `dir`.
    /// Unparseable values are ignored rather than rejected.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        BookingFilter {
            status: params.get("status").and_then(|s| BookingStatus::parse(s)),
            from: parse_date(params.get("from")),
            to: parse_date(params.get("to")),
            query: params.get("q").map(|q| q.trim().to_string()).unwrap_or_default(),
            dir: SortDir::from_param(params.get("dir").map(String::as_str)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.from.is_none() && self.to.is_none() && self.query.is_empty()
    }

    pub fn matches(&self, b: &Booking) -> bool {
        if let Some(status) = self.status {
            if b.status != status {
                return false;
            }
        }
        if let Some(from) = self.from {
            if b.date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if b.date > to {
                return false;
            }
        }
        if !self.query.is_empty() {
            let needle = self.query.to_lowercase();
            let hit = [&b.patient_name, &b.doctor_name, &b.service_name]
                .iter()
                .filter_map(|name| name.as_deref())
                .any(|name| name.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        true
    }

    /// Filter, then sort by (date, slot) in the requested direction.
    pub fn apply(&self, bookings: Vec<Booking>) -> Vec<Booking> {
        let mut kept: Vec<Booking> = bookings.into_iter().filter(|b| self.matches(b)).collect();
        sort_by_schedule(&mut kept, self.dir);
        kept
    }

    pub fn status_str(&self) -> &'static str {
        self.status.map(|s| s.as_str()).unwrap_or("")
    }

    pub fn from_input(&self) -> String {
        self.from.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
    }

    pub fn to_input(&self) -> String {
        self.to.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
    }
}

/// Stable sort on (date, slot). Slots are zero-padded `HH:MM`, so string order
/// is time order.
pub fn sort_by_schedule(bookings: &mut [Booking], dir: SortDir) {
    match dir {
        SortDir::Asc => bookings.sort_by(|a, b| (a.date, &a.slot).cmp(&(b.date, &b.slot))),
        SortDir::Desc => bookings.sort_by(|a, b| (b.date, &b.slot).cmp(&(a.date, &a.slot))),
    }
}
