use crate::models::user::Role;

pub struct NavItem {
    pub label: String,
    pub url: String,
    pub is_active: bool,
}

/// (label, url) pairs per role, in display order.
fn entries(role: Role) -> &'static [(&'static str, &'static str)] {
    match role {
        Role::Admin => &[
            ("Dashboard", "/dashboard"),
            ("Bookings", "/admin/bookings"),
            ("Users", "/admin/users"),
            ("Account", "/account"),
        ],
        Role::Doctor => &[
            ("Dashboard", "/dashboard"),
            ("Appointments", "/doctor/appointments"),
            ("Treatment plans", "/doctor/treatments"),
            ("Account", "/account"),
        ],
        Role::Patient => &[
            ("Dashboard", "/dashboard"),
            ("My bookings", "/patient/bookings"),
            ("Book appointment", "/patient/bookings/new"),
            ("My treatment", "/patient/treatments"),
            ("Examinations", "/patient/examinations"),
            ("Account", "/account"),
        ],
    }
}

/// Navigation for `role`, with the entry owning `current_path` marked active.
/// The longest matching URL prefix wins, so `/patient/bookings/new` does not
/// also light up `/patient/bookings`.
pub fn find_navigation(role: Role, current_path: &str) -> Vec<NavItem> {
    let items = entries(role);
    let active_url = items
        .iter()
        .map(|(_, url)| *url)
        .filter(|url| current_path == *url || current_path.starts_with(&format!("{url}/")))
        .max_by_key(|url| url.len());

    items
        .iter()
        .map(|(label, url)| NavItem {
            label: label.to_string(),
            url: url.to_string(),
            is_active: Some(*url) == active_url,
        })
        .collect()
}
