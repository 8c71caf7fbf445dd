use chrono::{NaiveDate, NaiveTime};

/// Validate an email: must contain '@' and '.', max 254 chars.
pub fn validate_email(email: &str) -> Option<String> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Some("Email is required".to_string());
    }
    if trimmed.len() > 254 {
        return Some("Email must be at most 254 characters".to_string());
    }
    if !trimmed.contains('@') || !trimmed.contains('.') {
        return Some("Email must be a valid address (contain '@' and '.')".to_string());
    }
    None
}

/// Validate a Vietnamese phone number: 10 digits starting with 0.
/// Spaces, dots and dashes are ignored.
pub fn validate_phone(phone: &str) -> Option<String> {
    let digits: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '.' | '-'))
        .collect();
    if digits.is_empty() {
        return Some("Phone number is required".to_string());
    }
    if digits.len() != 10 || !digits.starts_with('0') || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Some("Phone number must be 10 digits starting with 0".to_string());
    }
    None
}

/// Validate a password: min 6 chars.
pub fn validate_password(password: &str) -> Option<String> {
    if password.is_empty() {
        return Some("Password is required".to_string());
    }
    if password.chars().count() < 6 {
        return Some("Password must be at least 6 characters".to_string());
    }
    None
}

/// Validate a required text field with a max length (in characters).
pub fn validate_required(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(format!("{field_name} is required"));
    }
    if trimmed.chars().count() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// Validate an optional text field with a max length (empty is OK).
pub fn validate_optional(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if !trimmed.is_empty() && trimmed.chars().count() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// Parse a required positive id coming from a `<select>`.
pub fn parse_id(value: &str, field_name: &str) -> Result<i64, String> {
    match value.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ if value.trim().is_empty() => Err(format!("{field_name} is required")),
        _ => Err(format!("{field_name} is invalid")),
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(value: &str, field_name: &str) -> Result<NaiveDate, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{field_name} is required"));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| format!("{field_name} must be a date (YYYY-MM-DD)"))
}

/// Parse a `YYYY-MM-DD` date that must not lie before `today`.
pub fn parse_future_date(value: &str, field_name: &str, today: NaiveDate) -> Result<NaiveDate, String> {
    let date = parse_date(value, field_name)?;
    if date < today {
        return Err(format!("{field_name} cannot be in the past"));
    }
    Ok(date)
}

/// Validate an `HH:MM` slot start.
pub fn validate_slot(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some("Time slot is required".to_string());
    }
    if trimmed.len() != 5 || NaiveTime::parse_from_str(trimmed, "%H:%M").is_err() {
        return Some("Time slot must be HH:MM".to_string());
    }
    None
}

/// Parse a step order: integer >= 1.
pub fn parse_step_order(value: &str) -> Result<i32, String> {
    match value.trim().parse::<i32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err("Step order must be a whole number of at least 1".to_string()),
    }
}
