use std::fmt;

/// Failure talking to the clinic backend, already classified by what the user
/// should be told.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Connection refused, DNS failure, timeout.
    Network(String),
    /// 400 / 422, with the backend's own message when it sent one.
    BadRequest(Option<String>),
    Unauthorized,
    Forbidden,
    NotFound,
    /// 409, typically a slot that was taken in the meantime.
    Conflict(Option<String>),
    Server(u16),
    Unexpected(u16),
    /// 2xx response whose body did not match the expected shape.
    Decode(String),
}

impl ApiError {
    /// Classify a non-success status code.
    pub fn from_status(code: u16, message: Option<String>) -> Self {
        match code {
            400 | 422 => ApiError::BadRequest(message),
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden,
            404 => ApiError::NotFound,
            409 => ApiError::Conflict(message),
            500..=599 => ApiError::Server(code),
            _ => ApiError::Unexpected(code),
        }
    }

    /// Text safe to show on a page.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => {
                "Cannot reach the clinic server. Please try again later.".to_string()
            }
            ApiError::BadRequest(Some(msg)) => msg.clone(),
            ApiError::BadRequest(None) => "The request was invalid.".to_string(),
            ApiError::Unauthorized => "Your session has expired. Please log in again.".to_string(),
            ApiError::Forbidden => {
                "You do not have permission to perform this action.".to_string()
            }
            ApiError::NotFound => "The requested record was not found.".to_string(),
            ApiError::Conflict(Some(msg)) => msg.clone(),
            ApiError::Conflict(None) => "This time slot is no longer available.".to_string(),
            ApiError::Server(_) => {
                "The clinic server encountered an error. Please try again later.".to_string()
            }
            ApiError::Unexpected(code) => format!("Unexpected response from server (HTTP {code})."),
            ApiError::Decode(_) => "The server returned data in an unexpected format.".to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e) => write!(f, "Backend unreachable: {e}"),
            ApiError::BadRequest(msg) => {
                write!(f, "Backend rejected request: {}", msg.as_deref().unwrap_or("no message"))
            }
            ApiError::Unauthorized => write!(f, "Backend returned 401 Unauthorized"),
            ApiError::Forbidden => write!(f, "Backend returned 403 Forbidden"),
            ApiError::NotFound => write!(f, "Backend returned 404 Not Found"),
            ApiError::Conflict(msg) => {
                write!(f, "Backend reported conflict: {}", msg.as_deref().unwrap_or("no message"))
            }
            ApiError::Server(code) => write!(f, "Backend server error: HTTP {code}"),
            ApiError::Unexpected(code) => write!(f, "Unexpected backend status: HTTP {code}"),
            ApiError::Decode(e) => write!(f, "Could not decode backend response: {e}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            ApiError::from_status(status.as_u16(), None)
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_variants() {
        assert_eq!(ApiError::from_status(400, None), ApiError::BadRequest(None));
        assert_eq!(ApiError::from_status(422, Some("bad".into())), ApiError::BadRequest(Some("bad".into())));
        assert_eq!(ApiError::from_status(401, None), ApiError::Unauthorized);
        assert_eq!(ApiError::from_status(403, None), ApiError::Forbidden);
        assert_eq!(ApiError::from_status(404, None), ApiError::NotFound);
        assert_eq!(ApiError::from_status(409, None), ApiError::Conflict(None));
        assert_eq!(ApiError::from_status(503, None), ApiError::Server(503));
        assert_eq!(ApiError::from_status(418, None), ApiError::Unexpected(418));
    }

    #[test]
    fn backend_message_preferred_for_bad_request() {
        let err = ApiError::BadRequest(Some("Email already registered".into()));
        assert_eq!(err.user_message(), "Email already registered");
    }

    #[test]
    fn conflict_without_message_mentions_slot() {
        assert!(ApiError::Conflict(None).user_message().contains("time slot"));
    }
}
