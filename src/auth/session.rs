use actix_session::Session;
use chrono::Utc;

use crate::errors::AppError;
use crate::models::user::{LoginResponse, Role, UserProfile};

const TOKEN_KEY: &str = "token";
const PROFILE_KEY: &str = "profile";
const EXPIRES_KEY: &str = "expires_at";
const FLASH_KEY: &str = "flash";

/// Upper bound on a session lifetime, whatever the backend or config says.
pub const MAX_LIFETIME_SECS: i64 = 30 * 24 * 60 * 60;

/// Everything the portal knows about the signed-in user.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub token: String,
    pub profile: UserProfile,
    /// Unix seconds.
    pub expires_at: i64,
}

impl AuthSession {
    /// Build from a login response. The backend's `expiresIn` wins over the
    /// configured TTL. Either is capped at [`MAX_LIFETIME_SECS`].
    pub fn from_login(login: LoginResponse, ttl_minutes: i64, now: i64) -> Self {
        let lifetime = login
            .expires_in
            .filter(|secs| *secs > 0)
            .unwrap_or_else(|| ttl_minutes.checked_mul(60).unwrap_or(MAX_LIFETIME_SECS))
            .clamp(0, MAX_LIFETIME_SECS);
        Self {
            token: login.token,
            profile: login.user,
            expires_at: now.saturating_add(lifetime),
        }
    }

    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.expires_at
    }

    pub fn role(&self) -> Role {
        self.profile.role
    }
}

/// The single entry point for reading and writing the login state kept in the
/// cookie session.
pub struct SessionManager<'a> {
    session: &'a Session,
}

impl<'a> SessionManager<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    pub fn set(&self, auth: &AuthSession) -> Result<(), AppError> {
        self.session.renew();
        self.session
            .insert(TOKEN_KEY, &auth.token)
            .and_then(|_| self.session.insert(PROFILE_KEY, &auth.profile))
            .and_then(|_| self.session.insert(EXPIRES_KEY, auth.expires_at))
            .map_err(|e| AppError::Session(format!("Failed to store session: {e}")))
    }

    /// Stored login state, expired or not. `None` when any part is missing or
    /// unreadable.
    pub fn get(&self) -> Option<AuthSession> {
        let token = self.session.get::<String>(TOKEN_KEY).ok().flatten()?;
        let profile = self.session.get::<UserProfile>(PROFILE_KEY).ok().flatten()?;
        let expires_at = self.session.get::<i64>(EXPIRES_KEY).ok().flatten()?;
        Some(AuthSession { token, profile, expires_at })
    }

    /// Drop login state but keep the cookie, so a flash can still be carried.
    pub fn clear(&self) {
        self.session.remove(TOKEN_KEY);
        self.session.remove(PROFILE_KEY);
        self.session.remove(EXPIRES_KEY);
    }

    pub fn is_expired(&self) -> bool {
        match self.get() {
            Some(auth) => auth.is_expired_at(Utc::now().timestamp()),
            None => true,
        }
    }

    /// Live login state, or `AppError::Session` when missing or expired.
    pub fn current(&self) -> Result<AuthSession, AppError> {
        let auth = self
            .get()
            .ok_or_else(|| AppError::Session("Not logged in".to_string()))?;
        if auth.is_expired_at(Utc::now().timestamp()) {
            self.clear();
            return Err(AppError::Session("Session expired".to_string()));
        }
        Ok(auth)
    }

    pub fn token(&self) -> Result<String, AppError> {
        self.current().map(|a| a.token)
    }

    pub fn profile(&self) -> Result<UserProfile, AppError> {
        self.current().map(|a| a.profile)
    }

    /// Replace the cached profile after an account update.
    pub fn update_profile(&self, profile: &UserProfile) -> Result<(), AppError> {
        self.session
            .insert(PROFILE_KEY, profile)
            .map_err(|e| AppError::Session(format!("Failed to store session: {e}")))
    }
}

/// Current user with the given role, or `PermissionDenied`.
pub fn require_role(session: &Session, role: Role) -> Result<AuthSession, AppError> {
    let auth = SessionManager::new(session).current()?;
    if auth.role() == role {
        Ok(auth)
    } else {
        Err(AppError::PermissionDenied(format!("{} only", role.label())))
    }
}

pub fn set_flash(session: &Session, message: &str) {
    let _ = session.insert(FLASH_KEY, message);
}

pub fn take_flash(session: &Session) -> Option<String> {
    let flash = session.get::<String>(FLASH_KEY).unwrap_or(None);
    if flash.is_some() {
        session.remove(FLASH_KEY);
    }
    flash
}
