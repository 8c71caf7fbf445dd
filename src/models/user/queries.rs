use crate::api::{ApiClient, ApiError};

use super::types::{
    ActiveUpdate, LoginRequest, LoginResponse, ProfileUpdate, RegisterRequest, UserProfile,
};

pub async fn login(api: &ApiClient, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
    let body = LoginRequest { email: email.trim(), password };
    api.post("/auth/login", None, &body).await
}

pub async fn register(api: &ApiClient, req: &RegisterRequest) -> Result<UserProfile, ApiError> {
    api.post("/auth/register", None, req).await
}

pub async fn find_me(api: &ApiClient, token: &str) -> Result<UserProfile, ApiError> {
    api.get("/users/me", Some(token)).await
}

pub async fn update_me(api: &ApiClient, token: &str, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
    api.put("/users/me", Some(token), update).await
}

/// Admin only: every account known to the backend.
pub async fn find_all(api: &ApiClient, token: &str) -> Result<Vec<UserProfile>, ApiError> {
    api.get("/admin/users", Some(token)).await
}

pub async fn set_active(api: &ApiClient, token: &str, user_id: i64, active: bool) -> Result<UserProfile, ApiError> {
    api.put(&format!("/admin/users/{user_id}/active"), Some(token), &ActiveUpdate { active })
        .await
}
