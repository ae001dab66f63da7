use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;
use uuid::Uuid;

use daytrade_db::{
    JournalPool,
    models::{NewProfile, Profile},
};

use crate::{
    AppState,
    dto::{ApiResponse, CreateProfileRequest, ProfileResponse, UpdateProfileRequest},
    errors::{ApiError, DatabaseErrorExt},
};

fn validate_name(name: &str) -> Result<String, ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Name must not be empty".to_string()));
    }
    Ok(name.to_string())
}

fn validate_email(email: &str) -> Result<String, ApiError> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(ApiError::BadRequest(format!("Invalid email address: {email}"))),
    }
}

#[utoipa::path(
    post,
    path = "/v1/users",
    tag = "Profile",
    request_body = CreateProfileRequest,
    responses(
        (status = 201, description = "Profile created", body = ApiResponse<ProfileResponse>),
        (status = 400, description = "Invalid name or email"),
        (status = 409, description = "Email already registered"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn create_profile(
    State(state): State<AppState>,
    Json(payload): Json<CreateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let new_profile = NewProfile::user(validate_name(&payload.name)?, validate_email(&payload.email)?);
    let email = new_profile.email.clone();

    let profile = state
        .pool
        .interact_with_context(format!("create profile for {email}"), move |conn| {
            Profile::create(&new_profile, conn)
        })
        .await
        .map_err(|e| {
            if e.is_unique_violation() {
                ApiError::Conflict(format!("Email {email} is already registered"))
            } else {
                e.into()
            }
        })?;

    info!(user_id = %profile.id, "Profile created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(ProfileResponse::from(profile))),
    ))
}

#[utoipa::path(
    get,
    path = "/v1/users/{user_id}",
    tag = "Profile",
    params(("user_id" = Uuid, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User profile", body = ApiResponse<ProfileResponse>),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state
        .pool
        .interact_with_context(format!("find profile {user_id}"), move |conn| {
            Profile::find_by_id(user_id, conn)
        })
        .await
        .map_err(|e| e.or_not_found(format!("User {user_id} not found")))?;

    Ok(Json(ApiResponse::ok(ProfileResponse::from(profile))))
}

#[utoipa::path(
    patch,
    path = "/v1/users/{user_id}",
    tag = "Profile",
    params(("user_id" = Uuid, Path, description = "User identifier")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile renamed", body = ApiResponse<ProfileResponse>),
        (status = 400, description = "Invalid name"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = validate_name(&payload.name)?;

    let profile = state
        .pool
        .interact_with_context(format!("rename profile {user_id}"), move |conn| {
            Profile::update_name(user_id, &name, conn)
        })
        .await
        .map_err(|e| e.or_not_found(format!("User {user_id} not found")))?;

    Ok(Json(ApiResponse::ok(ProfileResponse::from(profile))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert_eq!(validate_email(" Ana@Example.com ").unwrap(), "ana@example.com");
        assert!(validate_email("ana").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("ana@localhost").is_err());
    }

    #[test]
    fn test_validate_name_trims() {
        assert_eq!(validate_name("  Ana  ").unwrap(), "Ana");
        assert!(validate_name("   ").is_err());
    }
}
