//! # User Routes
//!
//! User accounts for the storefront/admin UI. Passwords are argon2-hashed
//! before storage and responses never include hash material - everything
//! goes through [`UserResponse`].

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiError;
use crate::AppState;
use brew_core::auth::hash_password;
use brew_core::validation::{validate_password, validate_username};
use brew_core::{User, UserRole};
use brew_db::repository::user::generate_user_id;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Body of `POST /api/users`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub name: String,
    #[serde(default)]
    pub role: UserRole,
}

/// Wire representation of a user: everything except the password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            username: user.username,
            name: user.name,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /api/users` - lists accounts ordered by username.
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.db.users().list().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// `POST /api/users`
///
/// 201 with the created account; 400 on validation failure; 409 when the
/// username is taken.
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    validate_username(&req.username)?;
    validate_password(&req.password)?;

    let user = User {
        id: generate_user_id(),
        username: req.username,
        password_hash: hash_password(&req.password)?,
        name: req.name,
        role: req.role,
        created_at: Utc::now(),
    };

    state.db.users().insert(&user).await?;

    info!(id = %user.id, username = %user.username, "User created");

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}
