//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in BrewPOS                                │
//! │                                                                         │
//! │  Handler returns Result<T, ApiError>                                   │
//! │       │                                                                 │
//! │       ├── ValidationError (brew-core) ──► 400 {"error": "..."}         │
//! │       │                                                                 │
//! │       ├── DbError (brew-db)                                            │
//! │       │     ├── NotFound        ──► 404 {"error": "..."}               │
//! │       │     ├── UniqueViolation ──► 409 {"error": "..."}               │
//! │       │     ├── ForeignKey      ──► 400 {"error": "Invalid reference"} │
//! │       │     └── anything else   ──► 500 {"error": generic}             │
//! │       │                                                                 │
//! │       ├── Unresolvable line item ──► 400 {"error": "Product not       │
//! │       │                                   found", "item": {...}}       │
//! │       │                                                                 │
//! │       └── Sale persistence/decrement failure                           │
//! │                              ──► 500 {"error": "Failed to record sale"}│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Internal failure details are logged server-side and never leak into the
//! response body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use brew_core::auth::PasswordHashError;
use brew_core::ValidationError;
use brew_db::DbError;

/// API error returned from HTTP handlers.
///
/// Each variant maps to one HTTP status and one JSON body shape.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A sale line item could not be resolved to a product.
    /// The offending item is echoed back for diagnostics.
    #[error("Product not found")]
    ProductNotFound { item: serde_json::Value },

    /// Resource not found (404).
    #[error("{entity} not found")]
    NotFound { entity: String },

    /// Input validation failed (400).
    #[error("{0}")]
    Validation(String),

    /// Unique constraint conflict (409).
    #[error("{0}")]
    Conflict(String),

    /// Sale persistence or stock decrement failed (500).
    /// The body is the fixed message sale clients rely on.
    #[error("Failed to record sale")]
    RecordSaleFailed,

    /// Internal server error (500). Details are logged, not returned.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Creates the 400 resolution-failure error carrying the line item.
    pub fn product_not_found(item: &impl Serialize) -> Self {
        ApiError::ProductNotFound {
            item: serde_json::to_value(item).unwrap_or_default(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(entity: impl Into<String>) -> Self {
        ApiError::NotFound {
            entity: entity.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::ProductNotFound { item } => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Product not found", "item": item }),
            ),
            ApiError::NotFound { entity } => (
                StatusCode::NOT_FOUND,
                json!({ "error": format!("{entity} not found") }),
            ),
            ApiError::Validation(message) => {
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            ApiError::Conflict(message) => (StatusCode::CONFLICT, json!({ "error": message })),
            ApiError::RecordSaleFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Failed to record sale" }),
            ),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": message }))
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, .. } => ApiError::NotFound { entity },
            DbError::UniqueViolation { field } => {
                ApiError::Conflict(format!("Duplicate {field}: already exists"))
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::Validation("Invalid reference".to_string())
            }
            other => {
                // Log the actual error but return a generic message
                tracing::error!("Database error: {}", other);
                ApiError::Internal("Database operation failed".to_string())
            }
        }
    }
}

/// Converts validation errors to API errors.
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

/// Converts password hashing errors to API errors.
impl From<PasswordHashError> for ApiError {
    fn from(err: PasswordHashError) -> Self {
        tracing::error!("{}", err);
        ApiError::Internal("Failed to hash password".to_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
