//! # Product Routes
//!
//! Admin CRUD for the product catalog. Unlike the sales routes these have no
//! compatibility constraints, so they surface real statuses (404/400/409).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::error::ApiError;
use crate::AppState;
use brew_core::validation::{
    validate_price, validate_product_code, validate_product_name, validate_stock_quantity,
};
use brew_core::Product;
use brew_db::repository::product::generate_product_id;

// =============================================================================
// Request Types
// =============================================================================

/// Body of `POST /api/products`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub product_code: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub stock_quantity: i64,
}

/// Body of `PUT /api/products/{id}`. Absent fields keep their value.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[serde(default)]
    pub product_code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /api/products` - lists the catalog ordered by name.
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state.db.products().list().await?;
    Ok(Json(products))
}

/// `GET /api/products/{id}`
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let product = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product"))?;

    Ok(Json(product))
}

/// `POST /api/products`
///
/// 201 with the created product; 400 on validation failure; 409 when the
/// product code is already taken.
pub async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    validate_product_code(&req.product_code)?;
    validate_product_name(&req.name)?;
    validate_price(req.price)?;
    validate_stock_quantity(req.stock_quantity)?;

    let now = Utc::now();
    let product = Product {
        id: generate_product_id(),
        product_code: req.product_code,
        name: req.name,
        price: req.price,
        stock_quantity: req.stock_quantity,
        created_at: now,
        updated_at: now,
    };

    state.db.products().insert(&product).await?;

    info!(id = %product.id, product_code = %product.product_code, "Product created");

    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT /api/products/{id}`
///
/// Partial update: only the supplied fields change. Returns the stored
/// product after the update.
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<Product>, ApiError> {
    let repo = state.db.products();

    let mut product = repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product"))?;

    if let Some(product_code) = req.product_code {
        validate_product_code(&product_code)?;
        product.product_code = product_code;
    }
    if let Some(name) = req.name {
        validate_product_name(&name)?;
        product.name = name;
    }
    if let Some(price) = req.price {
        validate_price(price)?;
        product.price = price;
    }
    if let Some(stock_quantity) = req.stock_quantity {
        validate_stock_quantity(stock_quantity)?;
        product.stock_quantity = stock_quantity;
    }

    repo.update(&product).await?;

    // Re-read so the response carries the stored updated_at
    let stored = repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product"))?;

    info!(id = %stored.id, "Product updated");

    Ok(Json(stored))
}

/// `DELETE /api/products/{id}`
///
/// 204 on success; 404 for an unknown id; 400 when sold items still
/// reference the product (foreign key restriction).
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.db.products().delete(&id).await?;

    info!(id = %id, "Product deleted");

    Ok(StatusCode::NO_CONTENT)
}
