//! # Route Handlers
//!
//! One module per resource, assembled into the application router here.
//!
//! ## Route Table
//! ```text
//! GET    /api/health           health::health
//! GET    /api/products         products::list_products
//! POST   /api/products         products::create_product
//! GET    /api/products/{id}    products::get_product
//! PUT    /api/products/{id}    products::update_product
//! DELETE /api/products/{id}    products::delete_product
//! GET    /api/sales            sales::list_sales
//! POST   /api/sales            sales::record_sale
//! GET    /api/users            users::list_users
//! POST   /api/users            users::create_user
//! ```

pub mod health;
pub mod products;
pub mod sales;
pub mod users;

use axum::routing::get;
use axum::Router;

use crate::AppState;

/// Builds the application router with all routes registered.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health))
        .route(
            "/api/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/api/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route(
            "/api/sales",
            get(sales::list_sales).post(sales::record_sale),
        )
        .route(
            "/api/users",
            get(users::list_users).post(users::create_user),
        )
        .with_state(state)
}
