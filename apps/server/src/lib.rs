//! # brew-server: HTTP API for BrewPOS
//!
//! Axum server exposing the storefront/admin JSON API over the brew-db
//! repositories.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Request Flow                                     │
//! │                                                                         │
//! │  POST /api/sales                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  routes/sales.rs ── resolver.rs ──► ProductRepository (id/code lookup) │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SaleRepository::create_with_items (single transaction)               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ProductRepository::adjust_stock per item (separate statements)       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  201 Created + Sale JSON                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Environment-based server configuration
//! - [`error`] - `ApiError`: HTTP status + JSON body mapping
//! - [`resolver`] - Product Resolver (line item → canonical product id)
//! - [`routes`] - Route handlers and router assembly

pub mod config;
pub mod error;
pub mod resolver;
pub mod routes;

use brew_db::Database;

pub use routes::build_router;

/// Shared application state available to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}
