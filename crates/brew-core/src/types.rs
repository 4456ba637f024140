//! # Domain Types
//!
//! Core domain types used throughout BrewPOS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │    SoldItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  product_code   │   │  date           │   │  sale_id (FK)   │       │
//! │  │  name           │   │  subtotal       │   │  product_id (FK)│       │
//! │  │  price          │   │  tax            │   │  name, price    │       │
//! │  │  stock_quantity │   │  total_amount   │   │  quantity       │       │
//! │  └─────────────────┘   │  sold_items[]   │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │      User       │   │    UserRole     │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  id (UUID)      │   │  Admin          │                             │
//! │  │  username       │   │  Cashier        │                             │
//! │  │  password_hash  │   └─────────────────┘                             │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! A product has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - `product_code`: human-assigned business code (e.g. "ESP-1001")
//!
//! ## Wire Format
//! All types serialize as camelCase JSON (`productCode`, `stockQuantity`,
//! `totalAmount`, `soldItems`) to match the storefront frontend.
//!
//! ## Money Representation
//! Monetary amounts are `f64` and are stored exactly as supplied by the
//! caller. The sale endpoint does not recompute subtotal/tax/total from
//! line items, so no cent-normalization happens anywhere in the pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Human-assigned business code, unique across products (e.g. "ESP-1001").
    pub product_code: String,

    /// Display name shown in the storefront and on sold items.
    pub name: String,

    /// Unit price.
    pub price: f64,

    /// Current inventory count. Decremented on each sale.
    pub stock_quantity: i64,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale transaction.
///
/// A sale is created atomically with its line items and is immutable
/// afterwards. Totals are caller-supplied and stored verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,

    /// Creation timestamp.
    #[ts(as = "String")]
    pub date: DateTime<Utc>,

    pub subtotal: f64,
    pub tax: f64,
    pub total_amount: f64,

    /// Line items, in insertion order. Loaded separately from the sale row.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    #[serde(default)]
    pub sold_items: Vec<SoldItem>,
}

// =============================================================================
// Sold Item
// =============================================================================

/// A line item within a sale.
/// Uses the snapshot pattern to freeze product data at time of sale.
///
/// Invariant: `product_id` references a product that existed when the sale
/// was recorded. The sale endpoint refuses to create an item whose product
/// cannot be resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SoldItem {
    pub id: String,

    /// The sale this item belongs to. Exactly one; deleted with the sale.
    pub sale_id: String,

    /// Canonical product reference, resolved at recording time.
    pub product_id: String,

    /// Product code at time of sale (frozen; optional in the request).
    pub product_code: Option<String>,

    /// Product name at time of sale (frozen).
    pub name: String,

    /// Quantity sold (positive).
    pub quantity: i64,

    /// Unit price at time of sale (frozen).
    pub price: f64,
}

// =============================================================================
// User Role
// =============================================================================

/// Role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    /// Full access: product management, user management.
    Admin,
    /// Storefront access: record sales.
    Cashier,
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Cashier
    }
}

// =============================================================================
// User
// =============================================================================

/// A user account.
///
/// `password_hash` is an argon2 PHC string; the HTTP layer never serializes
/// it to clients (responses go through a DTO that strips it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    /// Unique login name.
    pub username: String,
    pub password_hash: String,
    /// Display name.
    pub name: String,
    pub role: UserRole,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
