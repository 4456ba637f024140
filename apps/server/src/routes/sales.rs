//! # Sales Routes
//!
//! The sale-recording workflow - the core of this service.
//!
//! ## Recording Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      POST /api/sales                                    │
//! │                                                                         │
//! │  1. RESOLVE (per line item)                                            │
//! │     └── productId verified, else productCode lookup                    │
//! │         unresolvable → 400 {"error","item"}, nothing persisted         │
//! │                                                                         │
//! │  2. PERSIST (single transaction)                                       │
//! │     └── one sale row + one sold_items row per item, all-or-nothing     │
//! │         failure → 500 {"error":"Failed to record sale"}                │
//! │                                                                         │
//! │  3. DECREMENT STOCK (separate statements, AFTER the commit)            │
//! │     └── per original line item: attached productId, else code lookup   │
//! │         failure → 500, but the sale and any decrements already         │
//! │         applied stay committed (known inconsistency window)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Totals (`subtotal`, `tax`, `totalAmount`) are stored exactly as received;
//! the server does not recompute them from the line items. See DESIGN.md for
//! the record of both preserved behaviors.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::ApiError;
use crate::resolver::resolve_product_id;
use crate::AppState;
use brew_core::Sale;
use brew_db::{DbError, NewSoldItem};

// =============================================================================
// Request Types
// =============================================================================

/// One cart entry in a sale request.
///
/// `productId` and `productCode` are both optional; at least one of them
/// must identify an existing product or the request is rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLineItem {
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub product_code: Option<String>,
    pub name: String,
    pub quantity: i64,
    pub price: f64,
}

/// Body of `POST /api/sales`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSaleRequest {
    pub sold_items: Vec<SaleLineItem>,
    pub subtotal: f64,
    pub tax: f64,
    pub total_amount: f64,
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /api/sales`
///
/// Lists sales newest-first, each with its nested `soldItems`.
///
/// Read failures degrade to an empty list: this route always answers 200,
/// so callers cannot distinguish "no sales" from "read failed". The failure
/// is logged at error level instead.
pub async fn list_sales(State(state): State<AppState>) -> Json<Vec<Sale>> {
    match state.db.sales().list_with_items().await {
        Ok(sales) => Json(sales),
        Err(err) => {
            error!(error = %err, "Fetch sales error");
            Json(Vec::new())
        }
    }
}

/// `POST /api/sales`
///
/// Records a sale: resolves every line item to an existing product, persists
/// the sale with its items in one transaction, then decrements stock per
/// item. See the module docs for the exact failure semantics of each stage.
pub async fn record_sale(
    State(state): State<AppState>,
    Json(req): Json<RecordSaleRequest>,
) -> Result<(StatusCode, Json<Sale>), ApiError> {
    let products = state.db.products();

    // Normalize the sold items: every one must resolve to an existing
    // product id, or the whole request is rejected before anything persists.
    let mut normalized = Vec::with_capacity(req.sold_items.len());
    for item in &req.sold_items {
        let resolved = resolve_product_id(
            &products,
            item.product_id.as_deref(),
            item.product_code.as_deref(),
        )
        .await
        .map_err(record_failure)?;

        let Some(product_id) = resolved else {
            error!(item = ?item, "Product referenced in sale not found");
            return Err(ApiError::product_not_found(item));
        };

        normalized.push(NewSoldItem {
            product_id,
            product_code: item.product_code.clone(),
            name: item.name.clone(),
            quantity: item.quantity,
            price: item.price,
        });
    }

    let sale = state
        .db
        .sales()
        .create_with_items(req.subtotal, req.tax, req.total_amount, &normalized)
        .await
        .map_err(record_failure)?;

    // Adjust stock for each original line item. This runs AFTER the sale
    // transaction has committed, one UPDATE per item: a failure here leaves
    // the sale and any earlier decrements in place. The raw productId is
    // used when attached (even if resolution fell back to the code), else
    // the id is looked up by code; items resolving to nothing are skipped.
    for item in &req.sold_items {
        let id_to_use = match &item.product_id {
            Some(id) => Some(id.clone()),
            None => match &item.product_code {
                Some(code) => products
                    .get_by_code(code)
                    .await
                    .map_err(record_failure)?
                    .map(|p| p.id),
                None => None,
            },
        };

        if let Some(id) = id_to_use {
            products
                .adjust_stock(&id, -item.quantity)
                .await
                .map_err(record_failure)?;
        }
    }

    info!(sale_id = %sale.id, items = sale.sold_items.len(), total = %sale.total_amount, "Sale recorded");

    Ok((StatusCode::CREATED, Json(sale)))
}

/// Maps any persistence failure in the recording flow to the fixed
/// 500 response body.
fn record_failure(err: DbError) -> ApiError {
    error!(error = %err, "Record sale error");
    ApiError::RecordSaleFailed
}
