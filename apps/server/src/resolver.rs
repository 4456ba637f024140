//! # Product Resolver
//!
//! Maps a sale line item's identifying fields to a canonical product id.
//!
//! ## Resolution Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Product Resolution                                  │
//! │                                                                         │
//! │  productId present?                                                    │
//! │       │                                                                 │
//! │       ├── yes ──► exists in products? ──► yes ──► use productId        │
//! │       │                │                                                │
//! │       │                └── no (stale id) ─┐                            │
//! │       │                                   ▼                            │
//! │       └── no ──────────────────► productCode present?                  │
//! │                                       │                                 │
//! │                                       ├── yes ──► lookup by code       │
//! │                                       │              │                  │
//! │                                       │              ├── found → use id │
//! │                                       │              └── miss  → None   │
//! │                                       └── no  ──► None                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A stale id with a valid code falls back silently - no error is surfaced
//! for the mismatch. `None` means the caller must reject the line item.

use brew_db::error::DbResult;
use brew_db::ProductRepository;

/// Resolves a line item to a canonical product id.
///
/// ## Returns
/// * `Ok(Some(id))` - Canonical product id (verified to exist)
/// * `Ok(None)` - Neither field identified an existing product
/// * `Err(DbError)` - A lookup itself failed
pub async fn resolve_product_id(
    products: &ProductRepository,
    product_id: Option<&str>,
    product_code: Option<&str>,
) -> DbResult<Option<String>> {
    if let Some(id) = product_id {
        if products.get_by_id(id).await?.is_some() {
            return Ok(Some(id.to_string()));
        }
    }

    if let Some(code) = product_code {
        if let Some(product) = products.get_by_code(code).await? {
            return Ok(Some(product.id));
        }
    }

    Ok(None)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use brew_core::Product;
    use brew_db::repository::product::generate_product_id;
    use brew_db::{Database, DbConfig};
    use chrono::Utc;

    async fn seeded_db() -> (Database, Product) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            product_code: "ESP-1001".to_string(),
            name: "Espresso Shot".to_string(),
            price: 3.0,
            stock_quantity: 30,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await.unwrap();
        (db, product)
    }

    #[tokio::test]
    async fn test_valid_id_resolves_to_itself() {
        let (db, product) = seeded_db().await;

        let resolved = resolve_product_id(&db.products(), Some(&product.id), None)
            .await
            .unwrap();
        assert_eq!(resolved, Some(product.id));
    }

    #[tokio::test]
    async fn test_missing_id_falls_back_to_code() {
        let (db, product) = seeded_db().await;

        let resolved = resolve_product_id(&db.products(), None, Some("ESP-1001"))
            .await
            .unwrap();
        assert_eq!(resolved, Some(product.id));
    }

    #[tokio::test]
    async fn test_stale_id_falls_back_to_code_silently() {
        let (db, product) = seeded_db().await;

        let resolved = resolve_product_id(&db.products(), Some("stale-id"), Some("ESP-1001"))
            .await
            .unwrap();
        assert_eq!(resolved, Some(product.id));
    }

    #[tokio::test]
    async fn test_unresolvable_item_yields_none() {
        let (db, _product) = seeded_db().await;
        let products = db.products();

        assert_eq!(
            resolve_product_id(&products, Some("stale-id"), Some("NON-EXIST"))
                .await
                .unwrap(),
            None
        );
        assert_eq!(
            resolve_product_id(&products, None, Some("NON-EXIST"))
                .await
                .unwrap(),
            None
        );
        assert_eq!(resolve_product_id(&products, None, None).await.unwrap(), None);
    }
}
