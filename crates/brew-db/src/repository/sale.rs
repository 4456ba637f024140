//! # Sale Repository
//!
//! Database operations for sales and sold items.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. CREATE (single transaction)                                        │
//! │     └── create_with_items() → sale row + one sold_items row per item   │
//! │         All-or-nothing: any insert failure rolls the whole sale back.  │
//! │                                                                         │
//! │  2. READ                                                               │
//! │     └── list_with_items() → sales newest-first, items attached         │
//! │                                                                         │
//! │  Sales are immutable once created. Stock adjustment is NOT part of     │
//! │  this repository's transaction; the sale route applies it afterwards   │
//! │  per item (see apps/server/src/routes/sales.rs).                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use brew_core::{Sale, SoldItem};

/// Input record for one line item of a sale to be created.
///
/// The `product_id` must already be resolved to an existing product; the
/// remaining fields are denormalized snapshots taken from the request.
#[derive(Debug, Clone)]
pub struct NewSoldItem {
    pub product_id: String,
    pub product_code: Option<String>,
    pub name: String,
    pub quantity: i64,
    pub price: f64,
}

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Creates a sale together with its sold items in a single transaction.
    ///
    /// ## Atomicity
    /// The sale row and all sold_items rows commit together or not at all.
    /// A foreign key failure on any item (product vanished between
    /// resolution and insert) leaves no partial sale behind.
    ///
    /// ## Arguments
    /// Totals are caller-supplied and stored verbatim; this method does not
    /// recompute or cross-check them against the items.
    ///
    /// ## Returns
    /// The created sale including its items, in insertion order.
    pub async fn create_with_items(
        &self,
        subtotal: f64,
        tax: f64,
        total_amount: f64,
        items: &[NewSoldItem],
    ) -> DbResult<Sale> {
        let sale_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(id = %sale_id, items = items.len(), "Creating sale");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO sales (id, date, subtotal, tax, total_amount)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&sale_id)
        .bind(now)
        .bind(subtotal)
        .bind(tax)
        .bind(total_amount)
        .execute(&mut *tx)
        .await?;

        let mut sold_items = Vec::with_capacity(items.len());

        for item in items {
            let item_id = Uuid::new_v4().to_string();

            sqlx::query(
                r#"
                INSERT INTO sold_items (
                    id, sale_id, product_id, product_code, name, quantity, price
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(&item_id)
            .bind(&sale_id)
            .bind(&item.product_id)
            .bind(&item.product_code)
            .bind(&item.name)
            .bind(item.quantity)
            .bind(item.price)
            .execute(&mut *tx)
            .await?;

            sold_items.push(SoldItem {
                id: item_id,
                sale_id: sale_id.clone(),
                product_id: item.product_id.clone(),
                product_code: item.product_code.clone(),
                name: item.name.clone(),
                quantity: item.quantity,
                price: item.price,
            });
        }

        tx.commit().await?;

        Ok(Sale {
            id: sale_id,
            date: now,
            subtotal,
            tax,
            total_amount,
            sold_items,
        })
    }

    /// Lists all sales with their items, ordered by date descending.
    pub async fn list_with_items(&self) -> DbResult<Vec<Sale>> {
        let mut sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, date, subtotal, tax, total_amount
            FROM sales
            ORDER BY date DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        for sale in &mut sales {
            sale.sold_items = self.get_items(&sale.id).await?;
        }

        debug!(count = sales.len(), "Listed sales");
        Ok(sales)
    }

    /// Gets all items for a sale, in insertion order.
    pub async fn get_items(&self, sale_id: &str) -> DbResult<Vec<SoldItem>> {
        let items = sqlx::query_as::<_, SoldItem>(
            r#"
            SELECT id, sale_id, product_id, product_code, name, quantity, price
            FROM sold_items
            WHERE sale_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Counts total sales (for diagnostics and tests).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use crate::repository::product::generate_product_id;
    use brew_core::Product;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_product(db: &Database, code: &str, name: &str, price: f64, stock: i64) -> Product {
        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            product_code: code.to_string(),
            name: name.to_string(),
            price,
            stock_quantity: stock,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await.unwrap();
        product
    }

    fn line(product: &Product, quantity: i64) -> NewSoldItem {
        NewSoldItem {
            product_id: product.id.clone(),
            product_code: Some(product.product_code.clone()),
            name: product.name.clone(),
            quantity,
            price: product.price,
        }
    }

    #[tokio::test]
    async fn test_create_with_items_persists_sale_and_items() {
        let db = test_db().await;
        let espresso = seed_product(&db, "ESP-1001", "Espresso Shot", 3.0, 30).await;
        let bagel = seed_product(&db, "BG-3003", "Fresh Bagel", 2.25, 50).await;

        let sale = db
            .sales()
            .create_with_items(
                8.25,
                0.66,
                8.91,
                &[line(&espresso, 2), line(&bagel, 1)],
            )
            .await
            .unwrap();

        assert_eq!(sale.sold_items.len(), 2);
        assert_eq!(sale.total_amount, 8.91);

        let listed = db.sales().list_with_items().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, sale.id);
        assert_eq!(listed[0].sold_items.len(), 2);
        // Insertion order preserved
        assert_eq!(listed[0].sold_items[0].name, "Espresso Shot");
        assert_eq!(listed[0].sold_items[1].name, "Fresh Bagel");
    }

    #[tokio::test]
    async fn test_create_with_items_is_all_or_nothing() {
        let db = test_db().await;
        let espresso = seed_product(&db, "ESP-1001", "Espresso Shot", 3.0, 30).await;

        // Second item violates the product foreign key, so the whole
        // transaction must roll back, including the first item.
        let bogus = NewSoldItem {
            product_id: "no-such-product".to_string(),
            product_code: None,
            name: "Ghost".to_string(),
            quantity: 1,
            price: 1.0,
        };

        let err = db
            .sales()
            .create_with_items(4.0, 0.32, 4.32, &[line(&espresso, 1), bogus])
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        assert_eq!(db.sales().count().await.unwrap(), 0);
        assert!(db.sales().list_with_items().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_with_items_orders_by_date_desc() {
        let db = test_db().await;
        let espresso = seed_product(&db, "ESP-1001", "Espresso Shot", 3.0, 30).await;

        let first = db
            .sales()
            .create_with_items(3.0, 0.24, 3.24, &[line(&espresso, 1)])
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = db
            .sales()
            .create_with_items(6.0, 0.48, 6.48, &[line(&espresso, 2)])
            .await
            .unwrap();

        let listed = db.sales().list_with_items().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
        assert!(listed[0].date >= listed[1].date);
    }
}
