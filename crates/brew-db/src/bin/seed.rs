//! # Seed Data Generator
//!
//! Populates the database with the demo storefront data for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p brew-db --bin seed
//!
//! # Specify database path
//! cargo run -p brew-db --bin seed -- --db ./data/brewpos.db
//! ```
//!
//! ## Generated Data
//! - An `admin` user (password `123`, argon2-hashed, role ADMIN) — upserted,
//!   so repeated runs refresh the credentials instead of failing
//! - Three products, inserted only if their code is not present yet:
//!   ESP-1001 Espresso Shot, CAP-2002 Cappuccino, BG-3003 Fresh Bagel

use chrono::Utc;
use std::env;

use brew_core::auth::hash_password;
use brew_core::{Product, User, UserRole};
use brew_db::repository::product::generate_product_id;
use brew_db::repository::user::generate_user_id;
use brew_db::{Database, DbConfig};

/// Demo catalog: (code, name, price, stock).
const PRODUCTS: &[(&str, &str, f64, i64)] = &[
    ("ESP-1001", "Espresso Shot", 3.0, 30),
    ("CAP-2002", "Cappuccino", 4.5, 24),
    ("BG-3003", "Fresh Bagel", 2.25, 50),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./brewpos.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("BrewPOS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./brewpos.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 BrewPOS Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");
    println!();

    // Admin user: upsert so reruns refresh the password hash
    let admin = User {
        id: generate_user_id(),
        username: "admin".to_string(),
        password_hash: hash_password("123")?,
        name: "Administrator".to_string(),
        role: UserRole::Admin,
        created_at: Utc::now(),
    };
    db.users().upsert(&admin).await?;
    println!("✓ Upserted user 'admin'");

    // Products: insert only the ones not present yet (codes are unique)
    let now = Utc::now();
    for (code, name, price, stock) in PRODUCTS {
        if db.products().get_by_code(code).await?.is_some() {
            println!("- {} already present, skipping", code);
            continue;
        }

        let product = Product {
            id: generate_product_id(),
            product_code: code.to_string(),
            name: name.to_string(),
            price: *price,
            stock_quantity: *stock,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await?;
        println!("✓ Inserted {} ({})", code, name);
    }

    let total = db.products().count().await?;
    println!();
    println!("✓ Seed complete! {} products in catalog", total);

    Ok(())
}
