//! One-shot admin account seeder.
//!
//! Reads ADMIN_USERNAME / ADMIN_EMAIL / ADMIN_PASSWORD from the environment
//! and inserts the account, or refreshes its credentials when the email
//! already exists. Safe to re-run.

use std::env;

use atelier_api::database::models::Admin;
use atelier_api::{auth, database};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    if let Err(err) = seed().await {
        eprintln!("seed failed: {}", err);
        std::process::exit(1);
    }
}

async fn seed() -> Result<(), Box<dyn std::error::Error>> {
    let username = env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
    let email = env::var("ADMIN_EMAIL").map_err(|_| "ADMIN_EMAIL is required")?;
    let password = env::var("ADMIN_PASSWORD").map_err(|_| "ADMIN_PASSWORD is required")?;

    if password.len() < 6 {
        return Err("ADMIN_PASSWORD must be at least 6 characters".into());
    }

    let pool = database::init_pool().await?;
    let hash = auth::hash_password(password).await?;
    let admin = Admin::upsert_by_email(&pool, &username, &email, &hash).await?;

    println!("admin #{} {} <{}> ready", admin.id, admin.username, admin.email);
    Ok(())
}
