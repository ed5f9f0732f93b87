use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::types::DbConn;

pub mod entities;
pub mod queries;

pub use entities::*;

pub async fn connect(location: &str) -> Result<DbConn> {
    log::debug!("Opening/creating database at {:?}", location);

    let options = SqliteConnectOptions::new()
        .filename(location)
        .create_if_missing(true)
        .foreign_keys(true);

    let db = SqlitePoolOptions::new().connect_with(options).await?;
    migrate(&db).await?;

    Ok(db)
}

async fn migrate(db: &DbConn) -> Result<()> {
    log::debug!("Running migrations");
    sqlx::migrate!().run(db).await?;
    Ok(())
}

// A single connection that never expires, otherwise the in-memory
// database would vanish between queries.
#[cfg(test)]
pub async fn connect_in_memory() -> Result<DbConn> {
    use std::str::FromStr;

    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let db = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;
    migrate(&db).await?;

    Ok(db)
}
