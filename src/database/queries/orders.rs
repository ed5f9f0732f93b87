use anyhow::Result;

use crate::{database::Order, types::DbConn, util};

use super::NewOrder;

pub async fn insert_order(db: &DbConn, order: NewOrder) -> Result<i64> {
    log::debug!("insert_order: {:?}", order);

    let result = sqlx::query(
        "INSERT INTO orders \
          (user_id, username, display_name, service, studio, details, total_price, \
          expected_uploads, created_at) \
          VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(order.user_id)
    .bind(order.username)
    .bind(order.display_name)
    .bind(order.service)
    .bind(order.studio)
    .bind(order.details)
    .bind(order.total_price)
    .bind(order.expected_uploads)
    .bind(util::get_unix())
    .execute(db)
    .await?;

    let order_id = result.last_insert_rowid();

    log::debug!("insert_order result: {:?}", order_id);

    Ok(order_id)
}

pub async fn get_order(db: &DbConn, order_id: i64) -> Result<Option<Order>> {
    log::debug!("get_order: {:?}", order_id);

    let result: Option<Order> = sqlx::query_as("SELECT * FROM orders WHERE order_id = $1")
        .bind(order_id)
        .fetch_optional(db)
        .await?;

    Ok(result)
}

/// Removes an order together with its uploaded assets. Returns false when
/// there was nothing to delete.
pub async fn delete_order(db: &DbConn, order_id: i64) -> Result<bool> {
    log::debug!("delete_order: {:?}", order_id);

    let mut transaction = db.begin().await?;

    sqlx::query("DELETE FROM order_assets WHERE order_id = $1")
        .bind(order_id)
        .execute(transaction.as_mut())
        .await?;

    let deleted = sqlx::query("DELETE FROM orders WHERE order_id = $1")
        .bind(order_id)
        .execute(transaction.as_mut())
        .await?
        .rows_affected();

    transaction.commit().await?;

    log::debug!("delete_order: {:?} removed {} rows", order_id, deleted);

    Ok(deleted > 0)
}

pub async fn recent_orders(db: &DbConn, limit: i64) -> Result<Vec<Order>> {
    log::debug!("recent_orders: limit {:?}", limit);

    let result: Vec<Order> = sqlx::query_as(
        "SELECT * FROM orders \
          ORDER BY created_at DESC, order_id DESC \
          LIMIT $1",
    )
    .bind(limit)
    .fetch_all(db)
    .await?;

    Ok(result)
}

/// The user's newest order that still waits for files, if any.
pub async fn latest_incomplete_order(db: &DbConn, user_id: i64) -> Result<Option<Order>> {
    log::debug!("latest_incomplete_order for user_id: {:?}", user_id);

    let result: Option<Order> = sqlx::query_as(
        "SELECT * FROM orders \
          WHERE user_id = $1 \
          AND expected_uploads > \
            (SELECT COUNT(*) FROM order_assets WHERE order_assets.order_id = orders.order_id) \
          ORDER BY order_id DESC \
          LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    log::debug!(
        "latest_incomplete_order result: {:?}",
        result.as_ref().map(|o| o.order_id)
    );

    Ok(result)
}
