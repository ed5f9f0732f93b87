use anyhow::Result;

use crate::{database::OrderAsset, types::DbConn, util};

use super::NewAsset;

pub async fn insert_asset(db: &DbConn, asset: NewAsset) -> Result<()> {
  log::debug!("insert_asset: {:?}", asset);

  sqlx::query(
    "INSERT INTO order_assets (order_id, file_id, asset_kind, chat_id, message_id, created_at) \
      VALUES ($1, $2, $3, $4, $5, $6)",
  )
  .bind(asset.order_id)
  .bind(asset.file_id)
  .bind(asset.asset_kind)
  .bind(asset.chat_id)
  .bind(asset.message_id)
  .bind(util::get_unix())
  .execute(db)
  .await?;

  Ok(())
}

pub async fn count_assets(db: &DbConn, order_id: i64) -> Result<i64> {
  log::debug!("count_assets for order_id: {:?}", order_id);

  let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_assets WHERE order_id = $1")
    .bind(order_id)
    .fetch_one(db)
    .await?;

  log::debug!("count_assets result: {:?}", result);

  Ok(result)
}

pub async fn list_assets(db: &DbConn, order_id: i64) -> Result<Vec<OrderAsset>> {
  log::debug!("list_assets for order_id: {:?}", order_id);

  let result: Vec<OrderAsset> = sqlx::query_as(
    "SELECT * FROM order_assets \
      WHERE order_id = $1 \
      ORDER BY asset_id",
  )
  .bind(order_id)
  .fetch_all(db)
  .await?;

  Ok(result)
}
