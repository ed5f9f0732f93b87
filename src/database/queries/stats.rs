use anyhow::Result;

use crate::{catalog::Service, database::queries::OrderStats, types::DbConn};

pub async fn get_order_stats(db: &DbConn) -> Result<OrderStats> {
  log::debug!("get_order_stats");

  let (total_orders, last_order_at): (i64, i64) =
    sqlx::query_as("SELECT COUNT(*), COALESCE(MAX(created_at), 0) FROM orders")
      .fetch_one(db)
      .await?;

  // An order is complete once all of its expected files arrived
  let (incomplete_orders, total_revenue): (i64, i64) = sqlx::query_as(
    "SELECT \
      COALESCE(SUM(CASE WHEN received < expected_uploads THEN 1 ELSE 0 END), 0), \
      COALESCE(SUM(CASE WHEN received >= expected_uploads THEN total_price ELSE 0 END), 0) \
      FROM (SELECT orders.expected_uploads, orders.total_price, \
        (SELECT COUNT(*) FROM order_assets WHERE order_assets.order_id = orders.order_id) AS received \
        FROM orders)",
  )
  .fetch_one(db)
  .await?;

  let (document_photo_orders, photo_print_orders, document_print_orders, souvenir_orders): (
    i64,
    i64,
    i64,
    i64,
  ) = sqlx::query_as(
    "SELECT \
      (SELECT COUNT(*) FROM orders WHERE service = $1) AS document_photo_orders, \
      (SELECT COUNT(*) FROM orders WHERE service = $2) AS photo_print_orders, \
      (SELECT COUNT(*) FROM orders WHERE service = $3) AS document_print_orders, \
      (SELECT COUNT(*) FROM orders WHERE service = $4) AS souvenir_orders",
  )
  .bind(Service::DocumentPhoto)
  .bind(Service::PhotoPrint)
  .bind(Service::DocumentPrint)
  .bind(Service::Souvenir)
  .fetch_one(db)
  .await?;

  let total_assets: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_assets")
    .fetch_one(db)
    .await?;

  let result = OrderStats {
    total_orders,
    incomplete_orders,
    document_photo_orders,
    photo_print_orders,
    document_print_orders,
    souvenir_orders,
    total_assets,
    total_revenue,
    last_order_at,
  };

  log::debug!("get_order_stats result: {:?}", result);

  Ok(result)
}
