use crate::{catalog::Service, database::AssetKind};

#[derive(Debug, Clone)]
pub struct NewOrder {
  pub user_id: i64,
  pub username: Option<String>,
  pub display_name: String,
  pub service: Service,
  pub studio: String, // studio key
  pub details: String,
  pub total_price: i64,
  pub expected_uploads: i64,
}

#[derive(Debug, Clone)]
pub struct NewAsset {
  pub order_id: i64,
  pub file_id: String,
  pub asset_kind: AssetKind,
  pub chat_id: i64,
  pub message_id: i32,
}

#[derive(Debug, Clone, Default)]
pub struct OrderStats {
  pub total_orders: i64,
  pub incomplete_orders: i64,

  pub document_photo_orders: i64,
  pub photo_print_orders: i64,
  pub document_print_orders: i64,
  pub souvenir_orders: i64,

  pub total_assets: i64,
  pub total_revenue: i64, // completed orders only
  pub last_order_at: i64,
}
