use crate::catalog::Service;

#[derive(Clone, Copy, Debug, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
pub enum AssetKind {
    Photo,
    Document,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Order {
    pub order_id: i64,
    pub user_id: i64,
    pub username: Option<String>,
    pub display_name: String,
    pub service: Service,
    pub studio: String,
    pub details: String,
    pub total_price: i64,
    pub expected_uploads: i64,
    pub created_at: i64,
}

impl Order {
    /// "@username" when the user has one, the display name otherwise.
    pub fn client_handle(&self) -> String {
        match &self.username {
            Some(username) => format!("@{}", username),
            None => self.display_name.clone(),
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderAsset {
    pub asset_id: i64,
    pub order_id: i64,
    pub file_id: String,
    pub asset_kind: AssetKind,
    pub chat_id: i64,
    pub message_id: i32,
}
