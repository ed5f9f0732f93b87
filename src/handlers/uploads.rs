use std::sync::Arc;

use anyhow::Result;
use teloxide::types::Message;

use crate::catalog::CANCEL_BUTTON;
use crate::config::Config;
use crate::database::queries::{self, NewAsset};
use crate::database::AssetKind;
use crate::types::{BotType, DbConn, DialogueWithState, PendingOrder};

use super::orders::{complete_order, upload_progress};
use super::send_message::BetterSendMessage as _;

pub async fn receive_upload(
    db: Arc<DbConn>,
    config: Arc<Config>,
    bot: BotType,
    dialogue: DialogueWithState,
    msg: Message,
    pending: PendingOrder,
) -> Result<()> {
    let Some((file_id, asset_kind)) = extract_asset(&msg) else {
        let received = queries::count_assets(&db, pending.order_id).await?;
        bot.send_message_buttons(
            msg.chat.id,
            format!(
                "Пришлите фото или файл. {}",
                upload_progress(&pending, received)
            ),
            vec![CANCEL_BUTTON],
        )
        .await?;
        return Ok(());
    };

    log::debug!(
        "Got {:?} {:?} for order {}",
        asset_kind,
        file_id,
        pending.order_id
    );

    queries::insert_asset(
        &db,
        NewAsset {
            order_id: pending.order_id,
            file_id,
            asset_kind,
            chat_id: msg.chat.id.0,
            message_id: msg.id.0,
        },
    )
    .await?;

    let received = queries::count_assets(&db, pending.order_id).await?;

    if received < i64::from(pending.expected) {
        bot.send_message_buttons(
            msg.chat.id,
            upload_progress(&pending, received),
            vec![CANCEL_BUTTON],
        )
        .await?;
        return Ok(());
    }

    complete_order(&db, &config, &bot, &dialogue, msg.chat.id, &pending).await
}

/// Largest photo size or the attached document.
fn extract_asset(msg: &Message) -> Option<(String, AssetKind)> {
    if let Some(photo) = msg.photo().and_then(|sizes| sizes.last()) {
        return Some((photo.file.id.to_string(), AssetKind::Photo));
    }

    msg.document()
        .map(|document| (document.file.id.to_string(), AssetKind::Document))
}
