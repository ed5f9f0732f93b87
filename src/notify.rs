use teloxide::prelude::*;
use teloxide::types::{ChatId, MessageId};
use teloxide::utils::html;

use crate::catalog::Studio;
use crate::config::Config;
use crate::database::{Order, OrderAsset};
use crate::types::BotType;

/// Sends the order to the studio's admin chat and forwards its uploads.
/// Failures are logged and swallowed: the customer's order is already stored.
pub async fn notify_order(
    bot: &BotType,
    config: &Config,
    order: &Order,
    studio: &Studio,
    assets: &[OrderAsset],
) {
    let admin_chat = config.admin_chat_for(studio);
    let text = order_notification(order, studio, assets.len());

    log::debug!("Notifying {:?} about order {}", admin_chat, order.order_id);

    if let Err(e) = bot.send_message(admin_chat, text).await {
        log::error!("Failed to notify admin about order {}: {:?}", order.order_id, e);
        return;
    }

    for asset in assets {
        let result = bot
            .forward_message(admin_chat, ChatId(asset.chat_id), MessageId(asset.message_id))
            .await;

        if let Err(e) = result {
            log::error!(
                "Failed to forward {:?} {} ({}) of order {}: {:?}",
                asset.asset_kind,
                asset.asset_id,
                asset.file_id,
                asset.order_id,
                e
            );
        }
    }
}

pub fn order_notification(order: &Order, studio: &Studio, asset_count: usize) -> String {
    let mut text = format!(
        "🆕 <b>Новый заказ №{}</b>\n\
        Услуга: {}\n\
        Студия: {}\n\
        Клиент: {} (ID: <code>{}</code>)\n",
        order.order_id,
        order.service.title(),
        html::escape(&studio.title),
        html::escape(&order.client_handle()),
        order.user_id,
    );

    if !order.details.is_empty() {
        text.push_str(&html::escape(&order.details));
        text.push('\n');
    }

    if asset_count > 0 {
        text.push_str(&format!("Файлов: {}\n", asset_count));
    }

    text.push_str(&format!("Сумма: <b>{} ₽</b>", order.total_price));

    text
}
