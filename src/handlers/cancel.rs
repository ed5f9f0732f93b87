use std::sync::Arc;

use anyhow::Result;
use teloxide::types::Message;

use crate::catalog::{main_menu_buttons, CANCEL_BUTTON};
use crate::database::queries;
use crate::types::{BotType, ConversationState, DbConn, DialogueWithState};

use super::send_message::BetterSendMessage as _;

pub fn is_cancel(msg: Message) -> bool {
    msg.text().map(str::trim) == Some(CANCEL_BUTTON)
}

pub async fn receive_cancel(
    db: Arc<DbConn>,
    bot: BotType,
    dialogue: DialogueWithState,
    msg: Message,
) -> Result<()> {
    let user_id = msg.from.as_ref().map(|user| user.id.0 as i64);

    let text = match reset_conversation(&db, &dialogue, user_id).await? {
        Reset::Idle => "Нечего отменять.".to_string(),
        Reset::Draft => "Заказ отменён.".to_string(),
        Reset::Order(order_id) => format!("Заказ №{} отменён.", order_id),
    };

    bot.send_message_buttons(msg.chat.id, text, main_menu_buttons())
        .await?;

    Ok(())
}

pub enum Reset {
    Idle,
    Draft,
    Order(i64),
}

/// Drops whatever the chat was doing. An order still waiting for uploads is
/// deleted together with the files received so far. In `Idle` that is the
/// user's stored incomplete order, if the chat state was lost.
pub async fn reset_conversation(
    db: &DbConn,
    dialogue: &DialogueWithState,
    user_id: Option<i64>,
) -> Result<Reset> {
    let state = dialogue.get().await?.unwrap_or_default();
    dialogue.exit().await?;

    let reset = match state {
        ConversationState::Idle => {
            let stored = match user_id {
                Some(user_id) => queries::latest_incomplete_order(db, user_id).await?,
                None => None,
            };

            match stored {
                Some(order) => {
                    log::info!("Cancelling stored order {}", order.order_id);
                    queries::delete_order(db, order.order_id).await?;
                    Reset::Order(order.order_id)
                }
                None => Reset::Idle,
            }
        }
        ConversationState::Collecting { .. } => Reset::Draft,
        ConversationState::AwaitingUploads { pending } => {
            log::info!("Cancelling order {}", pending.order_id);
            queries::delete_order(db, pending.order_id).await?;
            Reset::Order(pending.order_id)
        }
    };

    Ok(reset)
}
