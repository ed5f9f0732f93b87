use std::sync::Arc;

use anyhow::Result;
use teloxide::types::Message;

use crate::catalog::{main_menu_buttons, Service};
use crate::config::Config;
use crate::flow::{first_step, prompt, OrderDraft};
use crate::types::{BotType, ConversationState, DbConn, DialogueWithState};

use super::orders::pending_order_for;
use super::send_message::BetterSendMessage as _;
use super::uploads::receive_upload;

pub async fn receive_menu_choice(
    db: Arc<DbConn>,
    config: Arc<Config>,
    bot: BotType,
    dialogue: DialogueWithState,
    msg: Message,
) -> Result<()> {
    // Files outside of a flow belong to a stored order whose chat state was lost
    if msg.photo().is_some() || msg.document().is_some() {
        if let Some(user) = msg.from.as_ref() {
            let user_id = user.id.0 as i64;
            if let Some(pending) = pending_order_for(&db, &config.catalog, user_id).await? {
                log::info!("Resuming uploads for order {}", pending.order_id);
                dialogue
                    .update(ConversationState::AwaitingUploads {
                        pending: pending.clone(),
                    })
                    .await?;
                return receive_upload(db, config, bot, dialogue, msg, pending).await;
            }
        }
    }

    let Some(service) = msg.text().and_then(Service::from_menu_text) else {
        bot.send_message_buttons(
            msg.chat.id,
            "Выберите услугу в меню ниже:",
            main_menu_buttons(),
        )
        .await?;
        return Ok(());
    };

    log::debug!("Chat {:?} chose {:?}", msg.chat.id, service);

    let draft = OrderDraft::new(service);
    let step = first_step(service);
    let question = prompt(&config.catalog, step, &draft);

    dialogue
        .update(ConversationState::Collecting { draft, step })
        .await?;

    bot.send_message_buttons(msg.chat.id, question.text, question.buttons)
        .await?;

    Ok(())
}
