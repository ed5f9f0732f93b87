use std::sync::Arc;

use anyhow::Result;
use teloxide::types::Message;

use crate::config::Config;
use crate::flow::{next_step, prompt, InvalidAnswer, OrderDraft, Step};
use crate::types::{BotType, ConversationState, DbConn, DialogueWithState};

use super::orders::submit_order;
use super::send_message::BetterSendMessage as _;

pub async fn receive_answer(
    db: Arc<DbConn>,
    config: Arc<Config>,
    bot: BotType,
    dialogue: DialogueWithState,
    msg: Message,
    (draft, step): (OrderDraft, Step),
) -> Result<()> {
    let answer = match msg.text() {
        Some(text) => draft.apply(&config.catalog, step, text),
        None => Err(InvalidAnswer::NotText),
    };

    let draft = match answer {
        Ok(draft) => draft,
        Err(invalid) => {
            log::debug!("Rejected answer for {:?}: {:?}", step, invalid);

            // Stay on the same step and ask again
            let question = prompt(&config.catalog, step, &draft);
            bot.send_message_buttons(
                msg.chat.id,
                format!("{}\n\n{}", invalid.hint(), question.text),
                question.buttons,
            )
            .await?;
            return Ok(());
        }
    };

    match next_step(draft.service, step) {
        Some(next) => {
            let question = prompt(&config.catalog, next, &draft);

            dialogue
                .update(ConversationState::Collecting { draft, step: next })
                .await?;

            bot.send_message_buttons(msg.chat.id, question.text, question.buttons)
                .await?;
        }
        None => submit_order(&db, &config, &bot, &dialogue, &msg, draft).await?,
    }

    Ok(())
}
