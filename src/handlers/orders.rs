use anyhow::{bail, Context, Result};
use teloxide::types::{ChatId, Message};
use teloxide::utils::html;

use crate::catalog::{main_menu_buttons, Catalog, Service, Studio, CANCEL_BUTTON};
use crate::config::Config;
use crate::database::queries::{self, NewOrder};
use crate::database::Order;
use crate::flow::OrderDraft;
use crate::notify;
use crate::types::{BotType, ConversationState, DbConn, DialogueWithState, PendingOrder};

use super::send_message::BetterSendMessage as _;

/// Stores a confirmed draft. Orders without uploads complete right away,
/// the rest wait for their files.
pub async fn submit_order(
    db: &DbConn,
    config: &Config,
    bot: &BotType,
    dialogue: &DialogueWithState,
    msg: &Message,
    draft: OrderDraft,
) -> Result<()> {
    let Some(user) = msg.from.as_ref() else {
        bail!("Confirmed order without a sender in chat {:?}", msg.chat.id);
    };
    let studio = draft.studio.clone().context("Confirmed order without a studio")?;
    let total_price = draft.total_price(&config.catalog);
    let expected = draft.expected_uploads();

    let order_id = queries::insert_order(
        db,
        NewOrder {
            user_id: user.id.0 as i64,
            username: user.username.clone(),
            display_name: user.full_name(),
            service: draft.service,
            studio: studio.key.clone(),
            details: draft.details(),
            total_price: i64::try_from(total_price).context("Order total does not fit")?,
            expected_uploads: i64::from(expected),
        },
    )
    .await?;

    log::info!(
        "Order {} ({:?}) created by user {}",
        order_id,
        draft.service,
        user.id.0
    );

    let pending = PendingOrder {
        order_id,
        service: draft.service,
        studio,
        expected,
        total_price,
    };

    if pending.expected == 0 {
        return complete_order(db, config, bot, dialogue, msg.chat.id, &pending).await;
    }

    // The order is stored, so the draft must not be confirmable again
    dialogue
        .update(ConversationState::AwaitingUploads {
            pending: pending.clone(),
        })
        .await?;

    bot.send_message_buttons(
        msg.chat.id,
        upload_request(&pending),
        vec![CANCEL_BUTTON],
    )
    .await?;

    Ok(())
}

/// Notifies the studio, hands the customer the payment details and returns
/// the chat to the main menu.
pub async fn complete_order(
    db: &DbConn,
    config: &Config,
    bot: &BotType,
    dialogue: &DialogueWithState,
    chat_id: ChatId,
    pending: &PendingOrder,
) -> Result<()> {
    dialogue.exit().await?;

    let order = queries::get_order(db, pending.order_id)
        .await?
        .with_context(|| format!("Order {} vanished before completion", pending.order_id))?;
    let assets = queries::list_assets(db, pending.order_id).await?;

    log::info!("Order {} completed", pending.order_id);

    notify::notify_order(bot, config, &order, &pending.studio, &assets).await;

    let result = bot
        .send_message_buttons(
            chat_id,
            payment_instructions(&config.catalog, pending),
            main_menu_buttons(),
        )
        .await;

    if let Err(e) = result {
        log::error!(
            "Failed to send payment details for order {}: {:?}",
            pending.order_id,
            e
        );
    }

    Ok(())
}

/// Rebuilds the upload state of a stored order whose files are still
/// missing, e.g. after the bot was restarted.
pub async fn pending_order_for(
    db: &DbConn,
    catalog: &Catalog,
    user_id: i64,
) -> Result<Option<PendingOrder>> {
    let Some(order) = queries::latest_incomplete_order(db, user_id).await? else {
        return Ok(None);
    };

    Ok(Some(pending_from_order(catalog, &order)?))
}

fn pending_from_order(catalog: &Catalog, order: &Order) -> Result<PendingOrder> {
    let studio = match catalog.studio(&order.studio) {
        Some(studio) => studio.clone(),
        None => {
            log::warn!(
                "Order {} references unknown studio {:?}",
                order.order_id,
                order.studio
            );
            Studio {
                key: order.studio.clone(),
                title: order.studio.clone(),
                address: String::new(),
                admin_chat_id: None,
            }
        }
    };

    Ok(PendingOrder {
        order_id: order.order_id,
        service: order.service,
        studio,
        expected: u32::try_from(order.expected_uploads).context("Bad expected upload count")?,
        total_price: u64::try_from(order.total_price).context("Bad order total")?,
    })
}

pub fn upload_request(pending: &PendingOrder) -> String {
    let what = match pending.service {
        Service::PhotoPrint => "фотографии для печати",
        Service::DocumentPrint => "документ для печати (файлом)",
        _ => "изображение для нанесения",
    };

    format!(
        "Заказ №{} создан. Пришлите {} — ожидаю файлов: {}.",
        pending.order_id, what, pending.expected
    )
}

pub fn upload_progress(pending: &PendingOrder, received: i64) -> String {
    format!("Получено {} из {}.", received, pending.expected)
}

pub fn payment_instructions(catalog: &Catalog, pending: &PendingOrder) -> String {
    let account = catalog.payment_account_for(pending.order_id);
    let header = match pending.service {
        Service::DocumentPhoto => format!("✅ Запись №{} принята!", pending.order_id),
        _ => format!("✅ Заказ №{} принят!", pending.order_id),
    };

    format!(
        "{}\n\n\
        💳 Чтобы оплатить {} ₽ через СБП:\n\
        1. Откройте ваш банк (Сбер, Тинькофф и др.)\n\
        2. Перейдите в «Переводы» → «По номеру телефона»\n\
        3. Введите наш номер: <b>{}</b>\n\
        4. Укажите сумму: <b>{} ₽</b>\n\n\
        После оплаты пришлите скриншот — мы подтвердим заказ!\n\
        Студия: {}",
        header,
        pending.total_price,
        html::escape(account),
        pending.total_price,
        html::escape(&pending.studio.address),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(service: Service, order_id: i64) -> PendingOrder {
        let catalog = Catalog::default();
        PendingOrder {
            order_id,
            service,
            studio: catalog.studios[0].clone(),
            expected: 3,
            total_price: 75,
        }
    }

    #[test]
    fn payment_uses_rotating_account() {
        let mut catalog = Catalog::default();
        catalog.payment_accounts = vec!["111".into(), "222".into()];

        let even = payment_instructions(&catalog, &pending(Service::PhotoPrint, 4));
        let odd = payment_instructions(&catalog, &pending(Service::PhotoPrint, 5));

        assert!(even.contains("<b>111</b>"));
        assert!(odd.contains("<b>222</b>"));
        assert!(even.starts_with("✅ Заказ №4 принят!"));
        assert!(even.contains("Укажите сумму: <b>75 ₽</b>"));
    }

    #[test]
    fn document_photo_is_an_appointment() {
        let catalog = Catalog::default();
        let text = payment_instructions(&catalog, &pending(Service::DocumentPhoto, 9));
        assert!(text.starts_with("✅ Запись №9 принята!"));
    }

    #[test]
    fn upload_request_reports_progress() {
        let order = pending(Service::PhotoPrint, 12);
        assert!(upload_request(&order).contains("ожидаю файлов: 3"));
        assert_eq!(upload_progress(&order, 2), "Получено 2 из 3.");
    }
}
