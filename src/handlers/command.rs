use std::sync::Arc;

use anyhow::Result;
use teloxide::{
    macros::BotCommands,
    types::Message,
    utils::{command::BotCommands as _, html},
};

use crate::catalog::{main_menu_buttons, Catalog};
use crate::config::Config;
use crate::database::{queries, Order};
use crate::types::{BotType, DbConn, DialogueWithState};
use crate::util::unix_to_humantime;

use super::cancel::{receive_cancel, reset_conversation};
use super::send_message::BetterSendMessage;

const RECENT_ORDERS: i64 = 10;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "Главное меню")]
    Start,

    #[command(description = "Как сделать заказ")]
    Help,

    #[command(description = "Отменить текущий заказ")]
    Cancel,

    #[command(description = "О боте")]
    About,

    #[command(description = "Статистика заказов (для администратора)")]
    Stats,

    #[command(description = "Последние заказы (для администратора)")]
    Recent,
}

pub async fn receive_command(
    db: Arc<DbConn>,
    config: Arc<Config>,
    bot: BotType,
    dialogue: DialogueWithState,
    msg: Message,
    command: Command,
) -> Result<()> {
    log::debug!("Command {:?} in chat {:?}", command, msg.chat.id);

    match command {
        Command::Start => {
            let user_id = msg.from.as_ref().map(|user| user.id.0 as i64);
            reset_conversation(&db, &dialogue, user_id).await?;
            bot.send_message_buttons(
                msg.chat.id,
                "Привет! Я бот фотостудии A1 во Владивостоке.\n\nВыберите услугу:",
                main_menu_buttons(),
            )
            .await?;
        }
        Command::Help => {
            bot.send_message_buttons(
                msg.chat.id,
                format!(
                    "<b>Как сделать заказ</b>\n\
                    Выберите услугу в меню и ответьте на несколько вопросов: \
                    студия, параметры заказа и телефон для связи. \
                    Для печати бот попросит прислать фотографии или файл. \
                    После подтверждения вы получите реквизиты для оплаты.\n\
                    Отменить заказ можно в любой момент кнопкой «Отмена».\n\
                    \n<b>Команды</b>\n\
                    {}",
                    Command::descriptions()
                ),
                main_menu_buttons(),
            )
            .await?;
        }
        Command::Cancel => {
            receive_cancel(db, bot, dialogue, msg).await?;
        }
        Command::About => {
            bot.send_message_easy(
                msg.chat.id,
                format!(
                    "<b>Бот фотостудии A1 v{}</b>\nСтудии:\n{}",
                    env!("CARGO_PKG_VERSION"),
                    config
                        .catalog
                        .studios
                        .iter()
                        .map(|s| format!(
                            "• {} — {}",
                            html::escape(&s.title),
                            html::escape(&s.address)
                        ))
                        .collect::<Vec<_>>()
                        .join("\n")
                ),
            )
            .await?;
        }
        Command::Stats => {
            if !config.is_admin(msg.chat.id) {
                return send_admin_only(&bot, &msg).await;
            }

            let stats = queries::get_order_stats(&db).await?;
            bot.send_message_easy(
                msg.chat.id,
                format!(
                    "<b>Заказы</b>\n\
                    Всего: <code>{}</code>\n\
                    Ждут файлов: <code>{}</code>\n\
                    Сумма: <code>{} ₽</code>\n\
                    Файлов: <code>{}</code>\n\
                    Последний: <code>{}</code>\n\
                    \n\
                    <b>По услугам</b>\n\
                    Фото на документы: <code>{}</code>\n\
                    Фотопечать: <code>{}</code>\n\
                    Печать документов: <code>{}</code>\n\
                    Сувениры: <code>{}</code>",
                    stats.total_orders,
                    stats.incomplete_orders,
                    stats.total_revenue,
                    stats.total_assets,
                    unix_to_humantime(stats.last_order_at),
                    stats.document_photo_orders,
                    stats.photo_print_orders,
                    stats.document_print_orders,
                    stats.souvenir_orders,
                ),
            )
            .await?;
        }
        Command::Recent => {
            if !config.is_admin(msg.chat.id) {
                return send_admin_only(&bot, &msg).await;
            }

            let orders = queries::recent_orders(&db, RECENT_ORDERS).await?;
            if orders.is_empty() {
                bot.send_message_easy(msg.chat.id, "Заказов пока нет").await?;
                return Ok(());
            }

            let mut lines = Vec::with_capacity(orders.len());
            for order in &orders {
                let received = queries::count_assets(&db, order.order_id).await?;
                lines.push(recent_line(&config.catalog, order, received));
            }

            bot.send_message_easy(
                msg.chat.id,
                format!("<b>Последние заказы</b>\n{}", lines.join("\n")),
            )
            .await?;
        }
    }

    Ok(())
}

fn recent_line(catalog: &Catalog, order: &Order, received: i64) -> String {
    let mut line = format!(
        "№{} · {} · {} · {} · {} ₽ · {}",
        order.order_id,
        order.service.title(),
        html::escape(catalog.studio_title(&order.studio)),
        html::escape(&order.client_handle()),
        order.total_price,
        unix_to_humantime(order.created_at),
    );

    if received < order.expected_uploads {
        line.push_str(&format!(" · ⏳ файлов {}/{}", received, order.expected_uploads));
    }

    line
}

async fn send_admin_only(bot: &BotType, msg: &Message) -> Result<()> {
    bot.send_message_easy(msg.chat.id, "Команда доступна только администратору")
        .await?;
    Ok(())
}
