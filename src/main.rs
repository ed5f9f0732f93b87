use dotenv::dotenv;
use std::sync::Arc;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

mod catalog;
mod config;
mod database;
mod flow;
mod handlers;
mod notify;
mod types;
mod util;

use config::Config;
use handlers::Command;
use types::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    pretty_env_logger::init();

    log::info!("Starting studio order bot");

    let config = Config::from_env()?;
    log::debug!("Database location: {:?}", config.database_location);
    log::debug!(
        "Catalog: {} studios, {} payment accounts",
        config.catalog.studios.len(),
        config.catalog.payment_accounts.len()
    );

    let db: DbType = Arc::new(database::connect(&config.database_location).await?);
    log::debug!("Successfully opened database");

    let bot = Bot::new(&config.bot_token).parse_mode(teloxide::types::ParseMode::Html);

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        log::error!("Failed to register bot commands: {:?}", e);
    }

    let command_tree = dptree::entry()
        .filter_command::<Command>()
        .endpoint(handlers::receive_command);

    let cancel_tree = dptree::filter(handlers::is_cancel).endpoint(handlers::receive_cancel);

    let message_tree = Update::filter_message()
        .enter_dialogue::<Message, InMemStorage<ConversationState>, ConversationState>()
        .branch(command_tree)
        .branch(cancel_tree)
        .branch(dptree::case![ConversationState::Idle].endpoint(handlers::receive_menu_choice))
        .branch(
            dptree::case![ConversationState::Collecting { draft, step }]
                .endpoint(handlers::receive_answer),
        )
        .branch(
            dptree::case![ConversationState::AwaitingUploads { pending }]
                .endpoint(handlers::receive_upload),
        );

    let tree = dptree::entry().branch(message_tree);

    log::debug!("Starting dispatcher");

    Dispatcher::builder(bot, tree)
        .dependencies(dptree::deps![
            InMemStorage::<ConversationState>::new(),
            db,
            Arc::new(config)
        ])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
