use std::fmt;

use anyhow::{Context, Result};
use teloxide::types::ChatId;

use crate::catalog::{Catalog, Studio};

const DEFAULT_DATABASE_LOCATION: &str = "bot.db";

#[derive(Clone)]
pub struct Config {
    pub bot_token: String,
    pub admin_chat: ChatId,
    pub database_location: String,
    pub catalog: Catalog,
}

// Keeps the bot token out of logs and test output.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bot_token", &"<redacted>")
            .field("admin_chat", &self.admin_chat)
            .field("database_location", &self.database_location)
            .field("catalog", &self.catalog)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Config> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token = lookup("BOT_TOKEN").context("BOT_TOKEN must be set")?;
        let admin_chat = parse_chat_id(&lookup("ADMIN_ID").context("ADMIN_ID must be set")?)
            .context("ADMIN_ID must be a chat id")?;

        let database_location = lookup("DATABASE_LOCATION")
            .filter(|location| !location.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_LOCATION.to_string());

        let catalog = match lookup("CATALOG_PATH").filter(|path| !path.trim().is_empty()) {
            Some(path) => Catalog::load(&path)?,
            None => Catalog::default(),
        };

        Ok(Config {
            bot_token,
            admin_chat,
            database_location,
            catalog,
        })
    }

    /// Studios with their own admin chat get their orders there.
    pub fn admin_chat_for(&self, studio: &Studio) -> ChatId {
        studio.admin_chat_id.map(ChatId).unwrap_or(self.admin_chat)
    }

    pub fn is_admin(&self, chat: ChatId) -> bool {
        chat == self.admin_chat || self.catalog.studio_admin_chats().any(|id| ChatId(id) == chat)
    }
}

fn parse_chat_id(value: &str) -> Result<ChatId> {
    let id: i64 = value.trim().parse()?;
    Ok(ChatId(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn reads_required_values_and_defaults() {
        let config =
            Config::from_lookup(lookup(&[("BOT_TOKEN", "123:abc"), ("ADMIN_ID", " 555 ")])).unwrap();

        assert_eq!(config.bot_token, "123:abc");
        assert_eq!(config.admin_chat, ChatId(555));
        assert_eq!(config.database_location, "bot.db");
        assert_eq!(config.catalog.studios.len(), 2);
    }

    #[test]
    fn missing_token_is_an_error() {
        let err = Config::from_lookup(lookup(&[("ADMIN_ID", "1")])).unwrap_err();
        assert!(err.to_string().contains("BOT_TOKEN"));
    }

    #[test]
    fn admin_id_must_be_numeric() {
        let err =
            Config::from_lookup(lookup(&[("BOT_TOKEN", "t"), ("ADMIN_ID", "admin")])).unwrap_err();
        assert!(err.to_string().contains("ADMIN_ID"));
    }

    #[test]
    fn missing_catalog_file_is_an_error() {
        let result = Config::from_lookup(lookup(&[
            ("BOT_TOKEN", "t"),
            ("ADMIN_ID", "1"),
            ("CATALOG_PATH", "/definitely/not/here.json"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn routes_orders_to_studio_admins() {
        let mut config =
            Config::from_lookup(lookup(&[("BOT_TOKEN", "t"), ("ADMIN_ID", "1")])).unwrap();
        config.catalog.studios[1].admin_chat_id = Some(-200);

        let first = config.catalog.studios[0].clone();
        let second = config.catalog.studios[1].clone();

        assert_eq!(config.admin_chat_for(&first), ChatId(1));
        assert_eq!(config.admin_chat_for(&second), ChatId(-200));

        assert!(config.is_admin(ChatId(1)));
        assert!(config.is_admin(ChatId(-200)));
        assert!(!config.is_admin(ChatId(2)));
    }

    #[test]
    fn debug_output_hides_the_token() {
        let config =
            Config::from_lookup(lookup(&[("BOT_TOKEN", "123:secret"), ("ADMIN_ID", "1")])).unwrap();

        let debug = format!("{:?}", config);
        assert!(!debug.contains("123:secret"));
        assert!(debug.contains("<redacted>"));
    }
}
