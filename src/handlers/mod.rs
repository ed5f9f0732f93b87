mod answers;
mod cancel;
mod command;
mod menu;
mod orders;
mod send_message;
mod uploads;

pub use answers::receive_answer;
pub use cancel::{is_cancel, receive_cancel};
pub use command::{receive_command, Command};
pub use menu::receive_menu_choice;
pub use uploads::receive_upload;

#[cfg(test)]
pub(crate) mod test_support {
    use serde_json::{json, Value};
    use teloxide::dispatching::dialogue::InMemStorage;
    use teloxide::prelude::*;
    use teloxide::types::{Message, ParseMode};

    use crate::catalog::Catalog;
    use crate::config::Config;
    use crate::types::{BotType, ConversationState, DialogueWithState};

    pub const CHAT_ID: i64 = 42;

    /// Nothing listens on this address, so every request fails fast.
    pub fn offline_bot() -> BotType {
        Bot::new("123456:offline")
            .set_api_url("http://127.0.0.1:1".parse().unwrap())
            .parse_mode(ParseMode::Html)
    }

    pub fn test_config() -> Config {
        Config {
            bot_token: "123456:offline".to_string(),
            admin_chat: ChatId(1),
            database_location: ":memory:".to_string(),
            catalog: Catalog::default(),
        }
    }

    pub async fn dialogue(state: ConversationState) -> DialogueWithState {
        let dialogue = Dialogue::new(InMemStorage::<ConversationState>::new(), ChatId(CHAT_ID));
        dialogue.update(state).await.unwrap();
        dialogue
    }

    fn message(content: Value) -> Message {
        let mut value = json!({
            "message_id": 7,
            "date": 1_700_000_000,
            "chat": { "id": CHAT_ID, "type": "private", "first_name": "Анна" },
            "from": {
                "id": CHAT_ID,
                "is_bot": false,
                "first_name": "Анна",
                "username": "anna"
            }
        });
        if let (Some(object), Value::Object(extra)) = (value.as_object_mut(), content) {
            object.extend(extra);
        }
        serde_json::from_value(value).unwrap()
    }

    pub fn text_message(text: &str) -> Message {
        message(json!({ "text": text }))
    }

    pub fn photo_message(file_id: &str) -> Message {
        message(json!({
            "photo": [{
                "file_id": file_id,
                "file_unique_id": format!("{}-unique", file_id),
                "width": 1280,
                "height": 960,
                "file_size": 2048
            }]
        }))
    }
}
