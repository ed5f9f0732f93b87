use teloxide::{
    payloads::SendMessageSetters,
    requests::Requester,
    types::{KeyboardButton, KeyboardMarkup, KeyboardRemove, Recipient, ReplyMarkup},
};

use crate::types::BotType;

const BUTTONS_PER_ROW: usize = 2;

pub trait BetterSendMessage {
    fn send_message_buttons<C, T, S>(
        &self,
        chat_id: C,
        text: T,
        buttons: Vec<S>,
    ) -> <BotType as Requester>::SendMessage
    where
        C: Into<Recipient>,
        T: Into<String>,
        S: Into<String>;

    fn send_message_easy<C, T>(&self, chat_id: C, text: T) -> <BotType as Requester>::SendMessage
    where
        C: Into<Recipient>,
        T: Into<String>,
    {
        self.send_message_buttons(chat_id, text, vec![] as Vec<&str>)
    }
}

impl BetterSendMessage for BotType {
    fn send_message_buttons<C, T, S>(
        &self,
        chat_id: C,
        text: T,
        buttons: Vec<S>,
    ) -> <BotType as Requester>::SendMessage
    where
        C: Into<Recipient>,
        T: Into<String>,
        S: Into<String>,
    {
        let mut message = self.send_message(chat_id, text);

        if buttons.is_empty() {
            message = message.reply_markup(ReplyMarkup::KeyboardRemove(KeyboardRemove::new()));
        } else {
            message = message.reply_markup(ReplyMarkup::Keyboard(
                KeyboardMarkup::new(keyboard_rows(buttons)).resize_keyboard(),
            ));
        }

        message
    }
}

fn keyboard_rows<S: Into<String>>(buttons: Vec<S>) -> Vec<Vec<KeyboardButton>> {
    let buttons: Vec<KeyboardButton> = buttons
        .into_iter()
        .map(|b| KeyboardButton::new(b.into()))
        .collect();

    buttons
        .chunks(BUTTONS_PER_ROW)
        .map(|row| row.to_vec())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_are_laid_out_two_per_row() {
        let rows = keyboard_rows(vec!["a", "b", "c", "d", "e"]);
        let texts: Vec<Vec<&str>> = rows
            .iter()
            .map(|row| row.iter().map(|b| b.text.as_str()).collect())
            .collect();

        assert_eq!(texts, vec![vec!["a", "b"], vec!["c", "d"], vec!["e"]]);
    }
}
