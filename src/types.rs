use sqlx::{Pool, Sqlite};
use std::sync::Arc;
use teloxide::{adaptors::DefaultParseMode, dispatching::dialogue::InMemStorage, prelude::Dialogue, Bot};

use crate::catalog::{Service, Studio};
use crate::flow::{OrderDraft, Step};

pub type DialogueWithState = Dialogue<ConversationState, InMemStorage<ConversationState>>;

pub type BotType = DefaultParseMode<Bot>;
pub type DbConn = Pool<Sqlite>;
pub type DbType = Arc<DbConn>;

#[derive(Clone, Default, Debug, PartialEq)]
pub enum ConversationState {
    #[default]
    Idle,
    Collecting {
        draft: OrderDraft,
        step: Step,
    },
    AwaitingUploads {
        pending: PendingOrder,
    },
}

/// An order that is already stored but still waits for its files.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingOrder {
    pub order_id: i64,
    pub service: Service,
    pub studio: Studio,
    pub expected: u32,
    pub total_price: u64,
}
