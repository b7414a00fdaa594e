//! Rule-based support bot

mod chat;
mod intents;
mod resolver;

pub use chat::{ChatMessage, ChatSession, ChatState, PendingReply, ReplyDelay, Sender};
pub use intents::{Intent, RULES};
pub use resolver::{classify, resolve, BotResponse};
