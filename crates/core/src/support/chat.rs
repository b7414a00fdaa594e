//! Support chat session: transcript plus the open/typing state machine

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use super::intents::Intent;
use super::resolver::{resolve, BotResponse};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChatState {
    Closed,
    AwaitingInput,
    /// The bot is "typing" a reply to the last message
    Typing,
}

impl ChatState {
    pub fn is_open(&self) -> bool {
        !matches!(self, ChatState::Closed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: u32,
    pub sender: Sender,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
    pub sent_at: DateTime<Utc>,
}

/// A resolved reply waiting out its typing delay
#[derive(Debug, Clone)]
pub struct PendingReply {
    ticket: u64,
    pub response: BotResponse,
    pub delay: Duration,
}

/// Bounds for the simulated typing delay
#[derive(Debug, Clone, Copy)]
pub struct ReplyDelay {
    pub min: Duration,
    pub max: Duration,
}

impl Default for ReplyDelay {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(1000),
            max: Duration::from_millis(2000),
        }
    }
}

impl ReplyDelay {
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        let (lo, hi) = if min_ms <= max_ms { (min_ms, max_ms) } else { (max_ms, min_ms) };
        Self {
            min: Duration::from_millis(lo),
            max: Duration::from_millis(hi),
        }
    }

    pub fn pick(&self) -> Duration {
        let lo = self.min.as_millis() as u64;
        let hi = self.max.as_millis() as u64;
        let mut rng = rand::rng();
        Duration::from_millis(rng.random_range(lo..=hi))
    }
}

const SUGGESTIONS_PREFIX: &str = "Возможно, вас заинтересует:";

/// One visitor's conversation with the support bot.
///
/// `Closed → AwaitingInput → Typing → AwaitingInput → ...`; closing from
/// any state drops a reply that has not been delivered yet.
#[derive(Debug)]
pub struct ChatSession {
    state: ChatState,
    transcript: Vec<ChatMessage>,
    user_name: Option<String>,
    next_message_id: u32,
    next_ticket: u64,
    pending_ticket: Option<u64>,
}

impl ChatSession {
    pub fn new(user_name: Option<String>) -> Self {
        Self {
            state: ChatState::Closed,
            transcript: Vec::new(),
            user_name,
            next_message_id: 1,
            next_ticket: 1,
            pending_ticket: None,
        }
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    pub fn set_user_name(&mut self, user_name: Option<String>) {
        self.user_name = user_name;
    }

    fn push(&mut self, sender: Sender, text: String, intent: Option<Intent>, suggestions: Vec<String>, now: DateTime<Utc>) {
        let id = self.next_message_id;
        self.next_message_id += 1;
        self.transcript.push(ChatMessage {
            id,
            sender,
            text,
            intent,
            suggestions,
            sent_at: now,
        });
    }

    /// Opens the chat. The first opening greets the visitor.
    pub fn open(&mut self, now: DateTime<Utc>) {
        if self.state.is_open() {
            return;
        }

        self.state = ChatState::AwaitingInput;
        if self.transcript.is_empty() {
            let greeting = resolve("привет", self.user_name.as_deref());
            self.push(Sender::Bot, greeting.text, Some(greeting.intent), greeting.follow_up, now);
        }
        debug!("Support chat opened");
    }

    /// Records a visitor message and resolves the bot's answer.
    ///
    /// Blank input is ignored (`Ok(None)`). The returned reply must be
    /// handed back to [`deliver`](Self::deliver) once its delay elapsed.
    pub fn submit(&mut self, text: &str, delay: &ReplyDelay, now: DateTime<Utc>) -> Result<Option<PendingReply>> {
        match self.state {
            ChatState::Closed => return Err(Error::ChatClosed),
            ChatState::Typing => return Err(Error::ChatBusy),
            ChatState::AwaitingInput => {}
        }

        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        self.push(Sender::User, text.to_string(), None, Vec::new(), now);
        let response = resolve(text, self.user_name.as_deref());
        debug!(intent = response.intent.as_str(), "Support message resolved");

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.pending_ticket = Some(ticket);
        self.state = ChatState::Typing;

        Ok(Some(PendingReply {
            ticket,
            response,
            delay: delay.pick(),
        }))
    }

    /// Appends the bot's reply, plus a suggestions message when the reply
    /// carries follow-ups. Returns `false` for a reply that no longer
    /// belongs to this session (the chat was closed meanwhile).
    pub fn deliver(&mut self, reply: PendingReply, now: DateTime<Utc>) -> bool {
        if self.state != ChatState::Typing || self.pending_ticket != Some(reply.ticket) {
            debug!("Dropping stale support reply");
            return false;
        }

        let BotResponse {
            text,
            intent,
            follow_up,
        } = reply.response;

        self.push(Sender::Bot, text, Some(intent), Vec::new(), now);
        if !follow_up.is_empty() {
            self.push(Sender::Bot, SUGGESTIONS_PREFIX.to_string(), None, follow_up, now);
        }

        self.pending_ticket = None;
        self.state = ChatState::AwaitingInput;
        true
    }

    pub fn close(&mut self) {
        self.state = ChatState::Closed;
        self.pending_ticket = None;
        debug!("Support chat closed");
    }
}
