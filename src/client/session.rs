use async_trait::async_trait;

use super::ClientError;
use crate::models::chat::ChatMessage;

/// Anything that can turn a conversation into the next assistant reply.
#[async_trait]
pub trait Relay: Send + Sync {
    async fn post(&self, messages: &[ChatMessage]) -> Result<String, ClientError>;
}

/// In-memory conversation with the `idle -> sending -> idle` cycle of the
/// chat page. At most one request is outstanding at any time.
#[derive(Debug, Default)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    sending: bool,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// Appends the user message and returns the history to post, or `None`
    /// when the input is blank or a request is already outstanding.
    pub fn begin(&mut self, input: &str) -> Option<Vec<ChatMessage>> {
        let content = input.trim();
        if content.is_empty() || self.sending {
            return None;
        }
        self.messages.push(ChatMessage::user(content));
        self.sending = true;
        Some(self.messages.clone())
    }

    /// Records the outcome of the outstanding request. Errors become an
    /// assistant message. Returns `None` if nothing was outstanding.
    pub fn settle(&mut self, outcome: Result<String, ClientError>) -> Option<&ChatMessage> {
        if !self.sending {
            return None;
        }
        let reply = match outcome {
            Ok(text) => ChatMessage::assistant(text),
            Err(e) => ChatMessage::assistant(format!("Error: {}", e)),
        };
        self.messages.push(reply);
        self.sending = false;
        self.messages.last()
    }

    pub async fn send<R: Relay + ?Sized>(&mut self, input: &str, relay: &R) -> Option<&ChatMessage> {
        let history = self.begin(input)?;
        let outcome = relay.post(&history).await;
        self.settle(outcome)
    }
}
