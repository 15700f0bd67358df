use crate::config::prompt::SystemPrompt;
use crate::llm::chat::{ ChatClient, ChatError, new_client as new_chat_client };
use crate::llm::LlmConfig;

use serde_json::Value;
use thiserror::Error;
use log::{ debug, error, info };
use std::sync::Arc;

pub const INVALID_MESSAGES: &str = "Mensajes inválidos";
pub const UPSTREAM_FALLBACK: &str = "Error al procesar la solicitud";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RelayError {
    #[error("{}", INVALID_MESSAGES)]
    InvalidMessages,
    #[error("{0}")]
    Upstream(String),
}

impl From<ChatError> for RelayError {
    fn from(err: ChatError) -> Self {
        let message = err.to_string();
        if message.trim().is_empty() {
            RelayError::Upstream(UPSTREAM_FALLBACK.to_string())
        } else {
            RelayError::Upstream(message)
        }
    }
}

/// Stateless relay between the chat page and the completion service.
#[derive(Clone)]
pub struct RelayAgent {
    chat_client: Arc<dyn ChatClient>,
    system_prompt: SystemPrompt,
}

impl RelayAgent {
    pub fn new(chat_client: Arc<dyn ChatClient>, system_prompt: SystemPrompt) -> Self {
        Self { chat_client, system_prompt }
    }

    pub fn from_config(
        config: &LlmConfig,
        system_prompt: SystemPrompt
    ) -> Result<Self, ChatError> {
        let chat_client = new_chat_client(config)?;
        info!(
            "Chat client ready: model {} at {}",
            chat_client.get_model(),
            chat_client.get_base_url().unwrap_or_default()
        );
        Ok(Self::new(chat_client, system_prompt))
    }

    /// Relays one conversation. `messages` must be a JSON array; its
    /// elements go upstream untouched, behind the system instruction.
    pub async fn relay(&self, messages: Option<Value>) -> Result<String, RelayError> {
        let history = match messages {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(RelayError::InvalidMessages);
            }
        };

        debug!("Relaying conversation with {} messages", history.len());
        let conversation = self.system_prompt.apply(history);

        self.chat_client.complete(conversation).await.map_err(|e| {
            error!("Error calling the completion API: {}", e);
            RelayError::from(e)
        })
    }
}
