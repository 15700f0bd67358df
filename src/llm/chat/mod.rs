pub mod openai;

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use super::LlmConfig;
use self::openai::OpenAIChatClient;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    /// Non-2xx answer. `message` already carries the status prefix.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Malformed(String),

    #[error("{0}")]
    Config(String),
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// One non-streaming completion over the given conversation. Returns the
    /// text of the first choice.
    async fn complete(&self, messages: Vec<Value>) -> Result<String, ChatError>;

    fn get_model(&self) -> String;
    fn get_base_url(&self) -> Option<String>;
}

pub fn new_client(config: &LlmConfig) -> Result<Arc<dyn ChatClient>, ChatError> {
    let client = OpenAIChatClient::from_config(config)?;
    Ok(Arc::new(client))
}
