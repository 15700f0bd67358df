pub mod chat;

pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub completion_model: Option<String>,
    pub base_url: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            completion_model: None,
            base_url: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl LlmConfig {
    pub fn new(api_key: &str, model: Option<String>, base_url: Option<String>) -> Self {
        Self {
            api_key: Some(api_key.to_string()).filter(|k| !k.trim().is_empty()),
            completion_model: model.filter(|m| !m.trim().is_empty()),
            base_url: base_url.filter(|u| !u.trim().is_empty()),
            ..Self::default()
        }
    }
}
