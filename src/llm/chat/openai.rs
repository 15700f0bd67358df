use async_trait::async_trait;
use log::debug;
use reqwest::{Client as HttpClient, StatusCode, header::{HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION}};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ChatClient, ChatError};
use crate::llm::{LlmConfig, DEFAULT_BASE_URL, DEFAULT_CHAT_MODEL};

pub struct OpenAIChatClient {
    http: HttpClient,
    model: String,
    base_url: String,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct OpenAIChatRequest<'a> {
    model: &'a str,
    messages: Vec<Value>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct OpenAIErrorBody {
    error: OpenAIErrorDetail,
}

#[derive(Deserialize)]
struct OpenAIErrorDetail {
    message: Option<String>,
}

impl OpenAIChatClient {
    pub fn new(
        api_key: String,
        model: Option<String>,
        base_url: Option<String>,
    ) -> Result<Self, ChatError> {
        let chat_model = model.unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string());
        let api_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|e| ChatError::Config(format!("Invalid API key format: {}", e)))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = HttpClient::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            model: chat_model,
            base_url: api_url,
            temperature: crate::llm::DEFAULT_TEMPERATURE,
            max_tokens: crate::llm::DEFAULT_MAX_TOKENS,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, ChatError> {
        let api_key = config.api_key
            .clone()
            .ok_or_else(|| ChatError::Config("OpenAI API key is required (set OPENAI_API_KEY)".to_string()))?;

        let mut client = Self::new(
            api_key,
            config.completion_model.clone(),
            config.base_url.clone(),
        )?;
        client.temperature = config.temperature;
        client.max_tokens = config.max_tokens;
        Ok(client)
    }

    fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/chat/completions") {
            base.to_string()
        } else if base.ends_with("/v1") {
            format!("{}/chat/completions", base)
        } else {
            format!("{}/v1/chat/completions", base)
        }
    }
}

/// Mirrors how the official SDKs phrase HTTP failures: the status code,
/// followed by the API's own message when the body carries one.
fn api_error(status: StatusCode, body: &str) -> ChatError {
    let detail = serde_json::from_str::<OpenAIErrorBody>(body)
        .ok()
        .and_then(|b| b.error.message)
        .filter(|m| !m.trim().is_empty());

    let message = match detail {
        Some(m) => format!("{} {}", status.as_u16(), m),
        None if body.trim().is_empty() => format!("{} status code (no body)", status.as_u16()),
        None => format!("{} {}", status.as_u16(), body.trim()),
    };
    ChatError::Api { status: status.as_u16(), message }
}

#[async_trait]
impl ChatClient for OpenAIChatClient {
    async fn complete(&self, messages: Vec<Value>) -> Result<String, ChatError> {
        let url = self.endpoint();
        debug!("POST {} ({} messages, model {})", url, messages.len(), self.model);

        let req = OpenAIChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stream: false,
        };

        let resp = self.http.post(&url)
            .json(&req)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        let parsed: OpenAIResponse = serde_json::from_str(&body)
            .map_err(|e| ChatError::Malformed(format!("Invalid completion response: {}", e)))?;

        let choice = parsed.choices
            .into_iter()
            .next()
            .ok_or_else(|| ChatError::Malformed("No response from OpenAI API".to_string()))?;

        Ok(choice.message.content.unwrap_or_default())
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_base_url(&self) -> Option<String> {
        Some(self.base_url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{ extract::Json, http::HeaderMap as AxumHeaders, response::IntoResponse, routing::post, Router };
    use serde_json::json;
    use std::sync::{ Arc, Mutex };

    type Seen = Arc<Mutex<Vec<(Option<String>, Value)>>>;

    async fn spawn_stub(status: u16, body: Option<Value>) -> (String, Seen) {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = seen.clone();
        let status = axum::http::StatusCode::from_u16(status).unwrap();

        let app = Router::new().route(
            "/v1/chat/completions",
            post(move |headers: AxumHeaders, Json(req): Json<Value>| {
                let recorder = recorder.clone();
                let body = body.clone();
                async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_owned);
                    recorder.lock().unwrap().push((auth, req));
                    match body {
                        Some(b) => (status, Json(b)).into_response(),
                        None => status.into_response(),
                    }
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), seen)
    }

    fn client(base_url: String) -> OpenAIChatClient {
        OpenAIChatClient::new("sk-test".into(), None, Some(base_url)).unwrap()
    }

    #[tokio::test]
    async fn sends_fixed_parameters_and_returns_first_choice() {
        let (url, seen) = spawn_stub(200, Some(json!({
            "choices": [
                { "message": { "role": "assistant", "content": "Primera" } },
                { "message": { "role": "assistant", "content": "Segunda" } }
            ]
        }))).await;

        let messages = vec![json!({ "role": "user", "content": "hola" })];
        let text = client(url).complete(messages.clone()).await.unwrap();
        assert_eq!(text, "Primera");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (auth, req) = &seen[0];
        assert_eq!(auth.as_deref(), Some("Bearer sk-test"));
        assert_eq!(req["model"], "gpt-4o-mini");
        assert_eq!(req["max_tokens"], 1000);
        assert_eq!(req["stream"], false);
        assert!((req["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(req["messages"], Value::Array(messages));
    }

    #[tokio::test]
    async fn api_error_message_is_surfaced_with_status() {
        let (url, _) = spawn_stub(401, Some(json!({
            "error": { "message": "Incorrect API key provided", "type": "invalid_request_error" }
        }))).await;

        let err = client(url).complete(vec![]).await.unwrap_err();
        assert!(matches!(err, ChatError::Api { status: 401, .. }));
        assert_eq!(err.to_string(), "401 Incorrect API key provided");
    }

    #[tokio::test]
    async fn empty_error_body_still_describes_status() {
        let (url, _) = spawn_stub(502, None).await;

        let err = client(url).complete(vec![]).await.unwrap_err();
        assert_eq!(err.to_string(), "502 status code (no body)");
    }

    #[tokio::test]
    async fn missing_choices_is_malformed() {
        let (url, _) = spawn_stub(200, Some(json!({ "choices": [] }))).await;

        let err = client(url).complete(vec![]).await.unwrap_err();
        assert!(matches!(err, ChatError::Malformed(_)));
    }

    #[tokio::test]
    async fn unreachable_upstream_is_a_request_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(format!("http://{}", addr)).complete(vec![]).await.unwrap_err();
        assert!(matches!(err, ChatError::Request(_)));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn endpoint_accepts_versioned_or_full_urls() {
        assert_eq!(client("https://api.openai.com".into()).endpoint(), "https://api.openai.com/v1/chat/completions");
        assert_eq!(client("http://proxy/v1/".into()).endpoint(), "http://proxy/v1/chat/completions");
        assert_eq!(
            client("http://proxy/v1/chat/completions".into()).endpoint(),
            "http://proxy/v1/chat/completions"
        );
    }

    #[test]
    fn from_config_requires_api_key() {
        let err = OpenAIChatClient::from_config(&LlmConfig::default()).err().unwrap();
        assert!(matches!(err, ChatError::Config(_)));
    }
}
