pub mod session;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Serialize;
use serde_json::Value;
use std::error::Error as StdError;
use thiserror::Error;
use tokio::io::{ AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader };
use log::{ error, info };

use crate::models::chat::{ ChatMessage, Role };
pub use self::session::{ ChatSession, Relay };

pub const RESPONSE_FALLBACK: &str = "Error al obtener respuesta";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),
    /// The server answered with a non-2xx status.
    #[error("{0}")]
    Rejected(String),
}

#[derive(Serialize)]
struct RelayBody<'a> {
    messages: &'a [ChatMessage],
}

/// HTTP client of a running relay's `/api/chat`.
pub struct RelayClient {
    http: HttpClient,
    endpoint: String,
}

impl RelayClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: HttpClient::new(),
            endpoint: format!("{}/api/chat", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl Relay for RelayClient {
    async fn post(&self, messages: &[ChatMessage]) -> Result<String, ClientError> {
        let resp = self.http.post(&self.endpoint)
            .json(&RelayBody { messages })
            .send()
            .await?;

        let ok = resp.status().is_success();
        let data: Value = resp.json().await?;

        if !ok {
            let message = data.get("error")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .unwrap_or(RESPONSE_FALLBACK);
            return Err(ClientError::Rejected(message.to_string()));
        }

        Ok(data.get("message").and_then(Value::as_str).unwrap_or_default().to_string())
    }
}

fn render(message: &ChatMessage) -> String {
    let badge = match message.role {
        Role::User => "👤",
        _ => "🤖",
    };
    format!("{} {}\n", badge, message.content)
}

/// Interactive loop over stdin/stdout. Ends on EOF or `/salir`.
pub async fn run_terminal_chat(url: &str) -> Result<(), Box<dyn StdError + Send + Sync>> {
    let relay = RelayClient::new(url);
    let mut session = ChatSession::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    info!("Chatting with {}", relay.endpoint);
    stdout.write_all("¡Hola! Bienvenido. Soy tu asistente inteligente. Pregúntame lo que quieras.\n".as_bytes()).await?;

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim() == "/salir" {
            break;
        }

        handle_line(&mut session, &relay, &line, &mut stdout).await?;
    }

    Ok(())
}

/// Submits one line of input. Blank input, or input while a request is
/// outstanding, writes nothing and posts nothing.
async fn handle_line<R, W>(
    session: &mut ChatSession,
    relay: &R,
    line: &str,
    out: &mut W,
) -> std::io::Result<()>
    where R: Relay + ?Sized, W: AsyncWrite + Unpin
{
    let Some(history) = session.begin(line) else {
        return Ok(());
    };
    out.write_all("Enviando...\n".as_bytes()).await?;
    out.flush().await?;

    let outcome = relay.post(&history).await;
    if let Some(reply) = session.settle(outcome) {
        if reply.content.starts_with("Error: ") {
            error!("Relay request failed: {}", reply.content);
        }
        out.write_all(render(reply).as_bytes()).await?;
    }
    Ok(())
}
