use clap::{ Parser, Subcommand };

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Axiom chat relay and web front-end", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    // --- Server Args ---
    /// Host address and port for the HTTP server to listen on.
    #[arg(long, global = true, env = "SERVER_ADDR", default_value = "127.0.0.1:3000")]
    pub server_addr: String,

    // --- Chat LLM Provider Args ---
    /// API key for the chat-completion service. Required to serve.
    #[arg(long, global = true, env = "OPENAI_API_KEY", default_value = "", hide_env_values = true)]
    pub openai_api_key: String,

    /// Model name for chat completion.
    #[arg(long, global = true, env = "CHAT_MODEL", default_value = "gpt-4o-mini")]
    pub chat_model: String,

    /// Base URL of the OpenAI-compatible API (the /v1/chat/completions route is appended).
    #[arg(long, global = true, env = "CHAT_BASE_URL", default_value = "https://api.openai.com")]
    pub chat_base_url: String,

    // --- Prompt Args ---
    /// Optional file whose contents replace the built-in Axiom system instruction.
    #[arg(long, global = true, env = "SYSTEM_PROMPT_PATH")]
    pub system_prompt_path: Option<String>,

    /// Forward conversations without any system instruction.
    #[arg(long = "no-system-prompt", global = true, env = "DISABLE_SYSTEM_PROMPT", default_value = "false")]
    pub disable_system_prompt: bool,

    // --- TLS Args ---
    /// Optional path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, global = true, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, global = true, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, global = true, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the relay and serve the chat page (default).
    Serve,
    /// Chat from the terminal against a running server.
    Chat {
        /// Base URL of the server exposing /api/chat.
        #[arg(long, env = "CHAT_SERVER_URL", default_value = "http://127.0.0.1:3000")]
        url: String,
    },
}
