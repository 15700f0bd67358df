pub mod agent;
pub mod models;
pub mod server;
pub mod config;
pub mod llm;
pub mod cli;
pub mod client;

use agent::RelayAgent;
use cli::{ Args, Command };
use config::prompt::SystemPrompt;
use llm::LlmConfig;
use log::{ info, warn };
use server::Server;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    match args.command.clone() {
        Some(Command::Chat { url }) => client::run_terminal_chat(&url).await,
        Some(Command::Serve) | None => serve(args).await,
    }
}

async fn serve(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let system_prompt = SystemPrompt::load(
        args.system_prompt_path.as_deref(),
        args.disable_system_prompt
    )?;

    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Chat Model: {}", args.chat_model);
    info!("Chat Base URL: {}", args.chat_base_url);
    info!("API Key Set: {}", !args.openai_api_key.trim().is_empty());
    match &system_prompt {
        SystemPrompt::Fixed(text) => {
            info!("System Prompt: {} ({} chars)", args.system_prompt_path.as_deref().unwrap_or("built-in Axiom"), text.chars().count())
        }
        SystemPrompt::Disabled => warn!("System Prompt: disabled, conversations are forwarded unmodified"),
    }
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    let llm_config = LlmConfig::new(
        &args.openai_api_key,
        Some(args.chat_model.clone()),
        Some(args.chat_base_url.clone())
    );
    let agent = Arc::new(RelayAgent::from_config(&llm_config, system_prompt)?);

    let addr = args.server_addr.clone();
    info!("Starting server on: {}", addr);
    let server = Server::new(addr, agent, args);
    server.run().await?;

    Ok(())
}
