pub mod agent;
pub mod cli;
pub mod config;
pub mod history;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod schema;
pub mod server;

use agent::ChatAgent;
use cli::Args;
use history::initialize_history_store;
use log::info;
use server::{ AppState, Server };
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    args.validate()?;

    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Provider Base URL: {}", args.openai_base_url);
    info!("Gather Model: {}", args.gather_model);
    info!("Present Model: {}", args.present_model);
    info!("Present Temperature: {}", args.present_temperature);
    info!("Connect Timeout: {}s", args.connect_timeout_secs);
    info!("Request Timeout: {}s", args.request_timeout_secs);
    info!("History Store Type: {}", args.history_type);
    info!("History Limit: {}", args.history_limit);
    info!("Context Turns: {}", args.context_turns);
    info!("Prompts Path: {}", args.prompts_path.as_deref().unwrap_or("built-in"));
    info!("Index Path: {}", args.index_path);
    info!("-------------------------");

    let agent = Arc::new(ChatAgent::from_args(&args)?);
    let history = initialize_history_store(&args)?;
    let state = AppState::new(agent, history).with_index_path(args.index_path.clone());

    info!("Starting server on: {}", args.server_addr);
    Server::new(args.server_addr.clone(), state).run().await?;

    Ok(())
}
