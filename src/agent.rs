use async_trait::async_trait;
use log::info;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::Args;
use crate::config::prompt::{ self, PromptConfig };
use crate::llm::chat::{ ChatClient, new_client as new_chat_client };
use crate::models::chat::{ ChatResult, ConversationTurn };
use crate::pipeline::{ Composer, Gatherer };
use crate::schema::SchemaRegistry;

/// What the host calls once per chat request.
#[async_trait]
pub trait QueryProcessor: Send + Sync {
    async fn process_user_query(&self, query: &str, history: &[ConversationTurn]) -> ChatResult;
}

#[derive(Debug, Clone)]
pub struct AgentSettings {
    /// Most recent history turns fed to each model call.
    pub context_turns: usize,
    pub temperature: f32,
    pub request_timeout: Duration,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            context_turns: 6,
            temperature: 0.2,
            request_timeout: Duration::from_secs(180),
        }
    }
}

/// Gather → present orchestrator.
pub struct ChatAgent {
    gatherer: Gatherer,
    composer: Composer,
}

impl ChatAgent {
    pub fn new(
        gather_client: Arc<dyn ChatClient>,
        present_client: Arc<dyn ChatClient>,
        registry: Arc<SchemaRegistry>,
        prompts: Arc<PromptConfig>,
        settings: AgentSettings
    ) -> Self {
        let gatherer = Gatherer::new(
            gather_client,
            Arc::clone(&prompts),
            settings.context_turns,
            settings.request_timeout
        );
        let composer = Composer::new(
            present_client,
            registry,
            prompts,
            settings.context_turns,
            settings.temperature,
            settings.request_timeout
        );
        Self { gatherer, composer }
    }

    pub fn from_args(args: &Args) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let gather_config = args.gather_config();
        let gather_client = new_chat_client(&gather_config)?;
        info!(
            "Gather client configured: Model={}, BaseURL={}",
            gather_config.model,
            gather_config.base_url
        );

        let present_config = args.present_config();
        let present_client = new_chat_client(&present_config)?;
        info!(
            "Present client configured: Model={}, BaseURL={}",
            present_config.model,
            present_config.base_url
        );

        let prompts = match &args.prompts_path {
            Some(path) if !path.trim().is_empty() => prompt::load_prompts(path)?,
            _ => Arc::new(PromptConfig::default()),
        };

        let registry = Arc::new(SchemaRegistry::sports());
        info!("Schema registry loaded with {} tools", registry.len());

        let settings = AgentSettings {
            context_turns: args.context_turns,
            temperature: args.present_temperature,
            request_timeout: Duration::from_secs(args.request_timeout_secs),
        };

        Ok(Self::new(gather_client, present_client, registry, prompts, settings))
    }

    pub async fn process_user_query(&self, query: &str, history: &[ConversationTurn]) -> ChatResult {
        let gathered = self.gatherer.gather(query, history).await;
        self.composer.compose(query, history, &gathered).await
    }
}

#[async_trait]
impl QueryProcessor for ChatAgent {
    async fn process_user_query(&self, query: &str, history: &[ConversationTurn]) -> ChatResult {
        ChatAgent::process_user_query(self, query, history).await
    }
}
