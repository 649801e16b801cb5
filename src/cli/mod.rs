use clap::Parser;
use std::time::Duration;

use crate::llm::{ LlmConfig, DEFAULT_BASE_URL };

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Server Args ---
    /// Host address and port for the HTTP server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:8000")]
    pub server_addr: String,

    /// HTML page served at `/`. Missing files produce a 404.
    #[arg(long, env = "INDEX_PATH", default_value = "static/index.html")]
    pub index_path: String,

    // --- Provider Args ---
    /// API key for the OpenAI-compatible provider. Required.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: String,

    /// Base URL of the provider API (the `/chat/completions` route is appended).
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub openai_base_url: String,

    /// Search-augmented model used to gather facts.
    #[arg(long, env = "GATHER_MODEL", default_value = "gpt-4o-search-preview")]
    pub gather_model: String,

    /// Model used to write the reply and pick a UI tool.
    #[arg(long, env = "PRESENT_MODEL", default_value = "gpt-4o")]
    pub present_model: String,

    /// Sampling temperature for the presentation call.
    #[arg(long, env = "PRESENT_TEMPERATURE", default_value = "0.2")]
    pub present_temperature: f32,

    /// Seconds allowed to establish a provider connection.
    #[arg(long, env = "CONNECT_TIMEOUT_SECS", default_value = "15")]
    pub connect_timeout_secs: u64,

    /// Seconds allowed for a whole provider call.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "180")]
    pub request_timeout_secs: u64,

    /// Optional JSON file overriding prompt texts and fallback replies.
    #[arg(long, env = "PROMPTS_PATH")]
    pub prompts_path: Option<String>,

    // --- History Args ---
    /// History store type (memory)
    #[arg(long, env = "HISTORY_TYPE", default_value = "memory")]
    pub history_type: String,

    /// Turns kept per user (10 = five user/assistant exchanges).
    #[arg(long, env = "HISTORY_LIMIT", default_value = "10")]
    pub history_limit: usize,

    /// Most recent turns sent to the model with each call.
    #[arg(long, env = "CONTEXT_TURNS", default_value = "6")]
    pub context_turns: usize,
}

impl Args {
    pub fn validate(&self) -> Result<(), String> {
        if self.openai_api_key.trim().is_empty() {
            return Err("OPENAI_API_KEY is not set; refusing to start".to_string());
        }
        if self.history_limit == 0 {
            return Err("HISTORY_LIMIT must be at least 1".to_string());
        }
        if self.request_timeout_secs == 0 || self.connect_timeout_secs == 0 {
            return Err("Provider timeouts must be greater than zero".to_string());
        }
        Ok(())
    }

    fn llm_config(&self, model: &str) -> LlmConfig {
        LlmConfig::new(self.openai_api_key.clone(), model)
            .with_base_url(self.openai_base_url.clone())
            .with_timeouts(
                Duration::from_secs(self.connect_timeout_secs),
                Duration::from_secs(self.request_timeout_secs)
            )
    }

    pub fn gather_config(&self) -> LlmConfig {
        self.llm_config(&self.gather_model)
    }

    pub fn present_config(&self) -> LlmConfig {
        self.llm_config(&self.present_model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["gamenerd", "--openai-api-key", "sk-test"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn explicit_flags_override_defaults() {
        let args = parse(&["--history-limit", "4", "--context-turns", "2", "--gather-model", "search-mini"]);
        assert_eq!(args.history_limit, 4);
        assert_eq!(args.context_turns, 2);
        assert_eq!(args.gather_config().model, "search-mini");
        assert!(args.validate().is_ok());
    }

    #[test]
    fn provider_configs_share_key_and_timeouts() {
        let args = parse(&[
            "--connect-timeout-secs",
            "5",
            "--request-timeout-secs",
            "30",
            "--present-model",
            "gpt-4o",
        ]);
        let gather = args.gather_config();
        let present = args.present_config();

        assert_eq!(gather.api_key, "sk-test");
        assert_eq!(present.model, "gpt-4o");
        assert_eq!(present.connect_timeout, Duration::from_secs(5));
        assert_eq!(gather.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn blank_key_is_fatal() {
        let mut args = parse(&[]);
        args.openai_api_key = "   ".to_string();
        assert!(args.validate().unwrap_err().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn zero_history_limit_is_rejected() {
        let args = parse(&["--history-limit", "0"]);
        assert!(args.validate().is_err());
    }
}
