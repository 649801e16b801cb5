use log::{ info, warn, error };
use std::sync::Arc;
use std::time::Duration;

use super::{ preview, recent_turns, GatheredData };
use crate::config::prompt::PromptConfig;
use crate::llm::chat::{ ChatClient, CompletionRequest, PromptMessage };
use crate::llm::with_deadline;
use crate::models::chat::ConversationTurn;

/// Issues the search-augmented, tool-free call that collects raw facts.
pub struct Gatherer {
    client: Arc<dyn ChatClient>,
    prompts: Arc<PromptConfig>,
    context_turns: usize,
    deadline: Duration,
}

impl Gatherer {
    pub fn new(
        client: Arc<dyn ChatClient>,
        prompts: Arc<PromptConfig>,
        context_turns: usize,
        deadline: Duration
    ) -> Self {
        Self { client, prompts, context_turns, deadline }
    }

    pub fn build_request(&self, query: &str, history: &[ConversationTurn]) -> CompletionRequest {
        let mut messages = vec![PromptMessage::system(self.prompts.gather_system.clone())];
        messages.extend(recent_turns(history, self.context_turns).iter().map(PromptMessage::from));
        messages.push(PromptMessage::user(query));
        CompletionRequest::new(messages).with_web_search()
    }

    /// Never fails: provider errors come back as `GatheredData::Error`.
    pub async fn gather(&self, query: &str, history: &[ConversationTurn]) -> GatheredData {
        info!("Gathering data with {} for query: '{}'", self.client.get_model(), preview(query, 60));
        let request = self.build_request(query, history);

        match with_deadline(self.deadline, self.client.complete(&request)).await {
            Ok(response) => {
                let text = response.content.unwrap_or_default();
                let gathered = GatheredData::classify(&text);
                match &gathered {
                    GatheredData::Data(data) => info!("Data gathering complete: {}", preview(data, 200)),
                    GatheredData::NoDataNeeded => info!("Gatherer reports no data fetching is required"),
                    GatheredData::Error(description) => warn!("Gatherer returned no usable data: {}", description),
                }
                gathered
            }
            Err(e) => {
                error!("Data gathering failed: {}", e);
                GatheredData::Error(format!("Could not gather information due to an internal error: {}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::chat::mock::{ ScriptedChatClient, ScriptedReply };
    use crate::llm::chat::{ CompletionResponse, MessageRole };

    fn gatherer(client: Arc<ScriptedChatClient>, deadline: Duration) -> Gatherer {
        Gatherer::new(client, Arc::new(PromptConfig::default()), 6, deadline)
    }

    fn long_history() -> Vec<ConversationTurn> {
        (0..5)
            .flat_map(|i| {
                vec![
                    ConversationTurn::user(format!("question {}", i)),
                    ConversationTurn::assistant(format!("answer {}", i))
                ]
            })
            .collect()
    }

    #[tokio::test]
    async fn request_uses_search_and_recent_window() {
        let client = Arc::new(
            ScriptedChatClient::new("gpt-4o-search-preview").respond(
                CompletionResponse::text("Arsenal lead on 70 points.")
            )
        );
        let gatherer = gatherer(Arc::clone(&client), Duration::from_secs(5));

        let gathered = gatherer.gather("who leads the league?", &long_history()).await;
        assert_eq!(gathered, GatheredData::Data("Arsenal lead on 70 points.".to_string()));

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert!(request.web_search);
        assert!(!request.has_tools());
        assert!(request.tool_choice.is_none());
        // system + 6 history turns + query
        assert_eq!(request.messages.len(), 8);
        assert_eq!(request.messages[0].role, MessageRole::System);
        assert_eq!(request.messages[1].content, "question 2");
        assert_eq!(request.messages[6].content, "answer 4");
        assert_eq!(request.messages[7], PromptMessage::user("who leads the league?"));
    }

    #[tokio::test]
    async fn sentinel_reply_means_no_data() {
        let client = Arc::new(
            ScriptedChatClient::new("search").respond(
                CompletionResponse::text("The user is greeting me; no data fetching is required.")
            )
        );
        let gathered = gatherer(client, Duration::from_secs(5)).gather("hello", &[]).await;
        assert_eq!(gathered, GatheredData::NoDataNeeded);
    }

    #[tokio::test]
    async fn provider_failure_becomes_error_marker() {
        let client = Arc::new(ScriptedChatClient::new("search").fail("bad gateway"));
        let gathered = gatherer(client, Duration::from_secs(5)).gather("scores", &[]).await;

        match gathered {
            GatheredData::Error(description) => assert!(description.contains("bad gateway")),
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn hung_provider_is_cut_off() {
        let client = Arc::new(ScriptedChatClient::new("search").with_reply(ScriptedReply::Hang));
        let gathered = gatherer(client, Duration::from_millis(20)).gather("scores", &[]).await;

        match gathered {
            GatheredData::Error(description) => assert!(description.contains("timed out")),
            other => panic!("expected timeout error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_content_is_an_error() {
        let client = Arc::new(ScriptedChatClient::new("search").respond(CompletionResponse::default()));
        let gathered = gatherer(client, Duration::from_secs(5)).gather("scores", &[]).await;
        assert!(matches!(gathered, GatheredData::Error(_)));
    }
}
