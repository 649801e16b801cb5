use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use log::info;
use once_cell::sync::Lazy;
use regex::{ Captures, Regex };

use super::fallback::Fallbacks;

/// Phrase the gather model is told to emit when nothing needs looking up.
pub const NO_DATA_SENTINEL: &str = "no data fetching is required";

pub const DEFAULT_GATHER_SYSTEM: &str =
    "You are a highly capable sports information gatherer with live search access.
Understand the user's latest query in the context of the conversation so far, then search for the most relevant, accurate and current information.
Compile every fact you find (statistics, fixtures, standings, player details, team news, head-to-head records, live scores) into one comprehensive plain-text block.
Do NOT write a chat reply. Do NOT use tools. Return only the raw gathered data.
If the query is conversational (for example \"hello\", \"who are you?\", \"thanks\") or clearly outside sports and gaming, state exactly that no data fetching is required.";

pub const DEFAULT_CONVERSATIONAL_SYSTEM: &str =
    "You are GameNerd, a friendly and helpful sports AI assistant.
Answer the user's message directly and conversationally, using the conversation history for context.
If the user asks about you, introduce yourself as GameNerd.
If the request is outside sports and gaming, politely explain that those are the only topics you cover.
Do NOT use any tools. Do NOT include markdown links or URLs.";

pub const DEFAULT_PRESENTATION_SYSTEM: &str =
    "You are GameNerd, an expert sports AI assistant. You have been given a block of raw data gathered for the user.
Your tasks:
1. Write a friendly, concise reply to the user's query grounded only in the provided data.
2. Work out which shape the key information has.
3. Select the SINGLE most appropriate tool from the available list to structure it for display.
4. Fill in that tool's arguments completely and accurately from the data.
CRITICAL:
- You MUST call a tool whenever the query is data-related (schedules, standings, stats, news, players).
- Your reply must NOT contain markdown links or URLs. Mention sources by name only if needed.";

pub const DEFAULT_PRESENTATION_USER: &str =
    "Here is the user's original query: \"{user_query}\"

Here is the raw information gathered for you:
<DATA_BLOCK>
{gathered_data}
</DATA_BLOCK>

Now perform your tasks as instructed.";

#[derive(Debug)]
pub enum PromptError {
    MissingPlaceholder {
        template: &'static str,
        placeholder: &'static str,
    },
    EmptyFallback {
        field: &'static str,
    },
    IoError(std::io::Error),
    JsonError(serde_json::Error),
}

impl fmt::Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptError::MissingPlaceholder { template, placeholder } =>
                write!(f, "Prompt template '{}' is missing placeholder '{}'", template, placeholder),
            PromptError::EmptyFallback { field } =>
                write!(f, "Fallback reply '{}' must not be blank", field),
            PromptError::IoError(e) => write!(f, "Prompt file IO error: {}", e),
            PromptError::JsonError(e) => write!(f, "Prompt JSON parsing error: {}", e),
        }
    }
}

impl Error for PromptError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PromptError::IoError(e) => Some(e),
            PromptError::JsonError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PromptError {
    fn from(err: std::io::Error) -> Self {
        PromptError::IoError(err)
    }
}

impl From<serde_json::Error> for PromptError {
    fn from(err: serde_json::Error) -> Self {
        PromptError::JsonError(err)
    }
}

/// Prompt texts and fallback replies. Every field can be overridden from a
/// JSON file; anything left out keeps its built-in value.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PromptConfig {
    pub gather_system: String,
    pub conversational_system: String,
    pub presentation_system: String,
    pub presentation_user: String,
    pub fallbacks: Fallbacks,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            gather_system: DEFAULT_GATHER_SYSTEM.to_string(),
            conversational_system: DEFAULT_CONVERSATIONAL_SYSTEM.to_string(),
            presentation_system: DEFAULT_PRESENTATION_SYSTEM.to_string(),
            presentation_user: DEFAULT_PRESENTATION_USER.to_string(),
            fallbacks: Fallbacks::default(),
        }
    }
}

impl PromptConfig {
    fn validate(&self) -> Result<(), PromptError> {
        for placeholder in ["{user_query}", "{gathered_data}"] {
            if !self.presentation_user.contains(placeholder) {
                return Err(PromptError::MissingPlaceholder {
                    template: "presentation_user",
                    placeholder,
                });
            }
        }
        let fallbacks = [
            ("apology", &self.fallbacks.apology),
            ("tool_acknowledgement", &self.fallbacks.tool_acknowledgement),
            ("minimal_reply", &self.fallbacks.minimal_reply),
        ];
        for (field, text) in fallbacks {
            if text.trim().is_empty() {
                return Err(PromptError::EmptyFallback { field });
            }
        }
        Ok(())
    }
}

pub fn load_prompts<P: AsRef<Path>>(path: P) -> Result<Arc<PromptConfig>, PromptError> {
    let file_content = fs::read_to_string(&path)?;
    let config: PromptConfig = serde_json::from_str(&file_content)?;
    config.validate()?;
    info!("Loaded prompt overrides from {}", path.as_ref().display());
    Ok(Arc::new(config))
}

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{(user_query|gathered_data)\}").expect("placeholder pattern is valid")
});

/// Fills both placeholders in one pass; substituted text is never rescanned.
pub fn get_presentation_user_prompt(
    config: &PromptConfig,
    user_query: &str,
    gathered_data: &str
) -> String {
    PLACEHOLDER.replace_all(&config.presentation_user, |caps: &Captures| {
        let value = match &caps[1] {
            "user_query" => user_query,
            _ => gathered_data,
        };
        value.to_string()
    }).into_owned()
}
