//! The two provider calls behind every chat turn: gather facts, then present them.

pub mod composer;
pub mod gatherer;
pub mod links;

use crate::config::prompt::NO_DATA_SENTINEL;
use crate::models::chat::ConversationTurn;

pub use composer::{ ComposeError, Composer };
pub use gatherer::Gatherer;
pub use links::strip_links;

pub const ERROR_PREFIX: &str = "Error:";

/// Outcome of the gather call, classified once so the composer never has to
/// inspect free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatheredData {
    /// Conversational or out-of-scope query; nothing was looked up.
    NoDataNeeded,
    /// The gather call failed; the description is for logs and diagnostics.
    Error(String),
    Data(String),
}

impl GatheredData {
    pub fn classify(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return GatheredData::Error("empty response from provider".to_string());
        }
        if trimmed.to_lowercase().contains(NO_DATA_SENTINEL) {
            return GatheredData::NoDataNeeded;
        }
        if let Some(rest) = trimmed.strip_prefix(ERROR_PREFIX) {
            return GatheredData::Error(rest.trim().to_string());
        }
        GatheredData::Data(trimmed.to_string())
    }

    pub fn data(&self) -> Option<&str> {
        match self {
            GatheredData::Data(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_data(&self) -> bool {
        matches!(self, GatheredData::Data(_))
    }
}

/// The last `k` turns of `history`, oldest first.
pub fn recent_turns(history: &[ConversationTurn], k: usize) -> &[ConversationTurn] {
    &history[history.len().saturating_sub(k)..]
}

pub(crate) fn preview(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        out.push_str("...");
    }
    out
}
