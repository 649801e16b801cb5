use serde::Deserialize;

pub const DEFAULT_APOLOGY: &str =
    "I'm sorry, I had trouble processing the sports information. Please try rephrasing your request.";
pub const DEFAULT_TOOL_ACKNOWLEDGEMENT: &str = "Certainly! Here is the information you requested.";
pub const DEFAULT_MINIMAL_REPLY: &str = "I've processed your request.";

/// Fixed texts used whenever the model gives us nothing usable.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Fallbacks {
    /// Reply when the presentation call fails outright.
    pub apology: String,
    /// Reply when the model filled a tool but wrote no text.
    pub tool_acknowledgement: String,
    /// Reply when the model returned neither text nor a tool call.
    pub minimal_reply: String,
}

impl Default for Fallbacks {
    fn default() -> Self {
        Self {
            apology: DEFAULT_APOLOGY.to_string(),
            tool_acknowledgement: DEFAULT_TOOL_ACKNOWLEDGEMENT.to_string(),
            minimal_reply: DEFAULT_MINIMAL_REPLY.to_string(),
        }
    }
}

/// Reply sent by the host when the core itself blew up.
pub fn critical_error_reply(kind: &str) -> String {
    format!("A critical server error ({}) occurred. Please try again later.", kind)
}
