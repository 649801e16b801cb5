use serde::{ Serialize, Deserialize };
use serde_json::{ Map, Value as JsonValue };

pub const GENERIC_COMPONENT_TYPE: &str = "generic_text";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message of a stored conversation. Never mutated after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Structured payload rendered by the client next to the text reply.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UiPayload {
    pub component_type: String,
    pub data: JsonValue,
}

impl UiPayload {
    pub fn new(component_type: impl Into<String>, data: JsonValue) -> Self {
        Self { component_type: component_type.into(), data }
    }

    pub fn generic() -> Self {
        Self::new(GENERIC_COMPONENT_TYPE, JsonValue::Object(Map::new()))
    }

    pub fn error(description: impl Into<String>) -> Self {
        let mut data = Map::new();
        data.insert("error".to_string(), JsonValue::String(description.into()));
        Self::new(GENERIC_COMPONENT_TYPE, JsonValue::Object(data))
    }
}

impl Default for UiPayload {
    fn default() -> Self {
        Self::generic()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatResult {
    pub reply: String,
    pub ui_data: UiPayload,
}

impl ChatResult {
    pub fn new(reply: impl Into<String>, ui_data: UiPayload) -> Self {
        Self { reply: reply.into(), ui_data }
    }
}
