//! Tool definitions offered to the presentation model and the UI component
//! each tool renders as.

mod definitions;

use log::warn;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use thiserror::Error;

use crate::models::chat::GENERIC_COMPONENT_TYPE;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("tool '{0}' is already registered")]
    DuplicateTool(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema for the tool arguments.
    pub parameters: JsonValue,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: JsonValue) -> Self {
        Self { name: name.into(), description: description.into(), parameters }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    tools: Vec<ToolDefinition>,
    component_types: HashMap<String, String>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The sports tool set, in the order it is offered to the model.
    pub fn sports() -> Self {
        let mut registry = Self::new();
        for (tool, component_type) in definitions::sports_tools() {
            let registered = registry.register(tool, component_type);
            debug_assert!(registered.is_ok(), "built-in tool table is inconsistent: {:?}", registered);
            if let Err(e) = registered {
                warn!("Built-in tool table is inconsistent: {}", e);
            }
        }
        registry
    }

    pub fn register(
        &mut self,
        tool: ToolDefinition,
        component_type: impl Into<String>
    ) -> Result<(), SchemaError> {
        if self.component_types.contains_key(&tool.name) {
            return Err(SchemaError::DuplicateTool(tool.name));
        }
        self.component_types.insert(tool.name.clone(), component_type.into());
        self.tools.push(tool);
        Ok(())
    }

    pub fn tools(&self) -> &[ToolDefinition] {
        &self.tools
    }

    pub fn component_type_for(&self, name: &str) -> &str {
        self.component_types.get(name).map(String::as_str).unwrap_or(GENERIC_COMPONENT_TYPE)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.component_types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sports_registry_maps_every_tool() {
        let registry = SchemaRegistry::sports();
        assert_eq!(registry.len(), 7);
        for tool in registry.tools() {
            assert_ne!(registry.component_type_for(&tool.name), GENERIC_COMPONENT_TYPE, "{}", tool.name);
            assert_eq!(tool.parameters["type"], "object", "{}", tool.name);
            assert!(!tool.description.is_empty());
        }
    }

    #[test]
    fn built_in_table_has_unique_names() {
        let table = definitions::sports_tools();
        let mut names: Vec<_> = table.iter().map(|(tool, _)| tool.name.clone()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), table.len());
        assert_eq!(SchemaRegistry::sports().len(), table.len());
    }

    #[test]
    fn known_component_types() {
        let registry = SchemaRegistry::sports();
        assert_eq!(registry.component_type_for("present_h2h_comparison"), "h2h_comparison_table");
        assert_eq!(registry.component_type_for("display_standings_table"), "standings_table");
        assert_eq!(registry.component_type_for("show_match_schedule"), "match_schedule_table");
        assert_eq!(registry.component_type_for("get_player_profile"), "player_profile_card");
        assert_eq!(registry.component_type_for("get_team_news"), "news_article_list");
        assert_eq!(registry.component_type_for("show_match_results"), "match_results_table");
        assert_eq!(registry.component_type_for("get_team_stats"), "team_stats_card");
    }

    #[test]
    fn unknown_names_fall_back_to_generic() {
        let registry = SchemaRegistry::sports();
        assert_eq!(registry.component_type_for("book_tickets"), GENERIC_COMPONENT_TYPE);
        assert!(!registry.contains("book_tickets"));
    }

    #[test]
    fn order_is_preserved() {
        let names: Vec<_> = SchemaRegistry::sports()
            .tools()
            .iter()
            .map(|t| t.name.clone())
            .collect();
        assert_eq!(names[0], "present_h2h_comparison");
        assert_eq!(names[1], "display_standings_table");
        assert_eq!(names.last().map(String::as_str), Some("get_team_stats"));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = SchemaRegistry::new();
        let tool = ToolDefinition::new("live_score", "Live score", json!({ "type": "object" }));
        registry.register(tool.clone(), "live_score_card").unwrap();

        let err = registry.register(tool, "other_card").unwrap_err();
        assert_eq!(err, SchemaError::DuplicateTool("live_score".to_string()));
        assert_eq!(registry.component_type_for("live_score"), "live_score_card");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn standings_rows_require_core_columns() {
        let registry = SchemaRegistry::sports();
        let standings = registry
            .tools()
            .iter()
            .find(|t| t.name == "display_standings_table")
            .unwrap();
        let required = &standings.parameters["properties"]["standings"]["items"]["required"];
        assert_eq!(required, &json!(["rank", "team_name", "played", "points"]));
    }
}
