use serde_json::{ json, Value as JsonValue };

use super::ToolDefinition;

fn h2h_schema() -> JsonValue {
    let team = json!({
        "type": "object",
        "properties": {
            "name": { "type": "string" },
            "wins": { "type": ["integer", "null"] },
            "draws": { "type": ["integer", "null"] },
            "losses": { "type": ["integer", "null"] },
            "goals_for": { "type": ["integer", "null"] },
            "goals_against": { "type": ["integer", "null"] }
        },
        "required": ["name"]
    });

    json!({
        "type": "object",
        "title": "H2HData",
        "description": "Data for head-to-head comparisons.",
        "properties": {
            "h2h_summary": {
                "type": "object",
                "properties": {
                    "team1": team.clone(),
                    "team2": team,
                    "total_matches": { "type": ["integer", "null"] }
                },
                "required": ["team1", "team2"]
            },
            "recent_meetings": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "date": { "type": "string", "format": "date" },
                        "score": { "type": "string" },
                        "competition": { "type": "string" }
                    },
                    "required": ["date", "score"]
                }
            }
        },
        "required": ["h2h_summary"]
    })
}

fn standings_schema() -> JsonValue {
    json!({
        "type": "object",
        "title": "StandingsTableData",
        "description": "Data for a league standings table.",
        "properties": {
            "league_name": { "type": "string" },
            "season": { "type": ["string", "null"] },
            "standings": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "rank": { "type": ["integer", "string"] },
                        "team_name": { "type": "string" },
                        "logo_url": { "type": ["string", "null"], "format": "uri" },
                        "played": { "type": "integer" },
                        "wins": { "type": "integer" },
                        "draws": { "type": "integer" },
                        "losses": { "type": "integer" },
                        "goals_for": { "type": "integer" },
                        "goals_against": { "type": "integer" },
                        "goal_difference": { "type": "integer" },
                        "points": { "type": "integer" },
                        "form": { "type": ["string", "null"] }
                    },
                    "required": ["rank", "team_name", "played", "points"]
                }
            }
        },
        "required": ["league_name", "standings"]
    })
}

/// Shared shape for row-based tables (schedules, results).
fn table_schema(title: &str, description: &str) -> JsonValue {
    json!({
        "type": "object",
        "title": title,
        "description": description,
        "properties": {
            "title": { "type": "string" },
            "headers": { "type": "array", "items": { "type": "string" } },
            "rows": {
                "type": "array",
                "items": { "type": "array", "items": { "type": "string" } }
            },
            "sort_info": { "type": ["string", "null"] }
        },
        "required": ["headers", "rows"]
    })
}

fn player_profile_schema() -> JsonValue {
    json!({
        "type": "object",
        "title": "PlayerProfileData",
        "description": "Detailed profile information for a specific player.",
        "properties": {
            "full_name": { "type": "string" },
            "common_name": { "type": ["string", "null"] },
            "nationality": { "type": "string" },
            "date_of_birth": { "type": "string", "format": "date" },
            "age": { "type": "integer" },
            "primary_position": { "type": "string" },
            "secondary_positions": { "type": "array", "items": { "type": "string" } },
            "current_club_name": { "type": ["string", "null"] },
            "jersey_number": { "type": ["integer", "string", "null"] },
            "height_cm": { "type": ["integer", "null"] },
            "weight_kg": { "type": ["integer", "null"] },
            "preferred_foot": {
                "type": ["string", "null"],
                "enum": [null, "Right", "Left", "Both"]
            },
            "career_summary_stats": {
                "type": "object",
                "properties": {
                    "appearances": { "type": ["integer", "null"] },
                    "goals": { "type": ["integer", "null"] },
                    "assists": { "type": ["integer", "null"] }
                }
            },
            "market_value": { "type": ["string", "null"] }
        },
        "required": ["full_name", "nationality", "date_of_birth", "primary_position"]
    })
}

fn team_news_schema() -> JsonValue {
    json!({
        "type": "object",
        "title": "TeamNewsData",
        "description": "Latest news articles or summaries for a specific team.",
        "properties": {
            "team_name": { "type": "string" },
            "news_articles": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "source_name": { "type": ["string", "null"] },
                        "published_date": { "type": ["string", "null"], "format": "date-time" },
                        "url": { "type": ["string", "null"], "format": "uri" },
                        "summary": { "type": "string" }
                    },
                    "required": ["title", "summary"]
                }
            }
        },
        "required": ["team_name", "news_articles"]
    })
}

fn team_stats_schema() -> JsonValue {
    json!({
        "type": "object",
        "title": "TeamStatsData",
        "description": "Season statistics for a single team.",
        "properties": {
            "team_name": { "type": "string" },
            "competition": { "type": ["string", "null"] },
            "season": { "type": ["string", "null"] },
            "stats": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "label": { "type": "string" },
                        "value": { "type": ["string", "number"] }
                    },
                    "required": ["label", "value"]
                }
            }
        },
        "required": ["team_name", "stats"]
    })
}

pub(super) fn sports_tools() -> Vec<(ToolDefinition, &'static str)> {
    vec![
        (
            ToolDefinition::new(
                "present_h2h_comparison",
                "Presents a head-to-head comparison between two teams.",
                h2h_schema()
            ),
            "h2h_comparison_table",
        ),
        (
            ToolDefinition::new(
                "display_standings_table",
                "Displays a league standings table.",
                standings_schema()
            ),
            "standings_table",
        ),
        (
            ToolDefinition::new(
                "show_match_schedule",
                "Shows a schedule of upcoming matches for a specific day or period.",
                table_schema("MatchScheduleTableData", "Data for a table of upcoming matches.")
            ),
            "match_schedule_table",
        ),
        (
            ToolDefinition::new(
                "get_player_profile",
                "Retrieves detailed information about a sports player.",
                player_profile_schema()
            ),
            "player_profile_card",
        ),
        (
            ToolDefinition::new(
                "get_team_news",
                "Fetches latest news articles for a specific sports team.",
                team_news_schema()
            ),
            "news_article_list",
        ),
        (
            ToolDefinition::new(
                "show_match_results",
                "Shows final scores of recently played matches.",
                table_schema("MatchResultsTableData", "Data for a table of completed matches.")
            ),
            "match_results_table",
        ),
        (
            ToolDefinition::new(
                "get_team_stats",
                "Summarizes season statistics for a specific team.",
                team_stats_schema()
            ),
            "team_stats_card",
        ),
    ]
}
