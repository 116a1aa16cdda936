//! Conversation state threaded through one pipeline turn

use serde::{Deserialize, Serialize};

/// Placeholder for a project field the extraction step could not fill.
pub const UNKNOWN: &str = "unknown";

/// Classification label for construction/permitting questions.
pub const LEGAL_QUERY: &str = "legal_query";
/// Classification label for greetings and capability questions.
pub const GENERAL_QUERY: &str = "general_query";

/// Routing label written by the summarize step when a summary exists.
pub const ROUTE_ROADMAP: &str = "roadmap";
/// Routing label written by the summarize step when no summary was possible.
pub const ROUTE_END: &str = "end";

/// A validated web search hit. All three fields are mandatory; raw hits
/// missing any of them are dropped during validation and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub content: String,
    pub url: String,
}

impl SearchResult {
    /// Validate a raw search hit. Returns `None` unless `title`, `content`
    /// and `url` are all present as strings.
    pub fn from_raw(raw: &serde_json::Value) -> Option<Self> {
        let title = raw.get("title")?.as_str()?;
        let content = raw.get("content")?.as_str()?;
        let url = raw.get("url")?.as_str()?;
        Some(Self {
            title: title.to_string(),
            content: content.to_string(),
            url: url.to_string(),
        })
    }
}

/// Shared state for one user turn. Owned exclusively by the workflow for
/// the duration of the turn and checkpointed after every step; no step
/// writes fields outside its contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationState {
    /// Combined prior-turn context plus the latest message. Set once at
    /// entry, read-only thereafter.
    pub user_input: String,
    /// Raw classification label. Stored as text because the classifier
    /// provider emits text; the router is total over whatever lands here.
    pub query_type: String,
    pub project_type: String,
    pub city: String,
    pub geo_state: String,
    /// True iff at least one validated search result was obtained.
    pub legal_info_found: bool,
    /// Validated search results, append-only within a turn.
    pub search_results: Vec<SearchResult>,
    /// Synthesized legal summary, or the no-summary sentinel.
    pub legal_summary: String,
    /// Raw routing label written by the summarize step.
    pub route_decision: String,
    /// Final user-visible output, written by exactly one of the
    /// general-response or roadmap steps.
    pub project_roadmap: String,
}

impl ConversationState {
    /// Fresh state for one turn. Project fields start `"unknown"`.
    pub fn new(user_input: impl Into<String>) -> Self {
        Self {
            user_input: user_input.into(),
            project_type: UNKNOWN.to_string(),
            city: UNKNOWN.to_string(),
            geo_state: UNKNOWN.to_string(),
            ..Self::default()
        }
    }

    /// Whether any project field is still unfilled. While this holds, the
    /// search step must not issue queries.
    pub fn has_unknown_fields(&self) -> bool {
        self.project_type == UNKNOWN || self.city == UNKNOWN || self.geo_state == UNKNOWN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_state_defaults() {
        let state = ConversationState::new("hello");
        assert_eq!(state.user_input, "hello");
        assert_eq!(state.project_type, UNKNOWN);
        assert_eq!(state.city, UNKNOWN);
        assert_eq!(state.geo_state, UNKNOWN);
        assert!(!state.legal_info_found);
        assert!(state.search_results.is_empty());
        assert!(state.has_unknown_fields());
    }

    #[test]
    fn test_has_unknown_fields_per_field() {
        let mut state = ConversationState::new("x");
        state.project_type = "deck".to_string();
        state.city = "Austin".to_string();
        assert!(state.has_unknown_fields());
        state.geo_state = "TX".to_string();
        assert!(!state.has_unknown_fields());
    }

    #[test]
    fn test_search_result_validation() {
        let valid = json!({"title": "t", "content": "c", "url": "u", "score": 0.9});
        let result = SearchResult::from_raw(&valid).unwrap();
        assert_eq!(result.title, "t");
        assert_eq!(result.url, "u");

        assert!(SearchResult::from_raw(&json!({"title": "t", "content": "c"})).is_none());
        assert!(SearchResult::from_raw(&json!({"title": "t", "url": "u"})).is_none());
        assert!(SearchResult::from_raw(&json!({"content": "c", "url": "u"})).is_none());
        assert!(SearchResult::from_raw(&json!({"title": 1, "content": "c", "url": "u"})).is_none());
    }

    #[test]
    fn test_state_round_trips_through_json() {
        let mut state = ConversationState::new("deck in Austin");
        state.query_type = LEGAL_QUERY.to_string();
        state.search_results.push(SearchResult {
            title: "t".to_string(),
            content: "c".to_string(),
            url: "u".to_string(),
        });

        let json = serde_json::to_string(&state).unwrap();
        let back: ConversationState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
