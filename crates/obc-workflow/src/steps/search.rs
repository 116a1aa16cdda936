//! Legal web search step
//!
//! Issues five fixed queries sequentially, continue-on-error, validating
//! every raw hit before it is stored.

use obc_providers::SearchProvider;

use crate::error::Result;
use crate::events::{TraceSender, WorkflowEvent};
use crate::state::{ConversationState, SearchResult};

/// The five fixed query templates, parameterized by the extracted fields.
pub fn search_queries(project_type: &str, city: &str, geo_state: &str) -> [String; 5] {
    [
        format!("owner-builder rights {city}, {geo_state}"),
        format!("{project_type} permit requirements {city}, {geo_state}"),
        format!("zoning laws {city}, {geo_state} {project_type} construction"),
        format!("local construction ordinances {city}, {geo_state}"),
        format!("building codes {project_type} {city}, {geo_state}"),
    ]
}

/// Collect validated legal sources for the extracted project.
///
/// If any project field is still `"unknown"` the step is a pure skip: no
/// network calls, `legal_info_found=false`, empty results. Per-query
/// provider errors do not abort the remaining queries.
pub async fn run(
    search: &dyn SearchProvider,
    state: &mut ConversationState,
    trace: &TraceSender,
) -> Result<()> {
    if state.has_unknown_fields() {
        tracing::warn!("skipping legal search: project details unresolved");
        trace.emit(WorkflowEvent::SearchSkipped);
        state.legal_info_found = false;
        state.search_results = Vec::new();
        return Ok(());
    }

    let queries = search_queries(&state.project_type, &state.city, &state.geo_state);
    let mut found = false;

    for query in &queries {
        trace.emit(WorkflowEvent::SearchQuery { query: query.clone() });

        let response = match search.search(query).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("search failed for '{}': {}", query, e);
                continue;
            }
        };

        for raw in &response.results {
            match SearchResult::from_raw(raw) {
                Some(result) => {
                    state.search_results.push(result);
                    found = true;
                }
                None => {
                    tracing::warn!("dropping malformed search hit for '{}'", query);
                    trace.emit(WorkflowEvent::ResultDropped { query: query.clone() });
                }
            }
        }
    }

    state.legal_info_found = found;
    trace.emit(WorkflowEvent::SearchCompleted {
        valid_results: state.search_results.len(),
        legal_info_found: found,
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::mocks::{ScriptedSearch, hit};
    use obc_providers::SearchResponse;
    use serde_json::json;
    use std::sync::atomic::Ordering;

    fn ready_state() -> ConversationState {
        let mut state = ConversationState::new("deck in Austin, TX");
        state.project_type = "deck".to_string();
        state.city = "Austin".to_string();
        state.geo_state = "TX".to_string();
        state
    }

    #[test]
    fn test_query_templates_embed_all_fields() {
        let queries = search_queries("deck", "Austin", "TX");
        assert_eq!(queries[0], "owner-builder rights Austin, TX");
        assert_eq!(queries[1], "deck permit requirements Austin, TX");
        assert_eq!(queries[2], "zoning laws Austin, TX deck construction");
        assert_eq!(queries[3], "local construction ordinances Austin, TX");
        assert_eq!(queries[4], "building codes deck Austin, TX");
    }

    #[tokio::test]
    async fn test_unknown_fields_skip_all_network_calls() {
        let search = ScriptedSearch::repeating(vec![hit("t", "u")], 5);
        let mut state = ConversationState::new("build something somewhere");
        run(&search, &mut state, &TraceSender::default()).await.unwrap();

        assert_eq!(search.calls.load(Ordering::Relaxed), 0);
        assert!(!state.legal_info_found);
        assert!(state.search_results.is_empty());
    }

    #[tokio::test]
    async fn test_one_unknown_field_is_enough_to_skip() {
        let search = ScriptedSearch::repeating(vec![hit("t", "u")], 5);
        let mut state = ready_state();
        state.city = "unknown".to_string();
        run(&search, &mut state, &TraceSender::default()).await.unwrap();
        assert_eq!(search.calls.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn test_all_five_queries_issued_in_order() {
        let search = ScriptedSearch::repeating(vec![hit("t", "u")], 5);
        let mut state = ready_state();
        run(&search, &mut state, &TraceSender::default()).await.unwrap();

        assert_eq!(search.calls.load(Ordering::Relaxed), 5);
        let queries = search.queries.lock();
        assert_eq!(
            *queries,
            search_queries("deck", "Austin", "TX").to_vec()
        );
        assert!(state.legal_info_found);
        assert_eq!(state.search_results.len(), 5);
    }

    #[tokio::test]
    async fn test_malformed_hits_are_dropped_regardless_of_position() {
        let results = vec![
            json!({"title": "no url", "content": "c"}),
            hit("valid-1", "https://one.example"),
            json!({"url": "https://no-title.example", "content": "c"}),
            hit("valid-2", "https://two.example"),
            json!({"title": "no content", "url": "https://three.example"}),
        ];
        let search = ScriptedSearch::new(vec![
            Some(SearchResponse { results }),
            Some(SearchResponse::default()),
            Some(SearchResponse::default()),
            Some(SearchResponse::default()),
            Some(SearchResponse::default()),
        ]);

        let mut state = ready_state();
        run(&search, &mut state, &TraceSender::default()).await.unwrap();

        let titles: Vec<&str> = state.search_results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["valid-1", "valid-2"]);
        assert!(state.legal_info_found);
    }

    #[tokio::test]
    async fn test_per_query_errors_do_not_abort_remaining_queries() {
        let search = ScriptedSearch::new(vec![
            None,
            Some(SearchResponse { results: vec![hit("t", "u")] }),
            None,
            Some(SearchResponse { results: vec![hit("t2", "u2")] }),
            None,
        ]);

        let mut state = ready_state();
        run(&search, &mut state, &TraceSender::default()).await.unwrap();

        assert_eq!(search.calls.load(Ordering::Relaxed), 5);
        assert_eq!(state.search_results.len(), 2);
        assert!(state.legal_info_found);
    }

    #[tokio::test]
    async fn test_zero_valid_hits_means_no_legal_info() {
        let search = ScriptedSearch::repeating(vec![json!({"title": "only title"})], 5);
        let mut state = ready_state();
        run(&search, &mut state, &TraceSender::default()).await.unwrap();

        assert!(!state.legal_info_found);
        assert!(state.search_results.is_empty());
    }
}
