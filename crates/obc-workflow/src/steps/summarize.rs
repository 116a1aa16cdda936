//! Search result synthesis step
//!
//! The aggregate result bundle is passed to the generator whole; the step
//! assumes it fits the model's input limits rather than chunking it.

use obc_providers::Generator;

use crate::error::Result;
use crate::events::{TraceSender, WorkflowEvent};
use crate::prompts;
use crate::state::{ConversationState, ROUTE_END, ROUTE_ROADMAP, SearchResult};

/// Synthesize the validated search results into a cited legal summary and
/// decide the route: `roadmap` on success, `end` when there is nothing to
/// summarize or the generation call fails.
pub async fn run(
    generator: &dyn Generator,
    state: &mut ConversationState,
    trace: &TraceSender,
) -> Result<()> {
    if !state.legal_info_found || state.search_results.is_empty() {
        state.legal_summary = prompts::NO_SUMMARY_SENTINEL.to_string();
        state.route_decision = ROUTE_END.to_string();
        trace.emit(WorkflowEvent::SummaryReady {
            route_decision: state.route_decision.clone(),
        });
        return Ok(());
    }

    let bundle = format_results(&state.search_results);
    let system =
        prompts::summarizer_instruction(&state.project_type, &state.city, &state.geo_state);
    let user = format!("Here are the search results:\n\n{bundle}");

    match generator.generate(&system, &user).await {
        Ok(summary) => {
            state.legal_summary = summary;
            state.route_decision = ROUTE_ROADMAP.to_string();
        }
        Err(e) => {
            tracing::warn!("error generating legal summary: {}", e);
            state.legal_summary = prompts::NO_SUMMARY_SENTINEL.to_string();
            state.route_decision = ROUTE_END.to_string();
        }
    }

    trace.emit(WorkflowEvent::SummaryReady {
        route_decision: state.route_decision.clone(),
    });
    Ok(())
}

/// Format every validated result into a delimited, indexed block.
fn format_results(results: &[SearchResult]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(i, result)| {
            format!(
                "--- Result {} ---\nTitle: {}\nURL: {}\nContent: {}\n-------------------\n",
                i + 1,
                result.title,
                result.url,
                result.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
