//! Roadmap generation step

use obc_providers::Generator;

use crate::error::Result;
use crate::prompts;
use crate::state::ConversationState;

/// Expand the legal summary into a seven-phase project roadmap. If the
/// summary is empty or the no-summary sentinel, the roadmap is a fixed
/// failure string and the generator is never invoked.
pub async fn run(generator: &dyn Generator, state: &mut ConversationState) -> Result<()> {
    if state.legal_summary.is_empty() || state.legal_summary == prompts::NO_SUMMARY_SENTINEL {
        state.project_roadmap = prompts::ROADMAP_UNAVAILABLE.to_string();
        return Ok(());
    }

    let system = prompts::roadmap_instruction(
        &state.legal_summary,
        &state.project_type,
        &state.city,
        &state.geo_state,
    );

    state.project_roadmap = match generator.generate(&system, "Generate the project roadmap.").await
    {
        Ok(roadmap) => roadmap,
        Err(e) => {
            tracing::warn!("error generating project roadmap: {}", e);
            prompts::ROADMAP_UNAVAILABLE.to_string()
        }
    };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::mocks::ScriptedGenerator;
    use std::sync::atomic::Ordering;

    fn state_with_summary(summary: &str) -> ConversationState {
        let mut state = ConversationState::new("deck in Austin, TX");
        state.project_type = "deck".to_string();
        state.city = "Austin".to_string();
        state.geo_state = "TX".to_string();
        state.legal_summary = summary.to_string();
        state
    }

    #[tokio::test]
    async fn test_sentinel_summary_skips_generation() {
        let generator = ScriptedGenerator::new(vec![Some("should not be called")]);
        let mut state = state_with_summary(prompts::NO_SUMMARY_SENTINEL);
        run(&generator, &mut state).await.unwrap();

        assert_eq!(generator.calls.load(Ordering::Relaxed), 0);
        assert_eq!(state.project_roadmap, prompts::ROADMAP_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_empty_summary_skips_generation() {
        let generator = ScriptedGenerator::new(vec![Some("should not be called")]);
        let mut state = state_with_summary("");
        run(&generator, &mut state).await.unwrap();

        assert_eq!(generator.calls.load(Ordering::Relaxed), 0);
        assert_eq!(state.project_roadmap, prompts::ROADMAP_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_roadmap_prompt_carries_summary_and_disclaimer() {
        let generator = ScriptedGenerator::new(vec![Some("Phase 1: ...")]);
        let mut state = state_with_summary("permits are required (https://a.example)");
        run(&generator, &mut state).await.unwrap();

        assert_eq!(state.project_roadmap, "Phase 1: ...");
        let requests = generator.requests.lock();
        let (system, user) = &requests[0];
        assert!(system.contains("permits are required (https://a.example)"));
        assert!(system.contains(prompts::DISCLAIMER));
        assert_eq!(user, "Generate the project roadmap.");
    }

    #[tokio::test]
    async fn test_generation_error_degrades_to_fixed_string() {
        let generator = ScriptedGenerator::failing();
        let mut state = state_with_summary("a real summary");
        run(&generator, &mut state).await.unwrap();
        assert_eq!(state.project_roadmap, prompts::ROADMAP_UNAVAILABLE);
    }
}
