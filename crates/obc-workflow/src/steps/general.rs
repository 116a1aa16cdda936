//! Short-circuit response for non-legal queries

use obc_providers::Generator;

use crate::error::Result;
use crate::prompts;
use crate::state::ConversationState;

/// Answer a general query under the fixed company persona. On provider
/// failure the reply degrades to a static greeting; this step never fails
/// a turn.
pub async fn run(generator: &dyn Generator, state: &mut ConversationState) -> Result<()> {
    let persona = prompts::general_persona();

    state.project_roadmap = match generator.generate(&persona, &state.user_input).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!("error generating general response: {}", e);
            prompts::FALLBACK_GREETING.to_string()
        }
    };
    Ok(())
}
