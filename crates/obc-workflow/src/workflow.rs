//! The orchestration graph
//!
//! A fixed topology executed once per user turn: classification branches to
//! either the general-response terminal or the extraction/search/summarize/
//! roadmap chain. The shared state is checkpointed after every node under
//! the conversation id.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use obc_providers::{Generator, SearchProvider, StructuredModel};

use crate::checkpoint::CheckpointStore;
use crate::events::{TraceSender, WorkflowEvent};
use crate::prompts;
use crate::state::{ConversationState, LEGAL_QUERY, ROUTE_ROADMAP};
use crate::steps;

/// Nodes of the pipeline graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    ClassifyQuery,
    HandleGeneralQuery,
    ParseUserInput,
    LegalSearch,
    Summarize,
    GenerateRoadmap,
    End,
}

/// Branch taken after classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryRoute {
    Legal,
    General,
}

/// Branch label computed by the summarize step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryRoute {
    Roadmap,
    End,
}

/// Route on the stored classification label. Total: any label other than
/// `legal_query`, including an empty or unclassified one, takes the
/// general path.
pub fn route_query_type(state: &ConversationState) -> QueryRoute {
    if state.query_type == LEGAL_QUERY {
        QueryRoute::Legal
    } else {
        QueryRoute::General
    }
}

/// Route on the stored summarize decision. Total: any label other than
/// `roadmap` reads as `End`.
pub fn route_after_summary(state: &ConversationState) -> SummaryRoute {
    if state.route_decision == ROUTE_ROADMAP {
        SummaryRoute::Roadmap
    } else {
        SummaryRoute::End
    }
}

/// The edge table. The summarize branch is a real conditional, but both
/// labels currently lead to the roadmap node: a missing summary is
/// reported by the roadmap step itself as the fixed failure string.
fn next_node(node: Node, state: &ConversationState) -> Node {
    match node {
        Node::ClassifyQuery => match route_query_type(state) {
            QueryRoute::Legal => Node::ParseUserInput,
            QueryRoute::General => Node::HandleGeneralQuery,
        },
        Node::HandleGeneralQuery => Node::End,
        Node::ParseUserInput => Node::LegalSearch,
        Node::LegalSearch => Node::Summarize,
        Node::Summarize => match route_after_summary(state) {
            SummaryRoute::Roadmap => Node::GenerateRoadmap,
            SummaryRoute::End => Node::GenerateRoadmap,
        },
        Node::GenerateRoadmap => Node::End,
        Node::End => Node::End,
    }
}

/// Workflow configuration
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Label stored when classification fails or returns nothing usable.
    pub classification_fallback: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            classification_fallback: LEGAL_QUERY.to_string(),
        }
    }
}

/// The per-turn pipeline executor
pub struct Workflow {
    config: WorkflowConfig,
    model: Arc<dyn StructuredModel>,
    generator: Arc<dyn Generator>,
    search: Arc<dyn SearchProvider>,
    checkpoints: Arc<dyn CheckpointStore>,
    trace: TraceSender,
}

impl Workflow {
    pub fn new(
        model: Arc<dyn StructuredModel>,
        generator: Arc<dyn Generator>,
        search: Arc<dyn SearchProvider>,
        checkpoints: Arc<dyn CheckpointStore>,
    ) -> Self {
        Self {
            config: WorkflowConfig::default(),
            model,
            generator,
            search,
            checkpoints,
            trace: TraceSender::default(),
        }
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: WorkflowConfig) -> Self {
        self.config = config;
        self
    }

    /// Subscribe to trace events
    pub fn subscribe(&self) -> broadcast::Receiver<WorkflowEvent> {
        self.trace.subscribe()
    }

    /// Latest checkpointed state for a conversation, if any
    pub fn latest_state(
        &self,
        conversation_id: &str,
    ) -> std::io::Result<Option<ConversationState>> {
        self.checkpoints.get_latest(conversation_id)
    }

    /// Execute one user turn against a fresh state.
    ///
    /// Always yields a state with some `project_roadmap` text, even under
    /// total provider failure. Concurrent turns for the same conversation
    /// id are not safe; callers must serialize them.
    pub async fn run_turn(
        &self,
        conversation_id: &str,
        user_input: impl Into<String>,
    ) -> ConversationState {
        let mut state = ConversationState::new(user_input);
        self.trace.emit(WorkflowEvent::TurnStart {
            conversation_id: conversation_id.to_string(),
        });

        if let Err(e) = self.execute(conversation_id, &mut state).await {
            tracing::error!("turn failed for conversation {}: {}", conversation_id, e);
            self.trace.emit(WorkflowEvent::Error {
                message: e.to_string(),
            });
            state.project_roadmap = prompts::EXECUTION_FAILED.to_string();
            self.checkpoint(conversation_id, Node::End, &state);
        }

        self.trace.emit(WorkflowEvent::TurnEnd {
            conversation_id: conversation_id.to_string(),
        });
        state
    }

    async fn execute(
        &self,
        conversation_id: &str,
        state: &mut ConversationState,
    ) -> crate::error::Result<()> {
        let mut node = Node::ClassifyQuery;
        while node != Node::End {
            self.trace.emit(WorkflowEvent::StepStart { node });
            self.run_node(node, state).await?;
            self.trace.emit(WorkflowEvent::StepEnd { node });
            self.checkpoint(conversation_id, node, state);
            node = next_node(node, state);
        }
        Ok(())
    }

    async fn run_node(
        &self,
        node: Node,
        state: &mut ConversationState,
    ) -> crate::error::Result<()> {
        match node {
            Node::ClassifyQuery => {
                steps::classify::run(
                    self.model.as_ref(),
                    &self.config.classification_fallback,
                    state,
                    &self.trace,
                )
                .await
            }
            Node::HandleGeneralQuery => steps::general::run(self.generator.as_ref(), state).await,
            Node::ParseUserInput => {
                steps::extract::run(self.model.as_ref(), state, &self.trace).await
            }
            Node::LegalSearch => steps::search::run(self.search.as_ref(), state, &self.trace).await,
            Node::Summarize => {
                steps::summarize::run(self.generator.as_ref(), state, &self.trace).await
            }
            Node::GenerateRoadmap => steps::roadmap::run(self.generator.as_ref(), state).await,
            Node::End => Ok(()),
        }
    }

    /// Persist a snapshot. Write failures are logged, not fatal: the turn
    /// must still produce a roadmap.
    fn checkpoint(&self, conversation_id: &str, node: Node, state: &ConversationState) {
        if let Err(e) = self.checkpoints.put(conversation_id, node, state) {
            tracing::warn!(
                "failed to checkpoint conversation {} after {:?}: {}",
                conversation_id,
                node,
                e
            );
        }
    }
}
