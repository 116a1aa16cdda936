//! Workflow trace events
//!
//! Steps report progress through a broadcast channel instead of reading an
//! ambient verbosity flag; whether anyone renders the events is purely a
//! presentation concern and never changes step behavior.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::workflow::Node;

/// Events emitted during one pipeline turn
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkflowEvent {
    /// A turn started
    TurnStart { conversation_id: String },

    /// A pipeline node started
    StepStart { node: Node },

    /// Classification wrote a label
    QueryClassified { query_type: String },

    /// Extraction wrote the project fields
    DetailsExtracted {
        project_type: String,
        city: String,
        geo_state: String,
    },

    /// Search skipped because project fields are unresolved
    SearchSkipped,

    /// A search query was issued
    SearchQuery { query: String },

    /// A raw hit was dropped for missing mandatory fields
    ResultDropped { query: String },

    /// Search finished across all queries
    SearchCompleted {
        valid_results: usize,
        legal_info_found: bool,
    },

    /// Summarize wrote its routing decision
    SummaryReady { route_decision: String },

    /// A pipeline node finished
    StepEnd { node: Node },

    /// A turn failed and degraded to the fixed failure roadmap
    Error { message: String },

    /// A turn finished
    TurnEnd { conversation_id: String },
}

/// Cloneable sender for workflow trace events. Sends are fire-and-forget:
/// a turn never fails because nobody is listening.
#[derive(Debug, Clone)]
pub struct TraceSender(broadcast::Sender<WorkflowEvent>);

impl TraceSender {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self(tx)
    }

    /// Subscribe to trace events
    pub fn subscribe(&self) -> broadcast::Receiver<WorkflowEvent> {
        self.0.subscribe()
    }

    /// Emit an event, ignoring the absence of receivers
    pub fn emit(&self, event: WorkflowEvent) {
        let _ = self.0.send(event);
    }
}

impl Default for TraceSender {
    fn default() -> Self {
        Self::new(256)
    }
}
