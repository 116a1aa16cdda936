//! obc-workflow: the fixed conversation pipeline
//!
//! Each user turn runs a directed graph of typed steps over a shared
//! [`ConversationState`]: classify the query, then either answer a general
//! question directly or extract project details, search the web for legal
//! sources, summarize the findings and expand them into a phased project
//! roadmap. The state is checkpointed after every step under the
//! conversation id so a resumed read observes the latest values.

pub mod checkpoint;
pub mod error;
pub mod events;
pub mod prompts;
pub mod state;
pub mod steps;
pub mod workflow;

pub use checkpoint::{CheckpointStore, FileCheckpointStore, MemoryCheckpointStore};
pub use error::{Error, Result};
pub use events::{TraceSender, WorkflowEvent};
pub use state::{ConversationState, SearchResult};
pub use workflow::{
    Node, QueryRoute, SummaryRoute, Workflow, WorkflowConfig, route_after_summary,
    route_query_type,
};
