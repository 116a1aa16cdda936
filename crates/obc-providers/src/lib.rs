//! obc-providers: capability provider abstraction layer
//!
//! This crate provides a common interface for the three external
//! capabilities the assistant depends on: structured extraction and
//! classification, freeform text generation, and web search. Concrete
//! backends (Groq chat completions, Tavily search) live behind the traits
//! so the pipeline never names a vendor.

pub mod error;
pub mod groq;
pub mod tavily;
pub mod types;

pub use error::{Error, Result};
pub use groq::GroqProvider;
pub use tavily::TavilyProvider;
pub use types::*;

use async_trait::async_trait;

/// A capability that turns free text into a typed record of a requested
/// shape. Callers must tolerate the provider handing back raw text instead
/// of a parsed record.
#[async_trait]
pub trait StructuredModel: Send + Sync {
    async fn invoke(
        &self,
        instruction: &str,
        input: &str,
        shape: &RecordShape,
    ) -> Result<StructuredResponse>;
}

/// A capability that generates freeform text under a system instruction.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, system: &str, user: &str) -> Result<String>;
}

/// A web search capability. A response without usable results is zero
/// hits, not an error.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<SearchResponse>;
}
