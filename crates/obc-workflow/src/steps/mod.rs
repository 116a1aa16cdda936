//! Pipeline step implementations
//!
//! Each step is a free async function over the shared state and the
//! provider it needs. Steps absorb provider failures into documented
//! fallback values; absence of data is itself meaningful downstream.

pub mod classify;
pub mod extract;
pub mod general;
pub mod roadmap;
pub mod search;
pub mod summarize;
