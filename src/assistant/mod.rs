// src/assistant/mod.rs
//! Local-model assistant: prompt builders for fit analysis, resume rewriting,
//! and interview prep, over a single chat-completion call with offline
//! fallbacks.

pub mod advisor;
pub mod model_client;

pub use advisor::{Assistant, FitReport};
pub use model_client::ModelClient;
