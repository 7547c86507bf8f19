//! verse-forge: acrostic limerick generation service.
//!
//! This library provides the constraint checker, prompt builders and
//! generation orchestrator behind a small HTTP service that produces
//! architecture-themed limericks via an external LLM.

// Core modules
pub mod config;
pub mod constraint;
pub mod error;
pub mod llm;
pub mod orchestrator;
pub mod prompts;
pub mod server;

// Re-export commonly used error types
pub use error::LlmError;
