//! LLM integration for verse-forge.
//!
//! This module provides a client for OpenAI-compatible chat-completion
//! APIs. The [`LlmProvider`] trait is the seam between the generation
//! orchestrator and the network: production code uses [`OpenAiClient`],
//! tests substitute a scripted provider.
//!
//! ```ignore
//! use verse_forge::llm::{GenerationRequest, LlmProvider, Message, OpenAiClient};
//!
//! let client = OpenAiClient::from_env()?;
//! let request = GenerationRequest::new(
//!     "gpt-4o-mini",
//!     vec![Message::system("You are a poet."), Message::user("Generate now.")],
//! )
//! .with_temperature(0.7);
//! let response = client.generate(request).await?;
//! ```

pub mod openai;

pub use openai::{
    Choice, GenerationRequest, GenerationResponse, LlmProvider, Message, OpenAiClient, Usage,
};
