//! LLM prompts for limerick generation and repair.
//!
//! This module contains the prompt construction logic for the two stages
//! of a generation request:
//!
//! - [`generation`] - the first request: persona, theme vocabulary,
//!   acrostic end-word directives and formatting rules
//! - [`repair`] - the single repair round issued when the first result
//!   violates the end-word constraint
//!
//! All builders are pure functions; nothing here performs I/O.

pub mod generation;
pub mod repair;

pub use generation::{build_generation_prompt, GenerationPrompt};
pub use repair::{build_repair_prompt, RepairPrompt};
