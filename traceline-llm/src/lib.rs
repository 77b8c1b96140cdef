//! Traceline LLM - model endpoint access for the alignment pipeline
//!
//! This crate wraps an OpenAI-compatible chat completions endpoint behind a
//! small `ChatApi` trait so the alignment and review pipeline can be driven
//! by any completion backend, including scripted fakes in tests.

mod client;
mod error;
mod message;

pub use client::{ChatApi, ChatRequest, GenerationParams, LlmClient};
pub use error::{Error, Result};
pub use message::{ChatMessage, Role};
