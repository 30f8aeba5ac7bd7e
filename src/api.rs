//! Wire formats spoken to OpenAI-compatible endpoints.

pub mod openai;
pub mod r1;

pub use openai::{ChatContent, ChatMessage, ChatRequest, ChatRole};
pub use r1::convert_to_r1_format;
