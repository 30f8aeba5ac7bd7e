//! Conversation, model metadata and stream event types.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Role of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One piece of message content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Part {
    Text(String),
    /// Inline image, `data` is base64 encoded.
    Image { media_type: String, data: String },
}

/// A prior turn in the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", content = "content", rename_all = "lowercase")]
pub enum Message {
    User(Vec<Part>),
    Assistant(Vec<Part>),
}

impl Message {
    /// Shorthand for a user turn holding a single text part.
    pub fn user(text: impl Into<String>) -> Self {
        Message::User(vec![Part::Text(text.into())])
    }

    /// Shorthand for an assistant turn holding a single text part.
    pub fn assistant(text: impl Into<String>) -> Self {
        Message::Assistant(vec![Part::Text(text.into())])
    }

    pub fn role(&self) -> Role {
        match self {
            Message::User(_) => Role::User,
            Message::Assistant(_) => Role::Assistant,
        }
    }

    pub fn parts(&self) -> &[Part] {
        match self {
            Message::User(parts) | Message::Assistant(parts) => parts,
        }
    }
}

/// Token accounting reported at the end of a stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Event emitted by a streamed completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum StreamChunk {
    /// Incremental response text.
    Text(String),
    /// Incremental reasoning trace (vendor `reasoning_content` field).
    Reasoning(String),
    Usage(Usage),
}

/// Operating parameters of one model.
///
/// [`ModelInfo::default`] gives the fallback used when the host supplies no
/// metadata for a custom endpoint.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelInfo {
    /// Maximum output tokens. Only positive values are forwarded.
    pub max_tokens: Option<i64>,

    pub context_window: Option<u32>,

    pub supports_images: bool,

    /// Sampling temperature sent with every request except o3-mini ones.
    pub temperature: Option<f32>,

    /// The model expects the system instruction folded into the first user
    /// turn and consecutive same-role turns merged.
    pub r1_format_required: bool,
}

impl Default for ModelInfo {
    fn default() -> Self {
        Self {
            max_tokens: Some(-1),
            context_window: Some(128_000),
            supports_images: true,
            temperature: Some(DEFAULT_TEMPERATURE),
            r1_format_required: false,
        }
    }
}

pub const DEFAULT_TEMPERATURE: f32 = 0.0;

impl ModelInfo {
    /// Output token limit to send, if any.
    pub fn output_limit(&self) -> Option<u32> {
        self.max_tokens
            .filter(|&n| n > 0)
            .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
    }
}
