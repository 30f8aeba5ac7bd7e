//! OpenAI Chat Completions wire format.
//!
//! Request/response types for `POST /chat/completions` and `GET /models`, the
//! conversion from [`Message`]s into the standard role layout, and the mapping
//! from streamed chunks into [`StreamChunk`] events.
//! See: <https://platform.openai.com/docs/api-reference/chat>

use async_stream::try_stream;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::client::ClientError;
use crate::model::{Message, Part, StreamChunk, Usage};
use crate::options::ReasoningEffort;

// --- Chat Completions API Types ---

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub reasoning_effort: Option<ReasoningEffort>,
    pub stream: Option<bool>,
    pub stream_options: Option<StreamOptions>,
}

impl ChatRequest {
    /// Turn the request into a streaming one with usage reporting.
    pub fn streaming(mut self) -> Self {
        self.stream = Some(true);
        self.stream_options = Some(StreamOptions {
            include_usage: true,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamOptions {
    pub include_usage: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    /// Replaces `system` for the o-series reasoning models.
    Developer,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: ChatContent,
}

impl ChatMessage {
    pub fn text(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: ChatContent::Text(content.into()),
        }
    }
}

/// Message content: a plain string, or typed parts when images are involved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatContent {
    Text(String),
    Parts(Vec<ChatContentPart>),
}

impl ChatContent {
    /// Build content from message parts.
    ///
    /// Text-only content collapses into one string joined by newlines. Images
    /// are kept only when `allow_images` is set, since assistant turns cannot
    /// carry them.
    pub fn from_parts(parts: &[Part], allow_images: bool) -> Self {
        let has_images = parts.iter().any(|p| matches!(p, Part::Image { .. }));

        if !(has_images && allow_images) {
            let text = parts
                .iter()
                .filter_map(|p| match p {
                    Part::Text(text) => Some(text.as_str()),
                    Part::Image { .. } => None,
                })
                .collect::<Vec<_>>()
                .join("\n");
            return ChatContent::Text(text);
        }

        ChatContent::Parts(parts.iter().map(ChatContentPart::from).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

impl From<&Part> for ChatContentPart {
    fn from(part: &Part) -> Self {
        match part {
            Part::Text(text) => ChatContentPart::Text { text: text.clone() },
            Part::Image { media_type, data } => ChatContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: format!("data:{media_type};base64,{data}"),
                },
            },
        }
    }
}

impl ChatMessage {
    /// Convert one turn. Image parts of user turns are dropped unless the
    /// model `supports_images`.
    pub fn from_message(msg: &Message, supports_images: bool) -> Self {
        match msg {
            Message::User(parts) => ChatMessage {
                role: ChatRole::User,
                content: ChatContent::from_parts(parts, supports_images),
            },
            Message::Assistant(parts) => ChatMessage {
                role: ChatRole::Assistant,
                content: ChatContent::from_parts(parts, false),
            },
        }
    }
}

impl From<&Message> for ChatMessage {
    fn from(msg: &Message) -> Self {
        ChatMessage::from_message(msg, true)
    }
}

/// Convert a conversation into the standard role layout, one chat message per turn.
pub fn convert_to_openai_messages(messages: &[Message], supports_images: bool) -> Vec<ChatMessage> {
    messages
        .iter()
        .map(|msg| ChatMessage::from_message(msg, supports_images))
        .collect()
}

// --- Streaming Types ---

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatStreamChunk {
    #[serde(default)]
    pub choices: Vec<ChatStreamChoice>,
    pub usage: Option<ChatUsage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatStreamChoice {
    pub delta: Option<ChatDelta>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatDelta {
    pub content: Option<String>,
    /// DeepSeek-style reasoning trace.
    pub reasoning_content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatUsage {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
}

impl ChatStreamChunk {
    /// Events carried by this chunk, in emission order: text, reasoning, usage.
    pub fn into_events(self) -> Vec<StreamChunk> {
        let mut events = Vec::new();

        if let Some(delta) = self.choices.into_iter().next().and_then(|c| c.delta) {
            if let Some(content) = delta.content.filter(|c| !c.is_empty()) {
                events.push(StreamChunk::Text(content));
            }
            if let Some(reasoning) = delta.reasoning_content.filter(|r| !r.is_empty()) {
                events.push(StreamChunk::Reasoning(reasoning));
            }
        }

        if let Some(usage) = self.usage {
            events.push(StreamChunk::Usage(Usage {
                input_tokens: usage.prompt_tokens.unwrap_or(0),
                output_tokens: usage.completion_tokens.unwrap_or(0),
            }));
        }

        events
    }
}

/// Map a stream of SSE data payloads into [`StreamChunk`] events.
///
/// The first transport or parse error is yielded and ends the stream.
pub fn chat_events<S>(sse: S) -> impl Stream<Item = Result<StreamChunk, ClientError>> + Send
where
    S: Stream<Item = Result<String, ClientError>> + Send + 'static,
{
    try_stream! {
        let mut sse = Box::pin(sse);
        while let Some(data) = sse.next().await {
            let chunk: ChatStreamChunk = serde_json::from_str(&data?)?;
            for event in chunk.into_events() {
                yield event;
            }
        }
    }
}

// --- Model listing ---

#[derive(Debug, Clone, Deserialize)]
pub struct ModelsResponse {
    #[serde(default)]
    pub data: Vec<ModelEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelEntry {
    pub id: String,
}

impl From<ModelsResponse> for Vec<String> {
    fn from(resp: ModelsResponse) -> Self {
        resp.data.into_iter().map(|m| m.id).collect()
    }
}
