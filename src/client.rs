//! Core client trait and error types.

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;
use thiserror::Error;

use crate::model::{Message, ModelInfo, StreamChunk};

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("API error ({status}): {message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },

    /// No model id was configured and the endpoint did not list any.
    #[error("No models available: configure a model id or check the endpoint's model listing")]
    NoModelsAvailable,

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Boxed stream of events produced by a streamed completion.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<StreamChunk, ClientError>> + Send>>;

/// Main client trait for chat-completion providers.
#[async_trait]
pub trait Client: Send + Sync {
    /// Send the conversation and stream the response back as [`StreamChunk`]s.
    ///
    /// `system` is the system instruction; `messages` the prior turns, oldest first.
    async fn request_stream(
        &self,
        system: &str,
        messages: Vec<Message>,
    ) -> Result<ChunkStream, ClientError>;

    /// List the model ids the endpoint serves.
    ///
    /// Best effort: failures are logged and reported as an empty list.
    async fn list_models(&self) -> Vec<String>;

    /// The configured model id (empty when unset) and its metadata.
    fn model(&self) -> (String, ModelInfo);
}
