//! # oai-compat - OpenAI-compatible chat adapter
//!
//! A small, pragmatic client for endpoints that speak the OpenAI Chat
//! Completions API: OpenAI itself, Azure OpenAI gateways, DeepSeek and the
//! many self-hosted servers that mimic them.
//!
//! ## Features
//! - Async-first, tokio compatible
//! - Azure gateway detection from the base URL or an explicit API version
//! - DeepSeek-R1 message layout and o3-mini parameter handling
//! - Streaming via Server-Sent Events, normalised into text, reasoning and
//!   usage events
//! - Model listing with a cached default model
//!
//! ## Architecture
//!
//! 1. **Providers** act as factories to create Clients.
//! 2. **Clients** own the HTTP client, the endpoint and the model cache.
//!
//! Retries are deliberately left to the caller, wrapped around
//! [`Client::request_stream`].
//!
//! ## Example
//! ```no_run
//! use futures::StreamExt;
//! use oai_compat::client::Client;
//! use oai_compat::model::{Message, StreamChunk};
//! use oai_compat::options::ProviderOptions;
//! use oai_compat::providers::{OpenAiCompatible, Provider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OpenAiCompatible::create(
//!         ProviderOptions::new()
//!             .with_base_url("https://api.deepseek.com/v1")
//!             .with_api_key("your-api-key")
//!             .with_model_id("deepseek-reasoner"),
//!     )?;
//!
//!     let mut stream = client
//!         .request_stream("You are a helpful assistant.", vec![Message::user("Hello!")])
//!         .await?;
//!
//!     while let Some(chunk) = stream.next().await {
//!         match chunk? {
//!             StreamChunk::Text(text) => print!("{text}"),
//!             StreamChunk::Reasoning(thought) => eprint!("{thought}"),
//!             StreamChunk::Usage(usage) => println!("\n{usage:?}"),
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod http;
pub mod model;
pub mod options;
pub mod providers;
pub mod sse;

pub use client::{ChunkStream, Client, ClientError};
pub use model::{Message, ModelInfo, Part, StreamChunk, Usage};
pub use options::{ProviderOptions, ReasoningEffort, TransportOptions};
pub use providers::{OpenAiCompatible, OpenAiCompatibleClient, Provider};
