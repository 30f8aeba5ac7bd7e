//! Provider implementations.

use crate::client::{Client, ClientError};
use crate::options::ProviderOptions;

/// Trait for providers that can create configured clients.
pub trait Provider {
    /// The client type produced by this provider.
    type Client: Client;

    /// Create a new client from provider options.
    fn create(options: ProviderOptions) -> Result<Self::Client, ClientError>;
}

pub mod deployment;
pub mod openai;

pub use deployment::{Deployment, Endpoint, AZURE_DEFAULT_API_VERSION, OPENAI_API_BASE};
pub use openai::OpenAiCompatibleClient;

/// Any endpoint speaking the OpenAI Chat Completions API, Azure included.
pub struct OpenAiCompatible;

impl Provider for OpenAiCompatible {
    type Client = OpenAiCompatibleClient;

    fn create(options: ProviderOptions) -> Result<Self::Client, ClientError> {
        OpenAiCompatibleClient::new(options)
    }
}
