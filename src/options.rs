//! Provider configuration and transport options.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use crate::model::ModelInfo;

/// How much internal deliberation a reasoning model performs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    Low,
    #[default]
    Medium,
    High,
}

impl ReasoningEffort {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasoningEffort::Low => "low",
            ReasoningEffort::Medium => "medium",
            ReasoningEffort::High => "high",
        }
    }
}

impl fmt::Display for ReasoningEffort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for an OpenAI-compatible endpoint.
///
/// Every field is optional. Hosts usually deserialize this from their own
/// settings store; the `with_*` builders cover programmatic setup.
///
/// ```
/// use oai_compat::options::{ProviderOptions, ReasoningEffort};
///
/// let options = ProviderOptions::new()
///     .with_base_url("https://my-resource.openai.azure.com/openai")
///     .with_api_key("secret")
///     .with_model_id("o3-mini")
///     .with_reasoning_effort(ReasoningEffort::High);
///
/// assert_eq!(options.model_id.as_deref(), Some("o3-mini"));
/// ```
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderOptions {
    /// Endpoint base, e.g. `https://api.openai.com/v1`.
    pub base_url: Option<String>,

    /// Bearer credential. Sent as an empty string when unset.
    pub api_key: Option<String>,

    /// Azure API version. Setting it forces the Azure gateway deployment.
    pub api_version: Option<String>,

    /// Explicit model id. When unset the first listed model is used.
    pub model_id: Option<String>,

    /// Metadata for the model; [`ModelInfo::default`] when unset.
    pub model_info: Option<ModelInfo>,

    /// Reasoning effort for the o3-mini family.
    pub reasoning_effort: Option<ReasoningEffort>,

    #[serde(skip)]
    pub transport: TransportOptions,
}

impl ProviderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }

    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    pub fn with_model_info(mut self, model_info: ModelInfo) -> Self {
        self.model_info = Some(model_info);
        self
    }

    pub fn with_reasoning_effort(mut self, effort: ReasoningEffort) -> Self {
        self.reasoning_effort = Some(effort);
        self
    }

    pub fn with_transport(mut self, transport: TransportOptions) -> Self {
        self.transport = transport;
        self
    }

    /// Configured model id, treating an empty string as unset.
    pub fn explicit_model_id(&self) -> Option<&str> {
        self.model_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Transport configuration options.
///
/// Controls how requests are sent over the network.
#[derive(Debug, Clone)]
pub enum TransportOptions {
    /// HTTP transport configuration
    Http {
        /// Request timeout. If None, default client timeout is used.
        timeout: Option<Duration>,
        /// HTTP proxy URL.
        proxy: Option<String>,
        /// Additional HTTP headers to send with every request.
        headers: Option<HashMap<String, String>>,
    },
}

impl Default for TransportOptions {
    fn default() -> Self {
        TransportOptions::Http {
            timeout: None,
            proxy: None,
            headers: None,
        }
    }
}

impl TransportOptions {
    /// Create new default HTTP transport options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, duration: Duration) -> Self {
        match &mut self {
            TransportOptions::Http { timeout, .. } => *timeout = Some(duration),
        }
        self
    }

    /// Set the proxy.
    pub fn with_proxy(mut self, proxy_url: impl Into<String>) -> Self {
        match &mut self {
            TransportOptions::Http { proxy, .. } => *proxy = Some(proxy_url.into()),
        }
        self
    }

    /// Add a header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        match &mut self {
            TransportOptions::Http { headers, .. } => {
                headers
                    .get_or_insert_with(HashMap::new)
                    .insert(key.into(), value.into());
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_model_id_ignores_empty() {
        assert_eq!(ProviderOptions::new().explicit_model_id(), None);
        assert_eq!(
            ProviderOptions::new().with_model_id("").explicit_model_id(),
            None
        );
        assert_eq!(
            ProviderOptions::new()
                .with_model_id("gpt-4o")
                .explicit_model_id(),
            Some("gpt-4o")
        );
    }

    #[test]
    fn test_provider_options_deserialize() {
        let options: ProviderOptions = serde_json::from_str(
            r#"{
                "base_url": "https://example.com/v1",
                "model_id": "deepseek-reasoner",
                "reasoning_effort": "low",
                "model_info": { "max_tokens": 1000 }
            }"#,
        )
        .unwrap();

        assert_eq!(options.base_url.as_deref(), Some("https://example.com/v1"));
        assert_eq!(options.api_key, None);
        assert_eq!(options.reasoning_effort, Some(ReasoningEffort::Low));
        assert_eq!(options.model_info.unwrap().max_tokens, Some(1000));
    }

    #[test]
    fn test_reasoning_effort_default() {
        assert_eq!(ReasoningEffort::default().as_str(), "medium");
        assert_eq!(ReasoningEffort::High.to_string(), "high");
    }
}
