//! Deployment variants of an OpenAI-compatible endpoint.
//!
//! The variant is picked once per client and decides how URLs are built and
//! how the API key is presented.

use reqwest::header::AUTHORIZATION;
use reqwest::{Client as HttpClient, RequestBuilder};

use crate::options::ProviderOptions;

/// Base URL used when none is configured.
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Azure API version used when gateway mode is inferred from the URL alone.
pub const AZURE_DEFAULT_API_VERSION: &str = "2024-08-01-preview";

const AZURE_HOST_MARKER: &str = "azure.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deployment {
    /// Plain OpenAI-compatible API, bearer authentication.
    Standard,
    /// Azure OpenAI gateway: versioned URLs, `api-key` header.
    AzureGateway { api_version: String },
}

impl Deployment {
    /// Pick the deployment for the given configuration.
    ///
    /// An explicit API version always selects the Azure gateway; otherwise a
    /// base URL on an Azure host does, with [`AZURE_DEFAULT_API_VERSION`].
    pub fn detect(options: &ProviderOptions) -> Self {
        if let Some(api_version) = options.api_version.as_deref().filter(|v| !v.is_empty()) {
            return Deployment::AzureGateway {
                api_version: api_version.to_string(),
            };
        }

        let on_azure_host = options
            .base_url
            .as_deref()
            .is_some_and(|url| url.to_ascii_lowercase().contains(AZURE_HOST_MARKER));

        if on_azure_host {
            Deployment::AzureGateway {
                api_version: AZURE_DEFAULT_API_VERSION.to_string(),
            }
        } else {
            Deployment::Standard
        }
    }

    pub fn is_azure(&self) -> bool {
        matches!(self, Deployment::AzureGateway { .. })
    }
}

/// Where and how requests are sent: base URL, credential and deployment.
#[derive(Debug, Clone)]
pub struct Endpoint {
    base_url: String,
    api_key: String,
    deployment: Deployment,
}

impl Endpoint {
    pub fn new(options: &ProviderOptions) -> Self {
        let base_url = options
            .base_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(OPENAI_API_BASE)
            .trim_end_matches('/')
            .to_string();

        Self {
            base_url,
            api_key: options.api_key.clone().unwrap_or_default(),
            deployment: Deployment::detect(options),
        }
    }

    pub fn deployment(&self) -> &Deployment {
        &self.deployment
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an API path such as `/chat/completions`.
    pub fn url(&self, path: &str) -> String {
        match &self.deployment {
            Deployment::Standard => format!("{}{}", self.base_url, path),
            Deployment::AzureGateway { api_version } => {
                format!("{}{}?api-version={}", self.base_url, path, api_version)
            }
        }
    }

    /// `POST /chat/completions` with credentials attached.
    pub fn chat_completions(&self, http: &HttpClient) -> RequestBuilder {
        self.authorize(http.post(self.url("/chat/completions")))
    }

    /// `GET /models` with credentials attached.
    pub fn models(&self, http: &HttpClient) -> RequestBuilder {
        self.authorize(http.get(self.url("/models")))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.deployment {
            Deployment::Standard => {
                request.header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            }
            Deployment::AzureGateway { .. } => request.header("api-key", &self.api_key),
        }
    }
}
