//! OpenAI-compatible chat client.
//!
//! One client talks to one endpoint, standard or Azure gateway, and smooths
//! over the request quirks of the model families commonly served behind such
//! endpoints:
//!
//! - `deepseek-reasoner` (and any model flagged `r1_format_required`) gets the
//!   R1 layout, with the system instruction folded into the first user turn.
//! - `o3-mini` gets a `developer` role instead of `system`, no temperature and
//!   a `reasoning_effort`. This adjustment is applied last and wins over the
//!   R1 layout when both match.
//!
//! When no model id is configured the first model listed by the endpoint is
//! used. The listing is fetched in the background right after construction
//! and again on demand while the cache is still empty.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::runtime::Handle;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::api::openai::{
    chat_events, convert_to_openai_messages, ChatMessage, ChatRequest, ChatRole, ModelsResponse,
};
use crate::api::r1::convert_to_r1_format;
use crate::client::{ChunkStream, Client, ClientError};
use crate::http::{build_http_client, RequestBuilderExt, ResponseExt};
use crate::model::{Message, ModelInfo, DEFAULT_TEMPERATURE};
use crate::options::ProviderOptions;
use crate::providers::deployment::{Deployment, Endpoint};
use crate::sse::SSEResponseExt;

/// Client for any endpoint speaking the OpenAI Chat Completions API.
#[derive(Debug)]
pub struct OpenAiCompatibleClient {
    options: ProviderOptions,
    endpoint: Arc<Endpoint>,
    http: reqwest::Client,
    models: Arc<Mutex<Vec<String>>>,
    // Serialises listing refreshes; never held together with `models` across I/O.
    refresh: Arc<Mutex<()>>,
    priming: Option<JoinHandle<()>>,
}

impl OpenAiCompatibleClient {
    /// Create a client and start priming the model cache.
    ///
    /// Priming needs a Tokio runtime; outside of one it is skipped and the
    /// cache fills on first use instead.
    pub fn new(options: ProviderOptions) -> Result<Self, ClientError> {
        let http = build_http_client(&options.transport)?;
        let endpoint = Arc::new(Endpoint::new(&options));
        debug!(
            "Using {:?} deployment at {}",
            endpoint.deployment(),
            endpoint.base_url()
        );

        let mut client = Self {
            options,
            endpoint,
            http,
            models: Arc::new(Mutex::new(Vec::new())),
            refresh: Arc::new(Mutex::new(())),
            priming: None,
        };
        client.priming = client.spawn_priming();
        Ok(client)
    }

    fn spawn_priming(&self) -> Option<JoinHandle<()>> {
        let Ok(runtime) = Handle::try_current() else {
            debug!("No Tokio runtime, model cache will be filled on first use");
            return None;
        };

        let http = self.http.clone();
        let endpoint = Arc::clone(&self.endpoint);
        let models = Arc::clone(&self.models);
        let refresh = Arc::clone(&self.refresh);

        Some(runtime.spawn(async move {
            let _refresh = refresh.lock().await;
            match fetch_models(&http, &endpoint).await {
                Ok(ids) => store_models(&mut *models.lock().await, ids),
                Err(e) => warn!("Failed to prime model cache: {}", e),
            }
        }))
    }

    pub fn deployment(&self) -> &Deployment {
        self.endpoint.deployment()
    }

    pub fn options(&self) -> &ProviderOptions {
        &self.options
    }

    /// Snapshot of the cached model ids. Never touches the network and never
    /// waits for an in-flight listing.
    pub async fn cached_models(&self) -> Vec<String> {
        self.models.lock().await.clone()
    }

    async fn first_cached(&self) -> Option<String> {
        self.models.lock().await.first().cloned()
    }

    /// List the endpoint's models, reporting failures to the caller.
    ///
    /// [`Client::list_models`] is the lenient form.
    pub async fn try_list_models(&self) -> Result<Vec<String>, ClientError> {
        fetch_models(&self.http, &self.endpoint).await
    }

    /// Model id for the next request: the configured one, or the first cached.
    async fn resolve_model_id(&self) -> Result<String, ClientError> {
        if let Some(id) = self.options.explicit_model_id() {
            return Ok(id.to_string());
        }

        if let Some(id) = self.first_cached().await {
            return Ok(id);
        }

        // Another refresh (or the priming task) may fill the cache meanwhile.
        let _refresh = self.refresh.lock().await;
        if let Some(id) = self.first_cached().await {
            return Ok(id);
        }

        match self.try_list_models().await {
            Ok(ids) => store_models(&mut *self.models.lock().await, ids),
            Err(e) => warn!("Failed to refresh model cache: {}", e),
        }

        self.first_cached()
            .await
            .ok_or(ClientError::NoModelsAvailable)
    }

    /// Shape the chat request for `model_id`.
    pub fn build_request(&self, model_id: &str, system: &str, messages: &[Message]) -> ChatRequest {
        let info = self.options.model_info.clone().unwrap_or_default();
        let family = ModelFamily::detect(model_id, &info);

        let mut chat_messages = with_system(ChatRole::System, system, messages, info.supports_images);
        let mut temperature = Some(info.temperature.unwrap_or(DEFAULT_TEMPERATURE));
        let mut reasoning_effort = None;

        if family.r1_layout {
            let mut folded = Vec::with_capacity(messages.len() + 1);
            folded.push(Message::user(system));
            folded.extend_from_slice(messages);
            chat_messages = convert_to_r1_format(&folded, info.supports_images);
        }

        if family.o3_mini {
            let effort = self.options.reasoning_effort.unwrap_or_default();
            debug!("{} takes no temperature, using reasoning effort {}", model_id, effort);
            chat_messages = with_system(ChatRole::Developer, system, messages, info.supports_images);
            temperature = None;
            reasoning_effort = Some(effort);
        }

        ChatRequest {
            model: model_id.to_string(),
            messages: chat_messages,
            temperature,
            max_tokens: info.output_limit(),
            reasoning_effort,
            stream: None,
            stream_options: None,
        }
    }
}

impl Drop for OpenAiCompatibleClient {
    fn drop(&mut self) {
        if let Some(priming) = self.priming.take() {
            priming.abort();
        }
    }
}

#[async_trait]
impl Client for OpenAiCompatibleClient {
    async fn request_stream(
        &self,
        system: &str,
        messages: Vec<Message>,
    ) -> Result<ChunkStream, ClientError> {
        let model_id = self.resolve_model_id().await?;
        let request_body = self.build_request(&model_id, system, &messages).streaming();

        let response = self
            .endpoint
            .chat_completions(&self.http)
            .json_logged(&request_body)
            .send()
            .await?
            .ok_or_api_error()
            .await?;

        Ok(Box::pin(chat_events(response.sse())))
    }

    async fn list_models(&self) -> Vec<String> {
        match self.try_list_models().await {
            Ok(ids) => ids,
            Err(e) => {
                warn!("Failed to list models: {}", e);
                Vec::new()
            }
        }
    }

    fn model(&self) -> (String, ModelInfo) {
        (
            self.options.model_id.clone().unwrap_or_default(),
            self.options.model_info.clone().unwrap_or_default(),
        )
    }
}

/// Request quirks triggered by a model id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ModelFamily {
    r1_layout: bool,
    o3_mini: bool,
}

impl ModelFamily {
    fn detect(model_id: &str, info: &ModelInfo) -> Self {
        let id = model_id.to_ascii_lowercase();
        Self {
            r1_layout: id.contains("deepseek-reasoner") || info.r1_format_required,
            o3_mini: id.contains("o3-mini"),
        }
    }
}

fn with_system(
    role: ChatRole,
    system: &str,
    messages: &[Message],
    supports_images: bool,
) -> Vec<ChatMessage> {
    let mut out = Vec::with_capacity(messages.len() + 1);
    out.push(ChatMessage::text(role, system));
    out.extend(convert_to_openai_messages(messages, supports_images));
    out
}

async fn fetch_models(http: &reqwest::Client, endpoint: &Endpoint) -> Result<Vec<String>, ClientError> {
    let response: ModelsResponse = endpoint
        .models(http)
        .send()
        .await?
        .ok_or_api_error()
        .await?
        .json_logged()
        .await?;
    Ok(response.into())
}

// A non-empty cache is never replaced by an empty listing.
fn store_models(cache: &mut Vec<String>, ids: Vec<String>) {
    if !ids.is_empty() {
        *cache = ids;
    }
}
