//! HTTP client utilities shared by the chat and model-listing requests.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;

use crate::client::ClientError;
use crate::options::TransportOptions;

/// Build the HTTP client from transport options.
///
/// Extra headers become default headers of the client, so every request
/// carries them.
pub fn build_http_client(transport_options: &TransportOptions) -> Result<Client, ClientError> {
    let mut builder = Client::builder();

    match transport_options {
        TransportOptions::Http {
            timeout,
            proxy,
            headers,
        } => {
            if let Some(t) = timeout {
                builder = builder.timeout(*t);
            }
            if let Some(proxy_url) = proxy {
                match reqwest::Proxy::all(proxy_url) {
                    Ok(p) => builder = builder.proxy(p),
                    Err(e) => tracing::warn!("Ignoring invalid proxy {}: {}", proxy_url, e),
                }
            }
            if let Some(h) = headers {
                builder = builder.default_headers(header_map(h)?);
            }
        }
    }

    Ok(builder.build()?)
}

fn header_map<'a>(
    headers: impl IntoIterator<Item = (&'a String, &'a String)>,
) -> Result<HeaderMap, ClientError> {
    let mut map = HeaderMap::new();
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| ClientError::Config(format!("invalid header name {key:?}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ClientError::Config(format!("invalid value for header {key}: {e}")))?;
        map.insert(name, value);
    }
    Ok(map)
}

/// Extension trait for RequestBuilder that logs request body.
pub trait RequestBuilderExt {
    /// Set JSON request body and log it. Returns the RequestBuilder for chaining.
    fn json_logged<T: serde::Serialize + ?Sized>(self, json: &T) -> Self;
}

impl RequestBuilderExt for RequestBuilder {
    fn json_logged<T: serde::Serialize + ?Sized>(self, json: &T) -> Self {
        if let Ok(req_body) = serde_json::to_string_pretty(json) {
            tracing::debug!("API request body ({} bytes):\n{}", req_body.len(), req_body);
        }

        self.json(json)
    }
}

/// Extension trait for Response that logs response bodies and maps API errors.
#[async_trait::async_trait]
pub trait ResponseExt: Sized {
    /// Get response text and log it. Consumes the response.
    async fn text_logged(self) -> Result<String, reqwest::Error>;

    /// Parse response as JSON and log it. Consumes the response.
    async fn json_logged<T: serde::de::DeserializeOwned>(self) -> Result<T, ClientError>;

    /// Pass successful responses through, turn anything else into [`ClientError::Api`].
    async fn ok_or_api_error(self) -> Result<Self, ClientError>;
}

#[async_trait::async_trait]
impl ResponseExt for Response {
    async fn text_logged(self) -> Result<String, reqwest::Error> {
        let text = self.text().await?;
        tracing::debug!("API response ({} bytes):\n{}", text.len(), text);
        Ok(text)
    }

    async fn json_logged<T: serde::de::DeserializeOwned>(self) -> Result<T, ClientError> {
        let bytes = self.bytes().await?;

        if let Ok(text) = std::str::from_utf8(&bytes) {
            tracing::debug!("API response ({} bytes):\n{}", text.len(), text);
        }

        serde_json::from_slice(&bytes).map_err(ClientError::from)
    }

    async fn ok_or_api_error(self) -> Result<Self, ClientError> {
        let status = self.status();
        if status.is_success() {
            return Ok(self);
        }

        let body = self.text_logged().await.unwrap_or_default();
        Err(api_error(status, &body))
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

/// Build an error from a non-success status and its body.
///
/// Bodies in the OpenAI error envelope (`{"error": {"message", "type"}}`) are
/// unwrapped; anything else is kept verbatim.
pub fn api_error(status: StatusCode, body: &str) -> ClientError {
    let message = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope {
            error:
                ErrorBody {
                    message,
                    error_type: Some(error_type),
                },
        }) => format!("{error_type}: {message}"),
        Ok(envelope) => envelope.error.message,
        Err(_) => body.to_string(),
    };

    ClientError::Api { status, message }
}
