//! Server-Sent Events (SSE) decoding for streamed completions.
//!
//! SSE format:
//! ```text
//! data: {"key": "value"}
//!
//! data: {"another": "event"}
//!
//! data: [DONE]
//! ```
//!
//! Only `data` fields matter for chat completions; comments (`: keep-alive`)
//! and `event:`/`id:` fields are skipped.

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};

use crate::client::ClientError;

/// Extension trait for `reqwest::Response` to enable SSE streaming.
///
/// # Example
/// ```ignore
/// use oai_compat::sse::SSEResponseExt;
/// use futures::StreamExt;
///
/// let response = client.post(url).json(&body).send().await?;
///
/// let mut stream = response.sse();
/// while let Some(result) = stream.next().await {
///     let data = result?;
///     println!("SSE data: {}", data);
/// }
/// ```
pub trait SSEResponseExt {
    /// Convert the response into a stream of SSE `data` payloads.
    ///
    /// Stops when the `[DONE]` marker is encountered or the body ends.
    fn sse(self) -> impl Stream<Item = Result<String, ClientError>> + Send;
}

impl SSEResponseExt for reqwest::Response {
    fn sse(self) -> impl Stream<Item = Result<String, ClientError>> + Send {
        sse_data(self.bytes_stream())
    }
}

/// Decode SSE `data` payloads from a raw byte stream.
///
/// Chunk boundaries may fall anywhere, including inside a line or a multi-byte
/// UTF-8 sequence; bytes are buffered until a full line is available.
pub fn sse_data<S, E>(byte_stream: S) -> impl Stream<Item = Result<String, ClientError>> + Send
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Into<ClientError> + Send + 'static,
{
    stream::unfold(
        (Box::pin(byte_stream), Vec::<u8>::new(), false),
        |(mut byte_stream, mut buffer, mut ended)| async move {
            loop {
                while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
                    let line: Vec<u8> = buffer.drain(..=pos).collect();
                    match decode_line(&line) {
                        Some(data) if is_done_marker(&data) => return None,
                        Some(data) => return Some((Ok(data), (byte_stream, buffer, ended))),
                        None => continue,
                    }
                }

                if ended {
                    // Trailing line without a newline.
                    let line = std::mem::take(&mut buffer);
                    return decode_line(&line)
                        .filter(|data| !is_done_marker(data))
                        .map(|data| (Ok(data), (byte_stream, buffer, ended)));
                }

                match byte_stream.next().await {
                    Some(Ok(chunk)) => buffer.extend_from_slice(&chunk),
                    Some(Err(e)) => {
                        // A failed body cannot be resumed.
                        buffer.clear();
                        ended = true;
                        return Some((Err(e.into()), (byte_stream, buffer, ended)));
                    }
                    None => ended = true,
                }
            }
        },
    )
}

fn decode_line(line: &[u8]) -> Option<String> {
    let line = String::from_utf8_lossy(line);
    parse_sse_line(line.trim()).map(str::to_string)
}

/// Parse an SSE line to extract the data portion.
///
/// # Example
/// ```
/// use oai_compat::sse::parse_sse_line;
///
/// assert_eq!(parse_sse_line("data: {\"key\": \"value\"}"), Some("{\"key\": \"value\"}"));
/// assert_eq!(parse_sse_line("data:[DONE]"), Some("[DONE]"));
/// assert_eq!(parse_sse_line(": keep-alive"), None);
/// ```
pub fn parse_sse_line(line: &str) -> Option<&str> {
    line.strip_prefix("data:")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
}

/// Check if an SSE data line indicates the stream is done.
///
/// # Example
/// ```
/// use oai_compat::sse::is_done_marker;
///
/// assert!(is_done_marker("[DONE]"));
/// assert!(!is_done_marker("{\"data\": \"value\"}"));
/// ```
pub fn is_done_marker(data: &str) -> bool {
    data == "[DONE]"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(parts: &[&'static [u8]]) -> impl Stream<Item = Result<Bytes, ClientError>> + Send {
        stream::iter(
            parts
                .iter()
                .map(|p| Ok(Bytes::from_static(*p)))
                .collect::<Vec<_>>(),
        )
    }

    async fn collect(parts: &[&'static [u8]]) -> Vec<String> {
        sse_data(chunks(parts))
            .map(|r| r.unwrap())
            .collect()
            .await
    }

    #[test]
    fn test_parse_sse_line() {
        assert_eq!(parse_sse_line("data: hello"), Some("hello"));
        assert_eq!(parse_sse_line("data:hello"), Some("hello"));
        assert_eq!(parse_sse_line("data:   spaces  "), Some("spaces"));
        assert_eq!(parse_sse_line("data:"), None);
        assert_eq!(parse_sse_line("event: message"), None);
        assert_eq!(parse_sse_line(""), None);
    }

    #[test]
    fn test_is_done_marker() {
        assert!(is_done_marker("[DONE]"));
        assert!(!is_done_marker(""));
        assert!(!is_done_marker("data"));
    }

    #[tokio::test]
    async fn test_lines_split_across_chunks() {
        let events = collect(&[b"data: {\"a\"", b":1}\n\ndata: {\"b\":2}\n", b"\n"]).await;
        assert_eq!(events, vec!["{\"a\":1}", "{\"b\":2}"]);
    }

    #[tokio::test]
    async fn test_utf8_split_across_chunks() {
        // "é" is 0xC3 0xA9
        let events = collect(&[b"data: caf\xC3", b"\xA9\n\n"]).await;
        assert_eq!(events, vec!["café"]);
    }

    #[tokio::test]
    async fn test_stops_at_done_marker() {
        let events = collect(&[b"data: one\n\ndata: [DONE]\n\ndata: two\n\n"]).await;
        assert_eq!(events, vec!["one"]);
    }

    #[tokio::test]
    async fn test_skips_comments_and_keeps_trailing_line() {
        let events = collect(&[b": keep-alive\r\n\r\nevent: chunk\r\ndata: one\r\n\r\ndata: two"]).await;
        assert_eq!(events, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_error_ends_stream() {
        let source = stream::iter(vec![
            Ok(Bytes::from_static(b"data: one\n")),
            Err(ClientError::Config("boom".to_string())),
            Ok(Bytes::from_static(b"data: two\n")),
        ]);
        let results: Vec<_> = sse_data(source).collect().await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap(), "one");
        assert!(matches!(results[1], Err(ClientError::Config(_))));
    }
}
