//! HTTP response types

use crate::body::Payload;
use crate::config::ResolvedConfig;
use crate::error::HttpError;
use crate::headers::Headers;
use crate::transport::ResponseBody;

/// Result of a client call - generic over the body type R and error type E
pub type Response<R, E = HttpError> = Result<R, E>;

/// Normalized response handed to response hooks
#[derive(Debug, Clone)]
pub struct ResolvedResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: Headers,
    /// Decoded body
    pub data: Payload,
    /// Config that produced this response
    pub config: ResolvedConfig,
}

impl ResolvedResponse {
    /// Create a response for `config`
    pub fn new(status: u16, headers: Headers, data: Payload, config: ResolvedConfig) -> Self {
        Self {
            status,
            headers,
            data,
            config,
        }
    }

    /// Check if the response status is a success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if the response status is a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Check if the response status is a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}

/// Statuses that never carry a body
pub(crate) fn is_bodiless(status: u16) -> bool {
    matches!(status, 204 | 205)
}

/// Whether a content type denotes JSON (`application/json` or `*+json`)
pub(crate) fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}

/// Decode a response body
///
/// Bodiless statuses are not read at all. Decode failures never surface:
/// JSON content degrades to `null`, anything else to an empty string.
pub(crate) async fn decode_body(
    status: u16,
    headers: &Headers,
    body: Box<dyn ResponseBody>,
) -> Payload {
    if is_bodiless(status) {
        return Payload::Empty;
    }

    let is_json = headers
        .get("content-type")
        .map(is_json_content_type)
        .unwrap_or(false);

    let bytes = match body.bytes().await {
        Ok(bytes) => Some(bytes),
        Err(err) => {
            tracing::warn!("Could not read response body: {}", err);
            None
        }
    };

    if is_json {
        let value = bytes
            .and_then(|bytes| match serde_json::from_slice(&bytes) {
                Ok(value) => Some(value),
                Err(err) => {
                    tracing::debug!("Response body is not valid JSON: {}", err);
                    None
                }
            })
            .unwrap_or_default();
        Payload::Json(value)
    } else {
        let text = bytes
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .unwrap_or_default();
        Payload::Text(text)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::transport::fake::FakeBody;

    fn json_headers() -> Headers {
        [("Content-Type", "application/json; charset=utf-8")]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_json_content_type_detection() {
        assert!(is_json_content_type("application/json"));
        assert!(is_json_content_type("Application/JSON; charset=utf-8"));
        assert!(is_json_content_type("application/problem+json"));
        assert!(!is_json_content_type("text/plain"));
        assert!(!is_json_content_type("application/jsonp"));
    }

    #[test]
    fn test_status_classes() {
        let config = crate::merge::merge(&Default::default(), "/".into());
        let response =
            |status| ResolvedResponse::new(status, Headers::new(), Payload::Empty, config.clone());
        assert!(response(204).is_success());
        assert!(response(404).is_client_error());
        assert!(response(503).is_server_error());
        assert!(!response(301).is_success());
    }

    #[tokio::test]
    async fn test_decode_json() {
        let (body, reads) = FakeBody::new(br#"{"id":1}"#.to_vec());
        let payload = decode_body(200, &json_headers(), Box::new(body)).await;
        assert_eq!(payload, Payload::Json(json!({"id": 1})));
        assert_eq!(reads.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_decode_text_without_content_type() {
        let (body, _) = FakeBody::new(b"hello".to_vec());
        let payload = decode_body(200, &Headers::new(), Box::new(body)).await;
        assert_eq!(payload, Payload::Text("hello".to_string()));
    }

    #[tokio::test]
    async fn test_invalid_json_falls_back_to_null() {
        let (body, _) = FakeBody::new(b"{not json".to_vec());
        let payload = decode_body(200, &json_headers(), Box::new(body)).await;
        assert_eq!(payload, Payload::Json(Value::Null));
    }

    #[tokio::test]
    async fn test_invalid_utf8_falls_back_to_empty_text() {
        let (body, _) = FakeBody::new(vec![0xff, 0xfe, 0xfd]);
        let payload = decode_body(200, &Headers::new(), Box::new(body)).await;
        assert_eq!(payload, Payload::Text(String::new()));
    }

    #[tokio::test]
    async fn test_unreadable_body_falls_back() {
        let payload = decode_body(200, &json_headers(), Box::new(FakeBody::failing())).await;
        assert_eq!(payload, Payload::Json(Value::Null));
    }

    #[tokio::test]
    async fn test_bodiless_statuses_are_not_read() {
        for status in [204, 205] {
            let (body, reads) = FakeBody::new(br#"{"ignored":true}"#.to_vec());
            let payload = decode_body(status, &json_headers(), Box::new(body)).await;
            assert_eq!(payload, Payload::Empty);
            assert_eq!(reads.load(std::sync::atomic::Ordering::SeqCst), 0);
        }
    }
}
