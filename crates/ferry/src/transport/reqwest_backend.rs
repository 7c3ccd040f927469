//! reqwest-based transport

use futures::future::BoxFuture;
use serde_json::Value;

use super::{ResponseBody, Transport, TransportError, TransportRequest, TransportResponse};
use crate::body::RequestBody;
use crate::config::Credentials;
use crate::headers::Headers;

/// Cache modes that ask intermediaries to revalidate
const REVALIDATE_CACHE_MODES: [&str; 3] = ["no-store", "no-cache", "reload"];

/// Headers dropped when credentials are omitted
const CREDENTIAL_HEADERS: [&str; 2] = ["cookie", "authorization"];

/// reqwest-based transport
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with a default reqwest client
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport from a configured reqwest::Client
    pub fn from_reqwest(client: reqwest::Client) -> Self {
        Self { inner: client }
    }

    fn build(&self, request: &TransportRequest) -> Result<reqwest::RequestBuilder, TransportError> {
        let url = reqwest::Url::parse(&request.url)
            .map_err(|e| TransportError::InvalidUrl(format!("{}: {}", request.url, e)))?;

        let mut builder = self.inner.request(request.method.into(), url);

        for (name, value) in request.headers.iter() {
            if request.credentials == Credentials::Omit && CREDENTIAL_HEADERS.contains(&name) {
                tracing::trace!("Dropping {} header, credentials are omitted", name);
                continue;
            }
            builder = builder.header(name, value);
        }

        if let Some(Value::String(mode)) = request.passthrough.get("cache") {
            if REVALIDATE_CACHE_MODES.contains(&mode.as_str())
                && !request.headers.contains("cache-control")
            {
                builder = builder.header("cache-control", "no-cache");
            }
        }

        let builder = match &request.body {
            None => builder,
            Some(RequestBody::Text(text)) => builder.body(text.clone()),
            Some(RequestBody::Bytes(bytes)) => builder.body(bytes.clone()),
            Some(RequestBody::Json(value)) => {
                with_default_content_type(builder, &request.headers, "application/json")
                    .body(value.to_string())
            }
            Some(RequestBody::Form(fields)) => {
                let encoded = serde_urlencoded::to_string(fields)
                    .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
                with_default_content_type(
                    builder,
                    &request.headers,
                    "application/x-www-form-urlencoded",
                )
                .body(encoded)
            }
        };

        Ok(builder)
    }
}

fn with_default_content_type(
    builder: reqwest::RequestBuilder,
    headers: &Headers,
    content_type: &str,
) -> reqwest::RequestBuilder {
    if headers.contains("content-type") {
        builder
    } else {
        builder.header("content-type", content_type)
    }
}

/// Collect response headers, joining repeated names with `, `
fn collect_headers(map: &reqwest::header::HeaderMap) -> Headers {
    let mut headers = Headers::new();
    for (name, value) in map {
        let Ok(value) = value.to_str() else {
            tracing::debug!("Skipping non-text header {}", name);
            continue;
        };
        let joined = match headers.get(name.as_str()) {
            Some(existing) => format!("{}, {}", existing, value),
            None => value.to_string(),
        };
        headers.insert(name.as_str(), joined);
    }
    headers
}

struct ReqwestBody(reqwest::Response);

impl ResponseBody for ReqwestBody {
    fn bytes(self: Box<Self>) -> BoxFuture<'static, Result<Vec<u8>, TransportError>> {
        Box::pin(async move {
            self.0
                .bytes()
                .await
                .map(|b| b.to_vec())
                .map_err(TransportError::from)
        })
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let builder = self.build(&request)?;

        let response = tokio::select! {
            biased;
            _ = request.cancellation.cancelled() => return Err(TransportError::Cancelled),
            response = builder.send() => response.map_err(TransportError::from)?,
        };

        Ok(TransportResponse {
            status: response.status().as_u16(),
            headers: collect_headers(response.headers()),
            body: Box::new(ReqwestBody(response)),
        })
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::TimedOut
        } else if err.is_builder() {
            TransportError::InvalidRequest(err.to_string())
        } else if err.is_connect() {
            TransportError::Connection(err.to_string())
        } else {
            TransportError::Other(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::method::Method;

    fn request(url: &str) -> TransportRequest {
        TransportRequest {
            url: url.to_string(),
            method: Method::Get,
            headers: Headers::new(),
            body: None,
            credentials: Credentials::default(),
            passthrough: Default::default(),
            cancellation: CancellationToken::new(),
        }
    }

    #[test]
    fn test_transport_new() {
        let transport = ReqwestTransport::new();
        let _ = format!("{:?}", transport);
    }

    #[test]
    fn test_from_reqwest() {
        let transport = ReqwestTransport::from_reqwest(reqwest::Client::new());
        let _ = format!("{:?}", transport);
    }

    #[test]
    fn test_relative_url_is_rejected() {
        let result = ReqwestTransport::new().build(&request("/no-base"));
        assert!(matches!(result, Err(TransportError::InvalidUrl(_))));
    }

    #[test]
    fn test_omit_credentials_drops_auth_headers() {
        let mut req = request("https://api.test/");
        req.headers.insert("Authorization", "Bearer t");
        req.headers.insert("Cookie", "a=b");
        req.headers.insert("X-Keep", "1");
        req.credentials = Credentials::Omit;

        let built = ReqwestTransport::new()
            .build(&req)
            .expect("valid request")
            .build()
            .expect("buildable");
        assert!(built.headers().get("authorization").is_none());
        assert!(built.headers().get("cookie").is_none());
        assert_eq!(
            built.headers().get("x-keep").map(|v| v.as_bytes()),
            Some(&b"1"[..])
        );
    }

    #[test]
    fn test_cache_passthrough_sets_cache_control() {
        let mut req = request("https://api.test/");
        req.passthrough.insert("cache".to_string(), "no-store".into());

        let built = ReqwestTransport::new()
            .build(&req)
            .expect("valid request")
            .build()
            .expect("buildable");
        assert_eq!(
            built.headers().get("cache-control").map(|v| v.as_bytes()),
            Some(&b"no-cache"[..])
        );
    }

    #[test]
    fn test_form_body_gets_content_type() {
        let mut req = request("https://api.test/");
        req.method = Method::Post;
        req.body = Some(RequestBody::form([("q", "a b")]));

        let built = ReqwestTransport::new()
            .build(&req)
            .expect("valid request")
            .build()
            .expect("buildable");
        assert_eq!(
            built.headers().get("content-type").map(|v| v.as_bytes()),
            Some(&b"application/x-www-form-urlencoded"[..])
        );
        assert_eq!(
            built.body().and_then(|b| b.as_bytes()),
            Some(&b"q=a+b"[..])
        );
    }

    #[test]
    fn test_collect_headers_joins_repeats() {
        let mut map = reqwest::header::HeaderMap::new();
        map.append("set-cookie", "a=1".parse().expect("valid value"));
        map.append("set-cookie", "b=2".parse().expect("valid value"));
        map.insert("content-type", "text/plain".parse().expect("valid value"));

        let headers = collect_headers(&map);
        assert_eq!(headers.get("Set-Cookie"), Some("a=1, b=2"));
        assert_eq!(headers.get("content-type"), Some("text/plain"));
    }

    #[tokio::test]
    async fn test_cancelled_token_aborts() {
        let req = request("http://127.0.0.1:9/never");
        req.cancellation.cancel();
        let result = ReqwestTransport::new().send(req).await;
        assert!(matches!(result, Err(TransportError::Cancelled)));
    }
}
