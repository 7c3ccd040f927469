//! Resolve a per-call config against client defaults

use std::sync::LazyLock;

use regex::Regex;

use crate::body::RequestBody;
use crate::config::{ClientDefaults, Credentials, RequestConfig, ResolvedConfig};
use crate::headers::Headers;

/// `scheme://` or protocol-relative `//`
static ABSOLUTE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([a-z][a-z\d+\-.]*:)?//").expect("absolute URL pattern is valid")
});

const CONTENT_TYPE: &str = "content-type";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Whether `url` is absolute and must not be joined with a base URL
pub fn is_absolute_url(url: &str) -> bool {
    ABSOLUTE_URL.is_match(url)
}

/// Join a base URL and a relative path with exactly one `/` between them
pub fn combine_urls(base_url: &str, relative: &str) -> String {
    if relative.is_empty() {
        return base_url.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        relative.trim_start_matches('/')
    )
}

/// Resolve the request URL against an optional base URL
///
/// Absolute paths are returned unchanged regardless of the base.
pub fn build_full_path(base_url: Option<&str>, requested: &str) -> String {
    match base_url {
        Some(base) if !is_absolute_url(requested) => combine_urls(base, requested),
        _ => requested.to_string(),
    }
}

/// Append url-encoded query parameters, dropping any fragment
fn append_params(mut url: String, params: &[(String, String)]) -> String {
    if params.is_empty() {
        return url;
    }
    let query = match serde_urlencoded::to_string(params) {
        Ok(query) => query,
        Err(err) => {
            tracing::warn!("Could not encode query parameters: {}", err);
            return url;
        }
    };
    if let Some(idx) = url.find('#') {
        url.truncate(idx);
    }
    let separator = if url.contains('?') { '&' } else { '?' };
    url.push(separator);
    url.push_str(&query);
    url
}

/// Encode a structured body as JSON text, adding a JSON content type if none is set
///
/// Raw bodies (text, bytes, form) and their headers are left untouched.
pub fn transform_request_body(body: RequestBody, headers: &mut Headers) -> RequestBody {
    match body {
        RequestBody::Json(value) => {
            if !headers.contains(CONTENT_TYPE) {
                headers.insert(CONTENT_TYPE, JSON_CONTENT_TYPE);
            }
            RequestBody::Text(value.to_string())
        }
        raw => raw,
    }
}

/// Resolve the credentials policy
///
/// A `with_credentials` flag forces [`Credentials::Include`]; otherwise the
/// explicit policy applies, then the fetch default.
pub fn resolve_credentials(
    with_credentials: Option<bool>,
    credentials: Option<Credentials>,
) -> Credentials {
    if with_credentials == Some(true) {
        Credentials::Include
    } else {
        credentials.unwrap_or_default()
    }
}

/// Merge client defaults with a per-call config
pub fn merge(defaults: &ClientDefaults, config: RequestConfig) -> ResolvedConfig {
    let RequestConfig {
        url,
        method,
        base_url,
        headers: call_headers,
        body,
        params: call_params,
        timeout,
        with_credentials,
        credentials,
        cancellation,
        passthrough: call_passthrough,
    } = config;

    let mut headers = defaults.headers.clone();
    headers.merge(call_headers);

    let body = body.map(|body| transform_request_body(body, &mut headers));

    let method = method.or(defaults.method).unwrap_or_default();

    let base_url = base_url.as_deref().or(defaults.base_url.as_deref());
    let params: Vec<(String, String)> = defaults
        .params
        .iter()
        .cloned()
        .chain(call_params)
        .collect();
    let url = append_params(build_full_path(base_url, &url), &params);

    let credentials = resolve_credentials(
        with_credentials.or(defaults.with_credentials),
        credentials.or(defaults.credentials),
    );

    let mut passthrough = defaults.passthrough.clone();
    passthrough.extend(call_passthrough);

    ResolvedConfig {
        url,
        method,
        headers,
        body,
        timeout: timeout.or(defaults.timeout),
        cancellation,
        credentials,
        passthrough,
    }
}
