//! Request and response bodies

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Request body
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Structured value, encoded as JSON when the request is resolved
    Json(Value),
    /// Raw text, sent as-is
    Text(String),
    /// Raw bytes, sent as-is
    Bytes(Vec<u8>),
    /// Url-encoded form fields
    Form(Vec<(String, String)>),
}

impl RequestBody {
    /// Serialize any value into a structured JSON body
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(RequestBody::Json)
    }

    /// Build a form body from key/value pairs
    pub fn form<K, V, I>(fields: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        RequestBody::Form(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Whether this body is a structured value rather than a raw payload
    pub fn is_structured(&self) -> bool {
        matches!(self, RequestBody::Json(_))
    }
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        RequestBody::Json(value)
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        RequestBody::Text(text)
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        RequestBody::Text(text.to_string())
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(bytes: Vec<u8>) -> Self {
        RequestBody::Bytes(bytes)
    }
}

/// Decoded response body
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Payload {
    /// No body (bodiless status or nothing decoded)
    #[default]
    Empty,
    /// Body decoded as JSON
    Json(Value),
    /// Body decoded as text
    Text(String),
}

impl Payload {
    /// Deserialize the payload into `T`
    ///
    /// Text payloads are parsed as JSON; an empty payload deserializes from `null`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        match self {
            Payload::Empty => serde_json::from_value(Value::Null),
            Payload::Json(value) => T::deserialize(value),
            Payload::Text(text) => serde_json::from_str(text),
        }
    }

    /// The text payload, if this is one
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The JSON payload, if this is one
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Whether there is no body
    pub fn is_empty(&self) -> bool {
        matches!(self, Payload::Empty)
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Json(value)
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}
