//! HTTP methods

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Method parsing error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported HTTP method: {0}")]
pub struct UnknownMethod(pub String);

/// HTTP method
///
/// The fixed set of methods the client can issue. Parsing is case-insensitive,
/// display is always uppercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    /// GET
    #[default]
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
    /// HEAD
    Head,
    /// OPTIONS
    Options,
}

impl Method {
    /// All supported methods
    pub const ALL: [Method; 7] = [
        Method::Get,
        Method::Post,
        Method::Put,
        Method::Patch,
        Method::Delete,
        Method::Head,
        Method::Options,
    ];

    /// Uppercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownMethod(s.to_string()))
    }
}

impl Serialize for Method {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Method {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Method::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
            Method::Head => reqwest::Method::HEAD,
            Method::Options => reqwest::Method::OPTIONS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Method::from_str("get"), Ok(Method::Get));
        assert_eq!(Method::from_str("Patch"), Ok(Method::Patch));
        assert_eq!(Method::from_str(" options "), Ok(Method::Options));
    }

    #[test]
    fn test_parse_unknown_method() {
        let err = Method::from_str("TRACE").expect_err("TRACE is not supported");
        assert_eq!(err.to_string(), "Unsupported HTTP method: TRACE");
    }

    #[test]
    fn test_display_is_uppercase() {
        for method in Method::ALL {
            let shown = method.to_string();
            assert_eq!(shown, shown.to_uppercase());
            assert_eq!(Method::from_str(&shown.to_lowercase()), Ok(method));
        }
    }

    #[test]
    fn test_default_is_get() {
        assert_eq!(Method::default(), Method::Get);
    }

    #[test]
    fn test_serde_accepts_lowercase() {
        let method: Method = serde_json::from_str("\"delete\"").expect("valid method");
        assert_eq!(method, Method::Delete);
        assert_eq!(
            serde_json::to_string(&method).expect("serializable"),
            "\"DELETE\""
        );
    }
}
