use anyhow::{bail, Result};

pub mod request;
pub mod show_defaults;

/// Split a `Name: value` header argument
pub fn parse_header(raw: &str) -> Result<(&str, &str)> {
    match raw.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value.trim())),
        _ => bail!("Header must look like `Name: value`, got `{}`", raw),
    }
}
