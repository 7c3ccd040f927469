use anyhow::{bail, Result};
use clap::Args;
use ferry::{Client, HttpError, Method, Payload, RequestBody, RequestConfig};
use serde_json::Value;

#[derive(Args)]
pub struct RequestSubCommand {
    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET")]
    method: Method,
    /// Request URL, absolute or relative to the base URL
    url: String,
    /// Request body; sent as JSON when it parses as JSON
    #[arg(short, long)]
    data: Option<String>,
    /// Query parameter as `key=value`, may be repeated
    #[arg(short, long = "param")]
    params: Vec<String>,
    /// Per-request header as `Name: value`, may be repeated
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,
}

pub async fn request(client: &Client, sub_command_args: &RequestSubCommand) -> Result<()> {
    let mut config =
        RequestConfig::new(sub_command_args.url.as_str()).method(sub_command_args.method);

    for header in &sub_command_args.headers {
        let (name, value) = super::parse_header(header)?;
        config = config.header(name, value);
    }

    for param in &sub_command_args.params {
        let Some((key, value)) = param.split_once('=') else {
            bail!("Parameter must look like `key=value`, got `{}`", param);
        };
        config = config.param(key, value);
    }

    if let Some(data) = &sub_command_args.data {
        config = config.body(parse_body(data));
    }

    match client.request(config).await {
        Ok(payload) => print_payload(&payload),
        Err(HttpError::Status { status, response }) => {
            print_payload(&response.data)?;
            bail!("Request failed with status code {}", status)
        }
        Err(err) => Err(err.into()),
    }
}

fn parse_body(data: &str) -> RequestBody {
    match serde_json::from_str::<Value>(data) {
        Ok(value) => RequestBody::Json(value),
        Err(_) => RequestBody::Text(data.to_string()),
    }
}

fn print_payload(payload: &Payload) -> Result<()> {
    match payload {
        Payload::Empty => {}
        Payload::Text(text) => println!("{}", text),
        Payload::Json(value) => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}
