use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

pub const REQUEST_FAILED: &str = "Request failed";
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HttpMethod {
    GET,
    POST,
}

pub struct Endpoint {
    pub method: HttpMethod,
    pub path: String,
}

impl Endpoint {
    pub fn new(method: HttpMethod, path: &str) -> Endpoint {
        Endpoint {
            method,
            path: path.to_string(),
        }
    }

    pub fn to_url(&self, base_url: &str) -> String {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend answered with a non-2xx status.
    #[error("request failed with status code {status}")]
    Status {
        status: u16,
        status_text: Option<String>,
        body: Option<Value>,
    },
    /// No response was received.
    #[error("{0}")]
    Transport(String),
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("{0}")]
    Validation(String),
}

/// Turns any client failure into the single line shown to the user.
pub fn api_error_message(error: &ClientError) -> String {
    match error {
        ClientError::Status {
            status,
            status_text,
            body,
        } => body
            .as_ref()
            .and_then(|body| body.get("message"))
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty())
            .map(str::to_string)
            .or_else(|| status_text.clone().filter(|text| !text.is_empty()))
            .unwrap_or_else(|| format!("Request failed with status code {}", status)),
        ClientError::Transport(message) if !message.is_empty() => message.clone(),
        ClientError::Transport(_) => REQUEST_FAILED.to_string(),
        ClientError::Decode(_) | ClientError::Validation(_) => UNEXPECTED_ERROR.to_string(),
    }
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ClientError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.execute(Endpoint::new(HttpMethod::GET, path), None::<&Value>)
            .await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(Endpoint::new(HttpMethod::POST, path), Some(body))
            .await
    }

    async fn execute<B, T>(&self, endpoint: Endpoint, body: Option<&B>) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.build_reqwest(&endpoint, body)?;
        let response = match req.send().await {
            Ok(response) => response,
            Err(error) => {
                warn!("http request failed: {}", error);
                // shown on the page, so no backend address
                return Err(ClientError::Transport(error.without_url().to_string()));
            }
        };
        let status_code = response.status();
        info!("http request executed, status_code: {}", status_code);
        if status_code.is_success() {
            let text = response
                .text()
                .await
                .map_err(|err| ClientError::Transport(err.without_url().to_string()))?;
            serde_json::from_str(&text).map_err(|err| ClientError::Decode(err.to_string()))
        } else {
            let text = response.text().await.unwrap_or_default();
            warn!("http request failed: {}", text);
            Err(ClientError::Status {
                status: status_code.as_u16(),
                status_text: status_code.canonical_reason().map(str::to_string),
                body: parse_error_body(&text),
            })
        }
    }

    fn build_reqwest<B>(&self, endpoint: &Endpoint, body: Option<&B>) -> Result<RequestBuilder, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let url_string = endpoint.to_url(&self.base_url);
        info!("method: {:?}, url: {}", endpoint.method, url_string);
        let url = Url::parse(&url_string).map_err(|err| {
            warn!("invalid backend url {}: {}", url_string, err);
            ClientError::Transport(format!("invalid backend url: {}", err))
        })?;
        let library_method = match endpoint.method {
            HttpMethod::GET => Method::GET,
            HttpMethod::POST => Method::POST,
        };
        let mut req = self.client.request(library_method, url);
        if let Some(body) = body {
            req = req.json(body);
        }
        Ok(req)
    }
}

fn parse_error_body(text: &str) -> Option<Value> {
    if text.is_empty() {
        None
    } else {
        Some(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())))
    }
}
