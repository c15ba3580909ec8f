//! Outbound HTTP plumbing shared by the platform clients.
//!
//! Every platform call is described as an [`HttpRequest`] and executed by a
//! [`Transport`]. Production code uses [`ReqwestTransport`]; unit tests swap in a
//! recording fake so the multi-step workflows can be checked without a network.

use crate::error::ToolError;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    Json(Value),
    Bytes(Vec<u8>),
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Body,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: Body::Empty,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::Put, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::Delete, url)
    }

    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn header(mut self, key: &str, value: impl Into<String>) -> Self {
        self.headers.push((key.to_string(), value.into()));
        self
    }

    pub fn bearer(self, token: &str) -> Self {
        self.header("Authorization", format!("Bearer {token}"))
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Body::Json(body);
        self
    }

    pub fn bytes(mut self, body: Vec<u8>) -> Self {
        self.body = Body::Bytes(body);
        self
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decodes a platform response, turning non-2xx statuses into upstream errors
    /// that carry the platform's own payload.
    pub fn into_json(self) -> Result<Value, ToolError> {
        let parsed = if self.body.iter().all(u8::is_ascii_whitespace) {
            None
        } else {
            serde_json::from_slice::<Value>(&self.body).ok()
        };

        if !self.is_success() {
            let message = parsed
                .as_ref()
                .and_then(upstream_message)
                .unwrap_or_else(|| format!("platform returned HTTP {}", self.status));
            return Err(ToolError::Upstream {
                status: Some(self.status),
                message,
                payload: parsed,
            });
        }

        match parsed {
            Some(value) => Ok(value),
            None if self.body.iter().all(u8::is_ascii_whitespace) => {
                Ok(json!({ "status": self.status }))
            }
            None => Err(ToolError::Upstream {
                status: Some(self.status),
                message: "platform returned a non-JSON response".to_string(),
                payload: Some(Value::String(
                    String::from_utf8_lossy(&self.body).into_owned(),
                )),
            }),
        }
    }
}

/// Graph API nests `error.message`, Telegram uses `description`, LinkedIn `message`.
fn upstream_message(payload: &Value) -> Option<String> {
    payload
        .get("error")
        .and_then(|error| error.get("message"))
        .or_else(|| payload.get("description"))
        .or_else(|| payload.get("message"))
        .and_then(|value| value.as_str())
        .map(str::to_string)
}

pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ToolError>;

    fn send_json(&self, request: HttpRequest) -> Result<Value, ToolError> {
        self.execute(request)?.into_json()
    }
}

pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, ToolError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| ToolError::Transport(format!("failed to build HTTP client: {err}")))?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ToolError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };
        debug!(method = %method, url = %redact(&request.url), "outbound request");

        let mut builder = self.client.request(method, &request.url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match request.body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(&value),
            Body::Bytes(bytes) => builder.body(bytes),
        };

        let response = builder
            .send()
            .map_err(|err| ToolError::Transport(err.without_url().to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .map_err(|err| ToolError::Transport(err.without_url().to_string()))?;
        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

// Telegram puts the bot token in the path.
fn redact(url: &str) -> String {
    match url.find("/bot") {
        Some(index) => {
            let rest = &url[index + 4..];
            let tail = rest.find('/').map(|slash| &rest[slash..]).unwrap_or("");
            format!("{}/bot***{tail}", &url[..index])
        }
        None => url.to_string(),
    }
}

#[cfg(test)]
impl HttpRequest {
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn json_body(&self) -> Option<&Value> {
        match &self.body {
            Body::Json(value) => Some(value),
            _ => None,
        }
    }
}
