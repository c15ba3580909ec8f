use crate::error::ToolError;
use crate::mcp::contracts::{self, Platform};
use crate::social::facebook::FacebookClient;
use crate::social::linkedin::LinkedInClient;
use crate::social::telegram::TelegramClient;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tracing::{info, warn};

pub mod facebook;
pub mod linkedin;
pub mod telegram;

/// Platform clients available to the dispatcher. A `None` platform's tools are
/// treated as unknown.
#[derive(Default)]
pub struct Clients {
    pub facebook: Option<FacebookClient>,
    pub linkedin: Option<LinkedInClient>,
    pub telegram: Option<TelegramClient>,
}

impl Clients {
    pub fn platforms(&self) -> Vec<Platform> {
        Platform::ALL
            .into_iter()
            .filter(|platform| self.has(*platform))
            .collect()
    }

    fn has(&self, platform: Platform) -> bool {
        match platform {
            Platform::Facebook => self.facebook.is_some(),
            Platform::LinkedIn => self.linkedin.is_some(),
            Platform::Telegram => self.telegram.is_some(),
        }
    }
}

/// Validates and runs one tool invocation.
pub fn dispatch(name: &str, args: &Value, clients: &Clients) -> Result<Value, ToolError> {
    let unknown = || ToolError::UnknownTool(name.to_string());
    let contract = contracts::find(name).ok_or_else(unknown)?;
    if !clients.has(contract.platform) {
        return Err(unknown());
    }

    let args = match args {
        Value::Null => Value::Object(Map::new()),
        Value::Object(_) => args.clone(),
        _ => return Err(ToolError::invalid("arguments must be an object")),
    };
    for field in contract.required {
        if args.get(*field).is_none_or(Value::is_null) {
            return Err(ToolError::MissingArgument((*field).to_string()));
        }
    }

    match contract.platform {
        Platform::Facebook => {
            facebook::call(name, &args, clients.facebook.as_ref().ok_or_else(unknown)?)
        }
        Platform::LinkedIn => {
            linkedin::call(name, &args, clients.linkedin.as_ref().ok_or_else(unknown)?)
        }
        Platform::Telegram => {
            telegram::call(name, &args, clients.telegram.as_ref().ok_or_else(unknown)?)
        }
    }
}

/// MCP `tools/call` result for an invocation; failures are reported in-band.
pub fn call(name: &str, args: &Value, clients: &Clients) -> Value {
    info!(tool = name, "tool call");
    match dispatch(name, args, clients) {
        Ok(value) => success_result(value),
        Err(err) => {
            warn!(tool = name, kind = err.kind(), error = %err, "tool call failed");
            tool_error_result(&err, name)
        }
    }
}

pub fn success_result(value: Value) -> Value {
    let text = serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
    let structured = match value {
        Value::Object(_) => value,
        other => json!({ "result": other }),
    };
    json!({
        "content": [{"type": "text", "text": text}],
        "structuredContent": structured,
        "isError": false
    })
}

pub fn error_result(
    kind: &'static str,
    message: impl Into<String>,
    source: Option<&str>,
) -> Value {
    let message = message.into();
    let mut error = json!({
        "kind": kind,
        "message": message,
    });

    if let Some(source) = source
        && let Some(obj) = error.as_object_mut()
    {
        obj.insert("source".to_string(), json!(source));
    }

    json!({
        "content": [{"type": "text", "text": format!("Error: {message}")}],
        "structuredContent": {"error": error},
        "isError": true
    })
}

pub fn tool_error_result(err: &ToolError, tool: &str) -> Value {
    let mut result = error_result(err.kind(), err.to_string(), Some(tool));
    if let Some(details) = err.details()
        && let Some(error) = result
            .get_mut("structuredContent")
            .and_then(|value| value.get_mut("error"))
            .and_then(|value| value.as_object_mut())
    {
        error.insert("details".to_string(), details.clone());
    }
    result
}

pub(crate) fn parse_args<T: DeserializeOwned>(args: &Value) -> Result<T, ToolError> {
    serde_json::from_value(args.clone())
        .map_err(|err| ToolError::invalid(format!("invalid arguments: {err}")))
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<(), ToolError> {
    if value.trim().is_empty() {
        return Err(ToolError::invalid(format!("{field} must not be empty")));
    }
    Ok(())
}
