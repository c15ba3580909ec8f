use crate::mcp::errors;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("missing required argument: {0}")]
    MissingArgument(String),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error("{message}")]
    Upstream {
        status: Option<u16>,
        message: String,
        payload: Option<Value>,
    },
    #[error("request failed: {0}")]
    Transport(String),
}

impl ToolError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Upstream failure that was detected locally, e.g. a response missing an id.
    pub fn upstream(message: impl Into<String>, payload: Option<Value>) -> Self {
        Self::Upstream {
            status: None,
            message: message.into(),
            payload,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::UnknownTool(_) => errors::UNKNOWN_TOOL,
            ToolError::MissingArgument(_) | ToolError::InvalidArgument(_) => errors::INVALID_INPUT,
            ToolError::NotConfigured(_) => errors::NOT_CONFIGURED,
            ToolError::Upstream { .. } => errors::UPSTREAM_ERROR,
            ToolError::Transport(_) => errors::TRANSPORT_ERROR,
        }
    }

    pub fn details(&self) -> Option<&Value> {
        match self {
            ToolError::Upstream { payload, .. } => payload.as_ref(),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "missing required environment variable(s): {}. Set them in a .env file or your shell before starting the server.",
        .0.join(", ")
    )]
    Missing(Vec<&'static str>),
    #[error("invalid value for {name}: {message}")]
    Invalid { name: &'static str, message: String },
    #[error("failed to load env file: {0}")]
    EnvFile(#[from] dotenvy::Error),
}
