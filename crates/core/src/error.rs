//! Error types for the agentic domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all agent operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl Error {
    /// Shorthand for a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures of the completion gateway. Always fatal to the current run.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider returned no completion: {0}")]
    EmptyCompletion(String),
}

/// Failures around tool calls embedded in model text.
///
/// `Parse`, `NotFound` and `ArgumentType` are recoverable: the ReAct loop
/// reports them back to the model as observations. `ExecutionFailed` is
/// raised by the tool itself and aborts the run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid argument '{argument}' for tool {tool_name}: {reason}")]
    ArgumentType {
        tool_name: String,
        argument: String,
        reason: String,
    },

    #[error("Malformed tool call: {0}")]
    Parse(String),

    #[error("Tool execution failed: {tool_name}: {reason}")]
    ExecutionFailed { tool_name: String, reason: String },
}

impl ToolError {
    /// A failure raised from inside a tool body. The tool name is filled in
    /// by [`crate::tool::ToolDescriptor::invoke`].
    pub fn execution(reason: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            tool_name: String::new(),
            reason: reason.into(),
        }
    }

    /// Whether the model can be told about this failure and try again.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::ExecutionFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn argument_type_error_names_tool_and_argument() {
        let err = Error::Tool(ToolError::ArgumentType {
            tool_name: "add".into(),
            argument: "a".into(),
            reason: "cannot convert \"abc\" to int".into(),
        });
        let text = err.to_string();
        assert!(text.contains("add"));
        assert!(text.contains("'a'"));
        assert!(text.contains("abc"));
    }

    #[test]
    fn only_execution_failures_are_fatal() {
        assert!(ToolError::NotFound("x".into()).is_recoverable());
        assert!(ToolError::Parse("eof".into()).is_recoverable());
        assert!(
            !ToolError::ExecutionFailed {
                tool_name: "x".into(),
                reason: "boom".into(),
            }
            .is_recoverable()
        );
    }
}
