//! Error types for session operations

use std::time::Duration;
use thiserror::Error;

/// Failures raised by a [`crate::ToolTransport`] or [`crate::Connector`]
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection-level failure (I/O, HTTP, handshake)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Error reported by the endpoint itself, kept verbatim
    #[error("{0}")]
    Remote(String),

    /// Payload could not be encoded or decoded
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Round trip did not finish in time
    #[error("{operation} timed out after {after:?}")]
    Timeout {
        /// Operation that was cut off
        operation: &'static str,
        /// Configured limit
        after: Duration,
    },
}

/// Session adapter errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// API key was empty or whitespace-only
    #[error("Invalid credential: API key must not be empty")]
    InvalidCredential,

    /// Configuration could not be turned into an endpoint
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport setup, handshake or the initial tool fetch failed
    #[error("Failed to connect to '{endpoint}': {source}")]
    Connection {
        /// Endpoint URL without credentials
        endpoint: String,
        /// Underlying cause
        #[source]
        source: TransportError,
    },

    /// Operation requires an open connection
    #[error("Session is not connected; call connect() first")]
    NotConnected,

    /// Tool list could not be fetched; the previous cache is kept
    #[error("Failed to list tools: {0}")]
    ToolList(#[source] TransportError),

    /// No cached tool carries this name
    #[error("Unknown tool '{tool}'. Available tools: {}", available.join(", "))]
    UnknownTool {
        /// Requested tool name
        tool: String,
        /// Names of every cached tool
        available: Vec<String>,
    },

    /// Arguments given as JSON text were not a JSON object
    #[error("Invalid arguments for tool '{tool}': {reason}")]
    ArgumentParse {
        /// Tool the arguments were meant for
        tool: String,
        /// Parser message
        reason: String,
    },

    /// Endpoint or transport rejected the call
    #[error("Tool '{tool}' failed: {source}")]
    ToolInvocation {
        /// Tool name
        tool: String,
        /// Endpoint-reported cause
        #[source]
        source: TransportError,
    },
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tool_lists_available_names() {
        let err = SessionError::UnknownTool {
            tool: "Nope".into(),
            available: vec!["Topic".into(), "Cryptocurrencies".into()],
        };
        assert_eq!(
            err.to_string(),
            "Unknown tool 'Nope'. Available tools: Topic, Cryptocurrencies"
        );
    }

    #[test]
    fn remote_message_is_passed_through() {
        let err = SessionError::ToolInvocation {
            tool: "Topic".into(),
            source: TransportError::Remote("topic: Required".into()),
        };
        assert_eq!(err.to_string(), "Tool 'Topic' failed: topic: Required");
    }

    #[test]
    fn timeout_display() {
        let err = TransportError::Timeout {
            operation: "call_tool",
            after: Duration::from_secs(3),
        };
        assert_eq!(err.to_string(), "call_tool timed out after 3s");
    }
}
