//! `mcplink` session adapter
//!
//! A thin MCP (Model Context Protocol) client for a single remote tool
//! endpoint that authenticates with an API key in the connection URL.
//!
//! ## Features
//!
//! - Connect over rmcp's Streamable HTTP transport (server-push event stream)
//! - Cache the advertised tool list, refreshed wholesale on demand
//! - Derive per-tool parameter summaries from the cached JSON Schemas
//! - Forward single, JSON-string and concurrent batch tool calls unchanged
//! - Configurable connect and request timeouts, no hidden retries
//!
//! ```no_run
//! use mcplink_session::{Session, SessionConfig};
//!
//! # async fn demo() -> mcplink_session::Result<()> {
//! let mut session = Session::new("my-api-key", SessionConfig::default())?;
//! session.connect().await?;
//! let result = session
//!     .execute_function("Topic", r#"{"topic":"bitcoin"}"#)
//!     .await?;
//! println!("{}", result.as_value());
//! session.disconnect().await;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code, unused_imports, unused_variables, missing_docs)]

pub mod client;
pub mod config;
pub mod credential;
pub mod details;
pub mod error;
pub mod session;
pub mod tool;
pub mod transport;

pub use client::RmcpConnector;
pub use config::SessionConfig;
pub use credential::Credential;
pub use details::{ParameterInfo, ToolDetail};
pub use error::{Result, SessionError, TransportError};
pub use session::{FunctionArgs, Session, SessionStatus};
pub use tool::{BatchResult, ToolDefinition, ToolRequest, ToolResult};
pub use transport::{Connector, ToolTransport};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BatchResult, FunctionArgs, Session, SessionConfig, SessionError, ToolDefinition,
        ToolRequest, ToolResult,
    };
}
