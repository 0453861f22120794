//! Session adapter: connection lifecycle, tool cache and call surface
//!
//! A [`Session`] is either disconnected (initial) or connected. Only a
//! successful [`Session::connect`] enters the connected state and only
//! [`Session::disconnect`] leaves it. The tool cache is replaced wholesale on
//! every successful refresh and cleared on disconnect.

use crate::client::RmcpConnector;
use crate::config::SessionConfig;
use crate::credential::Credential;
use crate::details::ToolDetail;
use crate::error::{Result, SessionError};
use crate::tool::{BatchResult, ToolDefinition, ToolRequest, ToolResult};
use crate::transport::{bounded, Connector, Deadline, ToolTransport};
use futures::future::join_all;
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Snapshot of the session state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    /// Whether a transport is open
    pub connected: bool,
    /// Number of cached tools
    pub tool_count: usize,
    /// Cached tool names, in endpoint order
    pub tools: Vec<String>,
}

/// Arguments for [`Session::execute_function`]
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionArgs {
    /// Already-parsed argument object
    Map(Map<String, Value>),
    /// Argument object serialized as JSON text
    Json(String),
}

impl From<Map<String, Value>> for FunctionArgs {
    fn from(map: Map<String, Value>) -> Self {
        Self::Map(map)
    }
}

impl From<&str> for FunctionArgs {
    fn from(json: &str) -> Self {
        Self::Json(json.to_string())
    }
}

impl From<String> for FunctionArgs {
    fn from(json: String) -> Self {
        Self::Json(json)
    }
}

impl FunctionArgs {
    fn into_map(self, tool: &str) -> Result<Map<String, Value>> {
        match self {
            Self::Map(map) => Ok(map),
            Self::Json(text) => match serde_json::from_str::<Value>(&text) {
                Ok(Value::Object(map)) => Ok(map),
                Ok(other) => Err(SessionError::ArgumentParse {
                    tool: tool.into(),
                    reason: format!("expected a JSON object, got {}", json_kind(&other)),
                }),
                Err(e) => Err(SessionError::ArgumentParse {
                    tool: tool.into(),
                    reason: e.to_string(),
                }),
            },
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Client session against one MCP tool endpoint
pub struct Session {
    url: Url,
    /// Endpoint as configured, safe to log
    endpoint: String,
    connect_timeout: Option<Duration>,
    request_timeout: Option<Duration>,
    connector: Box<dyn Connector>,
    /// Present exactly while connected
    transport: Option<Box<dyn ToolTransport>>,
    tools: Vec<ToolDefinition>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("endpoint", &self.endpoint)
            .field("connected", &self.is_connected())
            .field("tools", &self.tools.len())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create a session using the rmcp Streamable HTTP transport
    ///
    /// No network activity happens until [`Session::connect`].
    ///
    /// # Errors
    /// Returns [`SessionError::InvalidCredential`] for a blank API key and
    /// [`SessionError::Config`] for an unusable endpoint
    pub fn new(api_key: &str, config: SessionConfig) -> Result<Self> {
        Self::with_connector(api_key, config, RmcpConnector)
    }

    /// Create a session with a custom [`Connector`]
    ///
    /// # Errors
    /// Same as [`Session::new`]
    pub fn with_connector(
        api_key: &str,
        config: SessionConfig,
        connector: impl Connector + 'static,
    ) -> Result<Self> {
        let credential = Credential::new(api_key)?;
        let url = config.endpoint_url(&credential)?;

        Ok(Self {
            url,
            endpoint: config.endpoint.trim().to_string(),
            connect_timeout: config.connect_timeout(),
            request_timeout: config.request_timeout(),
            connector: Box::new(connector),
            transport: None,
            tools: Vec::new(),
        })
    }

    /// Open the transport, run the handshake and fetch the initial tool list
    ///
    /// The session only becomes connected once all three succeed, and all
    /// three share the connect timeout. An already open transport is closed
    /// first.
    ///
    /// # Errors
    /// Returns [`SessionError::Connection`] wrapping the underlying cause
    pub async fn connect(&mut self) -> Result<()> {
        if self.transport.is_some() {
            debug!("Reconnecting to '{}'", self.endpoint);
            self.disconnect().await;
        }

        info!(
            "Connecting to MCP endpoint '{}' with timeout {:?}",
            self.endpoint, self.connect_timeout
        );

        let deadline = Deadline::start("connect", self.connect_timeout);

        let mut transport = deadline
            .run(self.connector.connect(&self.url))
            .await
        .map_err(|source| SessionError::Connection {
            endpoint: self.endpoint.clone(),
            source,
        })?;

        let listed = deadline
            .run(bounded(
                self.request_timeout,
                "list_tools",
                transport.list_tools(),
            ))
            .await;
        let tools = match listed {
            Ok(tools) => tools,
            Err(source) => {
                if let Err(e) = transport.close().await {
                    warn!("Failed to close half-open transport: {}", e);
                }
                return Err(SessionError::Connection {
                    endpoint: self.endpoint.clone(),
                    source,
                });
            }
        };

        for tool in &tools {
            debug!("  Tool '{}': {:?}", tool.name, tool.description);
        }

        self.tools = tools;
        self.transport = Some(transport);

        info!(
            "Connected to '{}' ({} tools)",
            self.endpoint,
            self.tools.len()
        );
        Ok(())
    }

    /// Close the transport and clear the tool cache
    ///
    /// Idempotent. Close failures are logged and otherwise ignored.
    pub async fn disconnect(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            match transport.close().await {
                Ok(()) => info!("Disconnected from '{}'", self.endpoint),
                Err(e) => warn!("Error while closing '{}' (ignored): {}", self.endpoint, e),
            }
        }
        self.tools.clear();
    }

    /// Whether a transport is open
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    /// Current state snapshot
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            connected: self.is_connected(),
            tool_count: self.tools.len(),
            tools: self.tool_names(),
        }
    }

    /// Fetch the tool list again and replace the cache
    ///
    /// # Errors
    /// Returns [`SessionError::NotConnected`] without a transport, or
    /// [`SessionError::ToolList`] if the fetch fails; the cache is then unchanged
    pub async fn refresh_tools(&mut self) -> Result<Vec<ToolDefinition>> {
        let transport = self.transport()?;

        let tools = bounded(self.request_timeout, "list_tools", transport.list_tools())
            .await
            .map_err(SessionError::ToolList)?;

        info!(
            "Refreshed tools from '{}' ({} -> {})",
            self.endpoint,
            self.tools.len(),
            tools.len()
        );
        self.tools = tools;
        Ok(self.tools.clone())
    }

    /// Copy of the cached tool list
    ///
    /// # Errors
    /// Returns [`SessionError::NotConnected`] when disconnected
    pub fn tools(&self) -> Result<Vec<ToolDefinition>> {
        self.transport()?;
        Ok(self.tools.clone())
    }

    /// Look up a cached tool by exact, case-sensitive name
    ///
    /// # Errors
    /// Returns [`SessionError::NotConnected`] when disconnected
    pub fn tool(&self, name: &str) -> Result<Option<&ToolDefinition>> {
        self.transport()?;
        Ok(self.find_tool(name))
    }

    /// Parameter summaries for every cached tool
    ///
    /// Empty when disconnected.
    #[must_use]
    pub fn tools_with_details(&self) -> Vec<ToolDetail> {
        self.tools.iter().map(ToolDetail::from).collect()
    }

    /// Call a cached tool, forwarding `arguments` unchanged
    ///
    /// # Errors
    /// Returns [`SessionError::NotConnected`], [`SessionError::UnknownTool`]
    /// (no request is sent), or [`SessionError::ToolInvocation`] carrying the
    /// endpoint's message
    pub async fn call_tool(&self, name: &str, arguments: Map<String, Value>) -> Result<ToolResult> {
        let transport = self.transport()?;

        if self.find_tool(name).is_none() {
            return Err(SessionError::UnknownTool {
                tool: name.into(),
                available: self.tool_names(),
            });
        }

        debug!("Calling tool '{}' on '{}'", name, self.endpoint);

        let result = bounded(
            self.request_timeout,
            "call_tool",
            transport.call_tool(name, arguments),
        )
        .await
        .map_err(|source| SessionError::ToolInvocation {
            tool: name.into(),
            source,
        })?;

        if result.is_error() {
            debug!("Tool '{}' returned an error result", name);
        }
        Ok(result)
    }

    /// Call a tool with arguments given as a map or as JSON text
    ///
    /// # Errors
    /// Returns [`SessionError::ArgumentParse`] for malformed or non-object
    /// JSON, otherwise the errors of [`Session::call_tool`]
    pub async fn execute_function(
        &self,
        name: &str,
        arguments: impl Into<FunctionArgs>,
    ) -> Result<ToolResult> {
        let arguments = arguments.into().into_map(name)?;
        self.call_tool(name, arguments).await
    }

    /// Run independent tool calls concurrently
    ///
    /// Every request yields its own entry, in input order. A failing request
    /// never affects the others.
    pub async fn call_tools(&self, requests: &[ToolRequest]) -> Vec<BatchResult> {
        debug!("Dispatching {} tool calls", requests.len());

        join_all(requests.iter().map(|request| async move {
            match self
                .call_tool(&request.name, request.arguments.clone())
                .await
            {
                Ok(result) => BatchResult::Success {
                    tool: request.name.clone(),
                    result,
                },
                Err(e) => BatchResult::Failure {
                    tool: request.name.clone(),
                    error: e.to_string(),
                },
            }
        }))
        .await
    }

    fn transport(&self) -> Result<&dyn ToolTransport> {
        self.transport.as_deref().ok_or(SessionError::NotConnected)
    }

    fn find_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.iter().find(|t| t.name == name)
    }

    fn tool_names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name.clone()).collect()
    }
}
