//! rmcp-backed transport
//!
//! Connects over Streamable HTTP (JSON-RPC over POST, server-push event
//! stream for responses), runs the MCP client handshake and forwards
//! `tools/list` and `tools/call` without reinterpreting them.

use crate::error::TransportError;
use crate::tool::{ToolDefinition, ToolResult};
use crate::transport::{Connector, ToolTransport};
use async_trait::async_trait;
use rmcp::model::{
    CallToolRequestParams, ClientCapabilities, ClientInfo, Implementation, ProtocolVersion,
};
use rmcp::service::{Peer, RoleClient, RunningService, ServiceError};
use rmcp::transport::streamable_http_client::StreamableHttpClientTransport;
use rmcp::ServiceExt;
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

type ClientService = RunningService<RoleClient, ClientInfo>;

/// Build the `ClientInfo` advertised during MCP initialization
fn client_info() -> ClientInfo {
    ClientInfo {
        protocol_version: ProtocolVersion::default(),
        capabilities: ClientCapabilities::default(),
        client_info: Implementation {
            name: "mcplink".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            title: None,
            description: None,
            icons: None,
            website_url: None,
        },
        meta: None,
    }
}

/// Map an rmcp service error, keeping endpoint-reported messages verbatim
fn map_service_error(err: ServiceError) -> TransportError {
    match err {
        ServiceError::McpError(data) => TransportError::Remote(data.message.into_owned()),
        other => TransportError::Transport(other.to_string()),
    }
}

/// Production [`Connector`] using rmcp's Streamable HTTP client
#[derive(Debug, Clone, Copy, Default)]
pub struct RmcpConnector;

#[async_trait]
impl Connector for RmcpConnector {
    async fn connect(&self, url: &Url) -> Result<Box<dyn ToolTransport>, TransportError> {
        debug!(
            host = url.host_str().unwrap_or_default(),
            path = url.path(),
            "Opening Streamable HTTP transport"
        );

        let transport = StreamableHttpClientTransport::from_uri(url.as_str());

        let service: ClientService = client_info()
            .serve(transport)
            .await
            .map_err(|e| TransportError::Transport(format!("MCP initialization failed: {e}")))?;

        if let Some(server) = service.peer_info() {
            debug!(
                server = %server.server_info.name,
                version = %server.server_info.version,
                "MCP handshake complete"
            );
        }

        let peer = service.peer().clone();
        Ok(Box::new(RmcpTransport {
            peer,
            service: Some(service),
        }))
    }
}

/// Open rmcp client connection
///
/// Dropping it drops the running service, which cancels the connection.
pub struct RmcpTransport {
    /// Peer handle for sending requests to the server
    peer: Peer<RoleClient>,
    /// Running service; taken on close
    service: Option<ClientService>,
}

#[async_trait]
impl ToolTransport for RmcpTransport {
    async fn list_tools(&self) -> Result<Vec<ToolDefinition>, TransportError> {
        let tools = self
            .peer
            .list_all_tools()
            .await
            .map_err(map_service_error)?;

        Ok(tools
            .into_iter()
            .map(|t| ToolDefinition {
                name: t.name.to_string(),
                description: t.description.map(|d| d.to_string()),
                input_schema: Some(Value::Object(t.input_schema.as_ref().clone())),
            })
            .collect())
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<ToolResult, TransportError> {
        let result = self
            .peer
            .call_tool(CallToolRequestParams {
                name: name.to_string().into(),
                arguments: Some(arguments),
                meta: None,
                task: None,
            })
            .await
            .map_err(map_service_error)?;

        let payload =
            serde_json::to_value(&result).map_err(|e| TransportError::Protocol(e.to_string()))?;
        Ok(ToolResult::new(payload))
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        if let Some(service) = self.service.take() {
            let reason = service
                .cancel()
                .await
                .map_err(|e| TransportError::Transport(format!("shutdown failed: {e}")))?;
            debug!(?reason, "MCP service stopped");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::ErrorData;

    #[test]
    fn advertises_crate_identity() {
        let info = client_info();
        assert_eq!(info.client_info.name, "mcplink");
        assert_eq!(info.client_info.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn endpoint_errors_keep_their_message() {
        let err = map_service_error(ServiceError::McpError(ErrorData::invalid_params(
            "topic: Required",
            None,
        )));
        assert!(matches!(err, TransportError::Remote(ref m) if m == "topic: Required"));
        assert_eq!(err.to_string(), "topic: Required");
    }
}
