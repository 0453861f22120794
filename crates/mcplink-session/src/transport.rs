//! Transport seam between the session and the wire
//!
//! [`crate::Session`] only talks to these traits. [`crate::RmcpConnector`] is
//! the production implementation; tests plug in an in-memory one.

use crate::error::TransportError;
use crate::tool::{ToolDefinition, ToolResult};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

/// Opens transports to an endpoint
#[async_trait]
pub trait Connector: Send + Sync {
    /// Open a transport and complete the protocol handshake
    async fn connect(&self, url: &Url) -> Result<Box<dyn ToolTransport>, TransportError>;
}

/// An open, initialized connection to a tool endpoint
#[async_trait]
pub trait ToolTransport: Send + Sync {
    /// Fetch the complete tool list
    async fn list_tools(&self) -> Result<Vec<ToolDefinition>, TransportError>;

    /// Invoke a tool with the given arguments
    async fn call_tool(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<ToolResult, TransportError>;

    /// Shut the connection down
    async fn close(&mut self) -> Result<(), TransportError>;
}

/// Run `fut`, failing with [`TransportError::Timeout`] once `limit` elapses
pub(crate) async fn bounded<T, F>(
    limit: Option<Duration>,
    operation: &'static str,
    fut: F,
) -> Result<T, TransportError>
where
    F: Future<Output = Result<T, TransportError>>,
{
    match limit {
        Some(after) => tokio::time::timeout(after, fut)
            .await
            .map_err(|_| TransportError::Timeout { operation, after })?,
        None => fut.await,
    }
}

/// Shared deadline for a sequence of steps that together make up `operation`
#[derive(Debug, Clone, Copy)]
pub(crate) struct Deadline {
    operation: &'static str,
    limit: Option<(Instant, Duration)>,
}

impl Deadline {
    /// Start the clock; `None` never expires
    pub(crate) fn start(operation: &'static str, after: Option<Duration>) -> Self {
        Self {
            operation,
            limit: after.map(|after| (Instant::now() + after, after)),
        }
    }

    /// Run `fut`, failing with [`TransportError::Timeout`] once the deadline passes
    pub(crate) async fn run<T, F>(self, fut: F) -> Result<T, TransportError>
    where
        F: Future<Output = Result<T, TransportError>>,
    {
        match self.limit {
            Some((at, after)) => tokio::time::timeout_at(at, fut)
                .await
                .map_err(|_| TransportError::Timeout {
                    operation: self.operation,
                    after,
                })?,
            None => fut.await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bounded_passes_through_fast_results() {
        let value = bounded(Some(Duration::from_secs(1)), "op", async {
            Ok::<_, TransportError>(7)
        })
        .await;
        assert!(matches!(value, Ok(7)));
    }

    #[tokio::test]
    async fn bounded_times_out_slow_futures() {
        let value = bounded(Some(Duration::from_millis(20)), "list_tools", async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, TransportError>(())
        })
        .await;
        assert!(matches!(
            value,
            Err(TransportError::Timeout {
                operation: "list_tools",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn deadline_is_shared_across_steps() {
        let deadline = Deadline::start("connect", Some(Duration::from_millis(150)));

        let first = deadline
            .run(async {
                tokio::time::sleep(Duration::from_millis(100)).await;
                Ok::<_, TransportError>(())
            })
            .await;
        assert!(first.is_ok());

        // Would fit in a fresh 150ms budget, but not in what is left of this one.
        let second = deadline
            .run(async {
                tokio::time::sleep(Duration::from_millis(100)).await;
                Ok::<_, TransportError>(())
            })
            .await;
        assert!(matches!(
            second,
            Err(TransportError::Timeout {
                operation: "connect",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn unbounded_deadline_never_expires() {
        let value = Deadline::start("connect", None)
            .run(async { Ok::<_, TransportError>(1) })
            .await;
        assert!(matches!(value, Ok(1)));
    }
}
