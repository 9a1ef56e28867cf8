//! `RayaServer` builder and accept loop.
//!
//! This is the entry point for running the server. It ties together the
//! layers: transport → protocol → registry → per-connection handler.

use std::sync::Arc;

use raya_protocol::{Codec, JsonCodec};
use raya_room::Registry;
use raya_transport::{Transport, WebSocketTransport};

use crate::RayaError;
use crate::handler::handle_connection;

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. The
/// registry serializes its own access; the codec is stateless.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) registry: Registry,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a Raya server.
///
/// # Example
///
/// ```rust,no_run
/// use raya::RayaServerBuilder;
///
/// # async fn run() -> Result<(), raya::RayaError> {
/// let server = RayaServerBuilder::new().bind("0.0.0.0:3001").build().await?;
/// server.run().await
/// # }
/// ```
pub struct RayaServerBuilder {
    bind_addr: String,
}

impl RayaServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3001".to_string(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Binds the listener and builds the server with [`JsonCodec`].
    pub async fn build(self) -> Result<RayaServer<JsonCodec>, RayaError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            registry: Registry::new(),
            codec: JsonCodec,
        });

        Ok(RayaServer { transport, state })
    }
}

impl Default for RayaServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Raya server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct RayaServer<C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl<C: Codec> RayaServer<C> {
    /// Creates a new builder.
    pub fn builder() -> RayaServerBuilder {
        RayaServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections and spawns a handler task for each.
    /// Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), RayaError> {
        tracing::info!("raya server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_connection(conn, state).await
                        {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
