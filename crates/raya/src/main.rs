//! Server binary: binds the WebSocket listener and runs until killed.
//!
//! The bind address is the only configuration surface: the first CLI
//! argument, the `RAYA_ADDR` environment variable, or the default.

use raya::RayaServerBuilder;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let addr = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("RAYA_ADDR").ok())
        .unwrap_or_else(|| "127.0.0.1:3001".to_string());

    let server = RayaServerBuilder::new().bind(&addr).build().await?;
    tracing::info!(%addr, "raya listening");
    server.run().await?;
    Ok(())
}
