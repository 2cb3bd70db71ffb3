//! CSV to ZIP upload server
//!
//! ```bash
//! CSVZIP_BIND=0.0.0.0:3000 RUST_LOG=csvzip=debug cargo run --bin csvzip-server
//! curl -F csvFile=@people.csv -F outputFormat=json -o people.zip http://localhost:3000/upload
//! ```

use csvzip::config::ServerConfig;
use csvzip::http::router;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let app = router(&config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(
        "Listening on http://{} (upload limit {} bytes)",
        listener.local_addr()?,
        config.max_upload_bytes
    );

    axum::serve(listener, app).await?;
    Ok(())
}
