use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderName, Method, header};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use minbar_api::AppStateInner;
use minbar_db::Storage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "minbar=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let host = std::env::var("MINBAR_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("MINBAR_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    // Provision the database once at startup; absent configuration means
    // the storage facade runs in demo mode for the process lifetime.
    let db = minbar_db::connect()?;
    let storage = Storage::new(db);
    let state = Arc::new(AppStateInner { storage });

    // Wildcard CORS with a fixed method/header list; the layer answers
    // OPTIONS preflights before any route logic runs.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            HeaderName::from_static("x-requested-with"),
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ]);

    let app = minbar_api::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Minbar server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
