use clap::Parser;
use core_auth::HttpIdentityProvider;
use core_catalog::MusixmatchClient;
use core_runtime::config::{CoreConfig, MUSIXMATCH_API_BASE};
use core_runtime::http::ReqwestHttpClient;
use core_runtime::logging::{init_logging, LoggingConfig};
use proxy_server::routes::{router, AppState};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "proxy-server", about = "Chart browser backend proxy")]
struct Args {
    /// Upstream catalog API key.
    #[arg(long, env = "MUSIXMATCH_API_KEY")]
    api_key: String,

    /// Upstream catalog API base URL.
    #[arg(long, default_value = MUSIXMATCH_API_BASE, env = "MUSIXMATCH_BASE_URL")]
    catalog_url: String,

    /// Identity provider base URL.
    #[arg(long, env = "IDENTITY_BASE_URL")]
    identity_url: String,

    /// Port to listen on.
    #[arg(long, default_value = "3001", env = "PORT")]
    port: u16,

    /// Address to bind to.
    #[arg(long, default_value = "0.0.0.0", env = "BIND")]
    bind: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = init_logging(LoggingConfig::default()) {
        eprintln!("failed to initialize logging: {e}");
        std::process::exit(1);
    }

    let config = CoreConfig::builder()
        .musixmatch_api_key(&args.api_key)
        .musixmatch_base_url(&args.catalog_url)
        .identity_base_url(&args.identity_url)
        .build()
        .unwrap_or_else(|e| {
            error!("invalid configuration: {e}");
            std::process::exit(1);
        });

    let http_client = Arc::new(ReqwestHttpClient::new());

    let state = Arc::new(AppState {
        catalog: Arc::new(MusixmatchClient::new(
            http_client.clone(),
            config.musixmatch_api_key.clone(),
            config.musixmatch_base_url.clone(),
        )),
        identity: Arc::new(HttpIdentityProvider::new(
            http_client,
            config.identity_base_url.clone(),
        )),
    });

    let app = router(state);
    let addr = format!("{}:{}", args.bind, args.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            error!("failed to bind to {addr}: {e}");
            std::process::exit(1);
        });

    info!("proxy-server listening on http://{addr}");
    if let Err(e) = axum::serve(listener, app).await {
        error!("server error: {e}");
        std::process::exit(1);
    }
}
