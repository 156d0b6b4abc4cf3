mod api;
mod middleware;

use std::sync::Arc;
use std::time::Duration;

use totem_bsale::BsaleClient;
use totem_lookup::LookupResolver;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = totem_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::debug!(?config, "configuration loaded");

    let client = BsaleClient::builder(&config.bsale_api_url)
        .access_token(&config.bsale_token)
        .timeout(Duration::from_secs(config.bsale_request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.bsale_connect_timeout_secs))
        .user_agent(&config.bsale_user_agent)
        .build()?;
    let resolver = LookupResolver::new(client, config.default_price_list_id.clone());

    if !config.public_dir.is_dir() {
        tracing::warn!(
            public_dir = %config.public_dir.display(),
            "public directory does not exist; static files will 404"
        );
    }

    let app = build_app(
        AppState {
            resolver: Arc::new(resolver),
        },
        &config.public_dir,
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("totem lookup listening on http://{}", config.bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
