use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jobrelay_api::config::ServerConfig;
use jobrelay_api::router::build_app_router;
use jobrelay_api::state::AppState;
use jobrelay_clients::{AirtableClient, OpenAiClient, SlackClient};
use jobrelay_pipeline::Pipeline;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "jobrelay_api=debug,jobrelay_pipeline=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Server exited with error");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;
    tracing::info!(
        model = %config.openai.model,
        channel = %config.slack.channel_id,
        scoring_enabled = config.scoring_enabled,
        "Configuration loaded",
    );

    // --- Outbound clients ---
    let timeout = config.outbound_timeout();
    let openai = OpenAiClient::new(config.openai.clone(), timeout)?;
    let airtable = AirtableClient::new(config.airtable.clone(), timeout)?;
    let slack = SlackClient::new(config.slack.clone(), timeout)?;

    let pipeline = Pipeline::new(
        Arc::new(openai),
        Arc::new(airtable),
        Arc::new(slack),
        config.pipeline_settings(),
    );

    let addr = SocketAddr::new(config.host.parse()?, config.port);

    let state = AppState {
        config: Arc::new(config),
        pipeline: Arc::new(pipeline),
    };
    let app = build_app_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Starting server on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for SIGINT (Ctrl-C) or SIGTERM.
///
/// In-flight webhook runs complete before the server stops.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
