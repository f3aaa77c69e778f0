use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use photo_analysis::api::{create_router, AppState};
use photo_analysis::config::Config;
use photo_analysis::db::{Database, DocumentStore, LibSqlBackend};
use photo_analysis::message::PubSubMessage;
use photo_analysis::ocr::OcrProvider;
use photo_analysis::processing::PhotoPipeline;
use photo_analysis::sink::{DocumentSink, RemoteEndpointSink, ResultSink, SinkKind};

#[derive(Parser)]
#[command(name = "photo-analysis")]
#[command(about = "Extracts text from photos announced over Pub/Sub")]
struct Args {
    /// Process a single event file (`{"data": ..., "attributes": ...}`) and exit
    #[arg(long)]
    event: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "photo_analysis=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    tracing::info!(
        "Message format: {}, id source: {:?}",
        config.message.format,
        config.message.id_source
    );

    let ocr = OcrProvider::new(&config.ocr);
    if !ocr.is_available() {
        tracing::warn!("OCR unavailable - every message will fail at text extraction");
    }
    let ocr_available = ocr.is_available();

    let sink: Arc<dyn ResultSink> = match config.sink.kind {
        SinkKind::Document => {
            tracing::info!("Initializing document store...");
            let db = Database::new(&config.database).await?;
            let store: Arc<dyn DocumentStore> = Arc::new(LibSqlBackend::new(db));
            Arc::new(DocumentSink::new(store, config.sink.collection.clone()))
        }
        SinkKind::Remote => {
            if config.sink.remote.token.is_none() {
                tracing::warn!(
                    "REMOTE_TOKEN is not set - messages without a jwt cannot be delivered"
                );
            }
            Arc::new(RemoteEndpointSink::new(&config.sink.remote)?)
        }
    };
    tracing::info!(
        "Sink: {} (text case: {})",
        sink.kind(),
        config.processing.case_policy
    );

    let pipeline = PhotoPipeline::new(&config, Arc::new(ocr), sink);

    if let Some(path) = args.event {
        let raw = tokio::fs::read_to_string(&path).await?;
        let message: PubSubMessage = serde_json::from_str(&raw)?;
        let outcome = pipeline.process(&message).await?;
        tracing::info!("Processed {}: {:?}", path.display(), outcome);
        return Ok(());
    }

    let state = AppState::new(pipeline, ocr_available);
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Photo analysis listening on http://{}", addr);
    tracing::info!("  Push endpoint: http://{}/pubsub/push", addr);
    tracing::info!("  Health check:  http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining in-flight requests...");
}
