use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use terradiff_api::{create_router, ApiConfig, AppState};
use terradiff_core::ports::ImageService;
use terradiff_engine::{EarthEngineClient, MockEngine};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "terradiff_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env();

    tracing::info!(
        port = config.port,
        remote_engine = config.uses_remote_engine(),
        report = %config.report_path.display(),
        "Starting terradiff API server"
    );

    // Engine selection: a verified Earth Engine session when credentials are
    // configured, synthetic data otherwise.
    let engine: Arc<dyn ImageService> = match &config.engine {
        Some(settings) => {
            let client = EarthEngineClient::new(settings.clone());
            if let Err(e) = client.handshake().await {
                tracing::error!("Earth Engine handshake failed: {}", e);
                tracing::error!(
                    "Remediation:\n\
                    1. Verify EARTHENGINE_TOKEN is a valid OAuth access token\n\
                    2. Check that EARTHENGINE_PROJECT is registered for Earth Engine\n\
                    3. Confirm outbound network access to {}",
                    settings.base_url
                );
                std::process::exit(1);
            }
            tracing::info!(project = %settings.project, "Earth Engine session verified");
            Arc::new(client)
        }
        None => {
            tracing::info!(
                "No Earth Engine credentials, serving synthetic data \
                 (set EARTHENGINE_PROJECT and EARTHENGINE_TOKEN)"
            );
            Arc::new(MockEngine::new())
        }
    };

    let state = Arc::new(AppState::new(engine, config.report_path.clone()));

    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let app = create_router(state).layer(cors).layer(TraceLayer::new_for_http());

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    tracing::info!("Listening on {}", addr);
    tracing::info!("CORS enabled for {}", config.cors_origin);

    axum::serve(listener, app).await.unwrap();
}
