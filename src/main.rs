use axum::{Router, http::header, routing::get};
use itemsplit::{
    api::{handlers::api_routes, openapi::ApiDoc},
    config::CONFIG,
    core::services::SplitService,
    infrastructure::{
        gateway::{ExpenseGateway, http::HttpExpenseGateway},
        logging::in_memory::InMemoryLogging,
        storage::in_memory::InMemorySessionStore,
    },
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt().with_env_filter(CONFIG.log_level.as_str()).init();
    info!("Loaded configuration: {:?}", *CONFIG);

    let timeout = Duration::from_secs(CONFIG.request_timeout_secs);
    let gateway: Arc<dyn ExpenseGateway> = Arc::new(HttpExpenseGateway::new(&CONFIG.expense_api_url, timeout)?);
    let service = Arc::new(SplitService::new(
        gateway,
        InMemoryLogging::new(),
        InMemorySessionStore::new(),
    ));

    let app = Router::new()
        .route("/", get(|| async { "OK" }))
        .nest("/api", api_routes(service))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CompressionLayer::new())
        // Remote analysis calls get the configured timeout plus headroom
        .layer(TimeoutLayer::new(timeout + Duration::from_secs(5)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([http::Method::GET, http::Method::POST, http::Method::DELETE])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([127, 0, 0, 1], CONFIG.port));
    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
