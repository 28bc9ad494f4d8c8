mod core;
mod features;
mod shared;

use crate::core::config::{Config, StoreBackend, StoreConfig};
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::auth;
use crate::features::locations::{
    routes as locations_routes, InMemoryLocationStore, LocationService, LocationStore,
    PgLocationStore,
};
use axum::{extract::DefaultBodyLimit, middleware::from_fn, Router};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

/// Build the configured location store
async fn build_store(config: &StoreConfig) -> anyhow::Result<Arc<dyn LocationStore>> {
    match (config.backend, &config.database) {
        (StoreBackend::Postgres, Some(db)) => {
            let pool = database::connect_and_migrate(db).await?;
            tracing::info!("Using PostGIS location store");
            Ok(Arc::new(PgLocationStore::new(pool)))
        }
        (StoreBackend::Postgres, None) => Err(anyhow::anyhow!(
            "Postgres location store selected without database configuration"
        )),
        (StoreBackend::Memory, _) => {
            tracing::warn!("Using in-memory location store; data is lost on restart");
            Ok(Arc::new(InMemoryLocationStore::new()))
        }
    }
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "System info: tokio_worker_threads={}, pid={}",
        worker_threads,
        std::process::id()
    );
    tracing::info!("Configuration loaded successfully");

    let store = build_store(&config.store).await?;
    let location_service = Arc::new(LocationService::new(store, config.store.timeout));
    tracing::info!(
        "Location service initialized (store timeout {:?})",
        config.store.timeout
    );

    let jwks_client = Arc::new(auth::JwksClient::new(
        &config.auth.jwks_url,
        config.auth.jwks_cache_ttl,
    ));
    let jwt_validator = Arc::new(auth::JwtValidator::new(
        jwks_client,
        config.auth.issuer.clone(),
        config.auth.audience.clone(),
        config.auth.jwt_leeway,
    ));
    tracing::info!("Auth configuration initialized");

    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Protected routes (require JWT authentication)
    let protected_routes = Router::new()
        .merge(locations_routes::protected_routes(Arc::clone(
            &location_service,
        )))
        .route_layer(axum::middleware::from_fn_with_state(
            jwt_validator,
            middleware::auth_middleware,
        ));

    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    let public_routes = Router::new().merge(locations_routes::public_routes(location_service));

    let app = Router::new()
        .merge(swagger)
        .merge(protected_routes)
        .merge(public_routes)
        .merge(health_route)
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    socket.set_nodelay(true)?;

    let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
    socket.set_tcp_keepalive(&keepalive)?;

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}
