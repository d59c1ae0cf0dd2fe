//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::AppError`.
//!
//! Startup order: config → database (+ migrations) → super-admin bootstrap
//! → object storage → HTTP listener.

mod config;

use auth::{AuthAppState, PgAuthRepository, auth_router, ensure_super_admin};
use axum::{
    BoxError, Router,
    error_handling::HandleErrorLayer,
    http,
    http::{Method, header},
    routing::get,
};
use fleet::{
    DisabledObjectStorage, FleetAppState, ObjectStorage, PgFleetRepository, S3ObjectStorage,
    StorageConfig, fleet_router,
};
use kernel::error::app_error::AppError;
use kernel::response::ApiResponse;
use platform::token::TokenService;
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;
use tower::timeout::error::Elapsed;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{AppConfig, ServerConfig};

/// How long in-flight requests may run after a shutdown signal
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fleet_api=info,auth=info,fleet=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(
        name = %config.server.name,
        version = %config.server.version,
        mode = %config.server.mode,
        "Configuration loaded"
    );

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let auth_repo = PgAuthRepository::new(pool.clone());
    let auth_state = AuthAppState::new(auth_repo, config.auth.clone())?;

    // Errors here should not prevent server startup
    match ensure_super_admin(auth_state.repo.as_ref(), &auth_state.codec).await {
        Ok(Some(user)) => tracing::info!(user_id = %user.id, "Super admin created"),
        Ok(None) => tracing::debug!("Super admin already present"),
        Err(e) => tracing::error!(error = %e, "Super admin bootstrap failed, continuing anyway"),
    }

    let fleet_repo = PgFleetRepository::new(pool.clone());
    let tokens = auth_state.tokens.clone();
    let api = if config.storage.enabled {
        let storage = S3ObjectStorage::connect(&config.storage).await?;
        api_router(auth_state, fleet_repo, storage, config.storage.clone(), tokens)
    } else {
        tracing::warn!("Object storage disabled; upload tokens will be refused");
        api_router(
            auth_state,
            fleet_repo,
            DisabledObjectStorage,
            config.storage.clone(),
            tokens,
        )
    };

    let app = app_router(api, &config.server, cors_layer(&config.cors_origins));

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    let (signalled_tx, mut signalled_rx) = watch::channel(false);

    let server = async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = signalled_tx.send(true);
        })
        .await
    };

    let drain_deadline = async move {
        if signalled_rx.wait_for(|signalled| *signalled).await.is_ok() {
            tokio::time::sleep(SHUTDOWN_GRACE).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = server => result?,
        _ = drain_deadline => {
            tracing::warn!(grace = ?SHUTDOWN_GRACE, "In-flight requests did not finish in time");
        }
    }

    tracing::info!("Server stopped");
    Ok(())
}

fn api_router<S>(
    auth_state: AuthAppState<PgAuthRepository>,
    fleet_repo: PgFleetRepository,
    storage: S,
    storage_config: StorageConfig,
    tokens: Arc<TokenService>,
) -> Router
where
    S: ObjectStorage + Sync + 'static,
{
    let fleet_state = FleetAppState::new(fleet_repo, storage, storage_config, tokens);

    Router::new()
        .merge(auth_router(auth_state))
        .merge(fleet_router(fleet_state))
}

/// `/health` plus the API under `/api/v1`, wrapped in the HTTP layers
///
/// Unknown routes and timeouts answer with the error envelope too.
fn app_router(api: Router, server: &ServerConfig, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health).with_state(server.clone()))
        .nest("/api/v1", api)
        .fallback(route_not_found)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_layer_error))
                .layer(TimeoutLayer::new(server.read_timeout)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn route_not_found() -> AppError {
    AppError::not_found("Route not found")
}

async fn handle_layer_error(err: BoxError) -> AppError {
    if err.is::<Elapsed>() {
        AppError::request_timeout("Request timed out")
    } else {
        tracing::error!(error = %err, "Unhandled middleware error");
        AppError::internal("Internal server error")
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed_origins: Vec<http::HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true)
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    name: String,
    version: String,
}

/// GET /health
async fn health(
    axum::extract::State(server): axum::extract::State<ServerConfig>,
) -> ApiResponse<Health> {
    ApiResponse::ok(Health {
        status: "ok",
        name: server.name,
        version: server.version,
    })
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
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
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    fn server(read_timeout: Duration) -> ServerConfig {
        ServerConfig {
            name: "robot-scheduler".to_string(),
            version: "0.1.0".to_string(),
            mode: "debug".to_string(),
            port: 8080,
            read_timeout,
        }
    }

    fn app(read_timeout: Duration) -> Router {
        let api = Router::new()
            .route("/ping", get(|| async { ApiResponse::ok("pong") }))
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    ApiResponse::ok("late")
                }),
            );
        app_router(api, &server(read_timeout), cors_layer(&[]))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_in_envelope() {
        let (status, body) = get_json(app(Duration::from_secs(5)), "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], 0);
        assert_eq!(body["data"]["status"], "ok");
        assert_eq!(body["data"]["name"], "robot-scheduler");
    }

    #[tokio::test]
    async fn test_nested_route_reachable() {
        let (status, body) = get_json(app(Duration::from_secs(5)), "/api/v1/ping").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], "pong");
    }

    #[tokio::test]
    async fn test_unknown_route_uses_envelope() {
        for uri in ["/nope", "/api/v1/nope"] {
            let (status, body) = get_json(app(Duration::from_secs(5)), uri).await;

            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body["code"], 404);
            assert!(body["message"].is_string());
            assert!(body["data"].is_null());
        }
    }

    #[tokio::test]
    async fn test_timeout_uses_envelope() {
        let (status, body) = get_json(app(Duration::from_millis(20)), "/api/v1/slow").await;

        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert_eq!(body["code"], 408);
        assert_eq!(body["message"], "Request timed out");
    }
}
