//! WBS Review server binary.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use wbs_review::adapters::auth::StaticTokenValidator;
use wbs_review::adapters::http::{
    auth_middleware, change_request_routes, AuthState, ChangeRequestHandlers,
};
use wbs_review::adapters::memory::InMemoryProjectStore;
use wbs_review::adapters::notifications::{
    NoopNotificationGateway, SlackConfig, SlackNotificationGateway,
};
use wbs_review::adapters::postgres::{
    PostgresChangeLogReader, PostgresChangeRequestRepository, PostgresWbsRepository,
};
use wbs_review::application::handlers::ProjectLocks;
use wbs_review::config::{AppConfig, DatabaseConfig, LogFormat, LoggingConfig, NotificationConfig};
use wbs_review::ports::{
    ChangeLogReader, ChangeRequestRepository, NotificationGateway, WbsRepository,
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

struct Stores {
    wbs: Arc<dyn WbsRepository>,
    change_requests: Arc<dyn ChangeRequestRepository>,
    change_log: Arc<dyn ChangeLogReader>,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config.logging)?;

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "invalid configuration");
        return Err(e.into());
    }

    let stores = connect_stores(&config.database).await?;
    let notifier = notification_gateway(&config);
    let tokens = config.auth.tokens()?;
    if tokens.is_empty() {
        tracing::warn!("no bearer tokens configured; every authenticated request will be rejected");
    }
    let validator: AuthState = Arc::new(StaticTokenValidator::from_config(&tokens)?);

    let handlers = ChangeRequestHandlers::new(
        stores.change_requests,
        stores.wbs,
        stores.change_log,
        notifier,
        Arc::new(ProjectLocks::new()),
    )
    .with_internal_errors_exposed(config.server.expose_internal_errors);

    let api = change_request_routes(handlers)
        .layer(axum::middleware::from_fn_with_state(validator, auth_middleware));

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(api)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "wbs-review listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("wbs-review stopped");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) -> Result<(), BoxError> {
    let builder = tracing_subscriber::fmt().with_env_filter(logging.env_filter()?);
    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
    Ok(())
}

async fn connect_stores(database: &DatabaseConfig) -> Result<Stores, BoxError> {
    let Some(url) = database.url() else {
        tracing::warn!("no database URL configured; using the in-memory store");
        let store = Arc::new(InMemoryProjectStore::new());
        return Ok(Stores {
            wbs: store.clone(),
            change_requests: store.clone(),
            change_log: store,
        });
    };

    let pool = PgPoolOptions::new()
        .min_connections(database.min_connections)
        .max_connections(database.max_connections)
        .acquire_timeout(database.acquire_timeout())
        .connect(url)
        .await?;
    tracing::info!(
        max_connections = database.max_connections,
        "connected to PostgreSQL"
    );

    Ok(Stores {
        wbs: Arc::new(PostgresWbsRepository::new(pool.clone())),
        change_requests: Arc::new(PostgresChangeRequestRepository::new(pool.clone())),
        change_log: Arc::new(PostgresChangeLogReader::new(pool)),
    })
}

fn notification_gateway(config: &AppConfig) -> Arc<dyn NotificationGateway> {
    let NotificationConfig {
        slack_bot_token,
        slack_api_base_url,
        ..
    } = &config.notifications;

    match slack_bot_token {
        Some(token) if config.notifications_enabled() => {
            tracing::info!("Slack notifications enabled");
            Arc::new(SlackNotificationGateway::new(
                SlackConfig::from_secret(token.clone()).with_api_base_url(slack_api_base_url),
            ))
        }
        _ => {
            tracing::info!("notifications disabled; using the no-op gateway");
            Arc::new(NoopNotificationGateway::new())
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
