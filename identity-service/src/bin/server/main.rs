use std::sync::Arc;

use auth::Authenticator;
use identity_service::config::Config;
use identity_service::domain::session::service::SessionManager;
use identity_service::domain::session::service::SessionPolicy;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::events::KafkaEventProducer;
use identity_service::outbound::repositories::PostgresAccountRepository;
use identity_service::outbound::repositories::PostgresSessionRepository;
use identity_service::outbound::repositories::RetryPolicy;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "identity_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "identity-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;
    config.validate()?;

    tracing::info!(
        http_port = config.server.http_port,
        kafka_brokers = %config.kafka.brokers,
        kafka_topic = %config.kafka.topic,
        access_token_ttl_minutes = config.jwt.access_token_ttl_minutes,
        refresh_token_ttl_days = config.jwt.refresh_token_ttl_days,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let retry = RetryPolicy::new(
        config.database.retry_attempts,
        config.database.retry_base_delay(),
    );

    let authenticator = Arc::new(Authenticator::new(
        config.jwt.secret.as_bytes(),
        config.jwt.access_token_ttl(),
    ));
    let account_repository = Arc::new(PostgresAccountRepository::new(pg_pool.clone(), retry));
    let session_repository = Arc::new(PostgresSessionRepository::new(pg_pool, retry));
    let confirmation_notifier = Arc::new(KafkaEventProducer::new(&config.kafka)?);

    let session_manager = Arc::new(SessionManager::new(
        account_repository,
        session_repository,
        confirmation_notifier,
        authenticator,
        SessionPolicy {
            refresh_token_ttl: config.jwt.refresh_token_ttl(),
            confirmation_url_base: config.confirmation.url_base.clone(),
        },
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(session_manager)).await?;

    tracing::info!("Server exited");

    Ok(())
}
