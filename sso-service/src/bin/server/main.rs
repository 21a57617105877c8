use std::str::FromStr;
use std::sync::Arc;

use auth::PasswordHasher;
use auth::TokenIssuer;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::sqlite::SqlitePoolOptions;
use sso_service::config::Config;
use sso_service::config::RunEnv;
use sso_service::domain::auth::service::AuthService;
use sso_service::inbound::grpc::AuthGrpcService;
use sso_service::outbound::repositories::SqliteStorage;
use sso_service::proto::auth_server::AuthServer;
use tonic::transport::Server;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::load()?;

    init_tracing(config.env);

    tracing::info!(
        service = "sso",
        version = env!("CARGO_PKG_VERSION"),
        env = ?config.env,
        "Service starting"
    );

    tracing::info!(
        storage_path = %config.storage.path,
        grpc_port = config.grpc.port,
        grpc_timeout_ms = config.grpc.timeout_ms,
        token_ttl_minutes = config.token.ttl_minutes,
        "Configuration loaded"
    );

    let connect_options =
        SqliteConnectOptions::from_str(&config.storage.path)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "sqlite",
        "Database connection pool created"
    );

    let mut migrator = sqlx::migrate!("./migrations");
    // Fixture migrations applied by the migrator binary live in the same table
    migrator.set_ignore_missing(true);
    migrator.run(&pool).await?;
    tracing::info!(database = "sqlite", "Database migrations completed");

    let password_hasher = PasswordHasher::with_params(
        config.password.memory_kib,
        config.password.iterations,
        config.password.parallelism,
    )?;
    let token_issuer = TokenIssuer::new(config.token.ttl()?);

    let storage = Arc::new(SqliteStorage::new(pool.clone()));
    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&storage),
        Arc::clone(&storage),
        Arc::clone(&storage),
        password_hasher,
        token_issuer,
    ));

    let grpc_address = format!("0.0.0.0:{}", config.grpc.port).parse()?;
    let grpc_service = AuthGrpcService::new(auth_service, config.grpc.timeout());
    tracing::info!(
        address = %grpc_address,
        port = config.grpc.port,
        protocol = "grpc",
        "gRpc server listening"
    );

    Server::builder()
        .trace_fn(|request| {
            tracing::info_span!(
                "grpc",
                method = %request.uri().path(),
            )
        })
        .add_service(AuthServer::new(grpc_service))
        .serve_with_shutdown(grpc_address, shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("sso stopped");

    Ok(())
}

fn init_tracing(env: RunEnv) {
    let default_filter = match env {
        RunEnv::Local | RunEnv::Dev => "sso=debug,sso_service=debug,info",
        RunEnv::Prod => "info",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    match env {
        RunEnv::Local | RunEnv::Dev => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
        RunEnv::Prod => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!(signal = "SIGINT", "Received shutdown signal"),
        _ = terminate => tracing::info!(signal = "SIGTERM", "Received shutdown signal"),
    }
}
