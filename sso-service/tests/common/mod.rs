use std::sync::Arc;
use std::time::Duration;

use auth::PasswordHasher;
use auth::TokenIssuer;
use fake::faker::internet::en::Password;
use fake::faker::internet::en::SafeEmail;
use fake::Fake;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use sso_service::domain::auth::service::AuthService;
use sso_service::inbound::grpc::AuthGrpcService;
use sso_service::outbound::repositories::SqliteStorage;
use sso_service::proto::auth_client::AuthClient;
use sso_service::proto::auth_server::AuthServer;
use tonic::transport::server::TcpIncoming;
use tonic::transport::Channel;
use tonic::transport::Server;

/// Application seeded by `tests/migrations`
pub const APP_ID: i32 = 1;
pub const APP_SECRET: &str = "test-secret";

pub const TOKEN_TTL_MINUTES: i64 = 60;

/// Test application that spawns a real gRPC server over an in-memory database
pub struct TestApp {
    pub client: AuthClient<Channel>,
    pub pool: SqlitePool,
}

impl TestApp {
    /// Spawn the server in a background task and connect a client to it
    pub async fn spawn() -> Self {
        // A single connection keeps every query on the same in-memory database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        let mut fixtures = sqlx::migrate!("./tests/migrations");
        fixtures.set_ignore_missing(true);
        fixtures
            .run(&pool)
            .await
            .expect("Failed to run fixture migrations");

        let storage = Arc::new(SqliteStorage::new(pool.clone()));
        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&storage),
            Arc::clone(&storage),
            Arc::clone(&storage),
            PasswordHasher::with_params(64, 1, 1).expect("Invalid hasher params"),
            TokenIssuer::new(chrono::Duration::minutes(TOKEN_TTL_MINUTES)),
        ));
        let grpc_service = AuthGrpcService::new(auth_service, Duration::from_secs(10));

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);
        let incoming =
            TcpIncoming::from_listener(listener, true, None).expect("Failed to accept on listener");

        tokio::spawn(async move {
            Server::builder()
                .add_service(AuthServer::new(grpc_service))
                .serve_with_incoming(incoming)
                .await
                .expect("Server error");
        });

        let client = AuthClient::connect(address)
            .await
            .expect("Failed to connect gRPC client");

        Self { client, pool }
    }

    /// Grant the administrator flag directly in storage
    pub async fn make_admin(&self, user_id: i64) {
        sqlx::query("UPDATE users SET is_admin = TRUE WHERE id = ?1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .expect("Failed to update user");
    }
}

pub fn fake_email() -> String {
    SafeEmail().fake()
}

pub fn fake_password() -> String {
    Password(10..11).fake()
}
