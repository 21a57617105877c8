use async_trait::async_trait;
use sqlx::Row;
use sqlx::SqlitePool;

use crate::domain::auth::errors::StorageError;
use crate::domain::auth::models::App;
use crate::domain::auth::models::AppId;
use crate::domain::auth::models::User;
use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::AppProvider;
use crate::domain::auth::ports::UserProvider;
use crate::domain::auth::ports::UserSaver;

/// SQLite-backed implementation of every storage contract.
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserSaver for SqliteStorage {
    async fn save_user(&self, email: &str, pass_hash: &[u8]) -> Result<UserId, StorageError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (email, pass_hash)
            VALUES (?1, ?2)
            "#,
        )
        .bind(email)
        .bind(pass_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return StorageError::UserExists;
                }
            }
            StorageError::Database(e.to_string())
        })?;

        Ok(UserId(result.last_insert_rowid()))
    }
}

#[async_trait]
impl UserProvider for SqliteStorage {
    async fn get_user(&self, email: &str) -> Result<User, StorageError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, pass_hash, is_admin
            FROM users
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Database(e.to_string()))?
        .ok_or(StorageError::UserNotFound)?;

        Ok(User {
            id: UserId(row.try_get("id").map_err(database_error)?),
            email: row.try_get("email").map_err(database_error)?,
            pass_hash: row.try_get("pass_hash").map_err(database_error)?,
            is_admin: row.try_get("is_admin").map_err(database_error)?,
        })
    }

    async fn is_admin(&self, user_id: UserId) -> Result<bool, StorageError> {
        let row = sqlx::query(
            r#"
            SELECT is_admin
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Database(e.to_string()))?
        .ok_or(StorageError::UserNotFound)?;

        row.try_get("is_admin").map_err(database_error)
    }
}

#[async_trait]
impl AppProvider for SqliteStorage {
    async fn get_app(&self, app_id: AppId) -> Result<App, StorageError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, secret
            FROM apps
            WHERE id = ?1
            "#,
        )
        .bind(app_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Database(e.to_string()))?
        .ok_or(StorageError::AppNotFound)?;

        Ok(App {
            id: AppId(row.try_get("id").map_err(database_error)?),
            name: row.try_get("name").map_err(database_error)?,
            secret: row.try_get("secret").map_err(database_error)?,
        })
    }
}

fn database_error(err: sqlx::Error) -> StorageError {
    StorageError::Database(err.to_string())
}

#[cfg(test)]
mod tests {
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;

    async fn storage() -> (SqliteStorage, SqlitePool) {
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

        (SqliteStorage::new(pool.clone()), pool)
    }

    #[tokio::test]
    async fn test_save_and_get_user() {
        let (storage, _pool) = storage().await;

        let id = storage.save_user("a@x.com", b"hash").await.unwrap();
        assert_eq!(id, UserId(1));

        let user = storage.get_user("a@x.com").await.unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.pass_hash, b"hash".to_vec());
        assert!(!user.is_admin);
    }

    #[tokio::test]
    async fn test_save_duplicate_email() {
        let (storage, _pool) = storage().await;

        let first = storage.save_user("a@x.com", b"hash").await.unwrap();
        let second = storage.save_user("a@x.com", b"other").await;
        assert_eq!(second, Err(StorageError::UserExists));

        // First registration untouched
        let user = storage.get_user("a@x.com").await.unwrap();
        assert_eq!(user.id, first);
        assert_eq!(user.pass_hash, b"hash".to_vec());
    }

    #[tokio::test]
    async fn test_email_is_case_sensitive() {
        let (storage, _pool) = storage().await;

        storage.save_user("a@x.com", b"hash").await.unwrap();

        assert_eq!(
            storage.get_user("A@X.COM").await,
            Err(StorageError::UserNotFound)
        );
        assert!(storage.save_user("A@X.COM", b"hash").await.is_ok());
    }

    #[tokio::test]
    async fn test_get_missing_user() {
        let (storage, _pool) = storage().await;

        let result = storage.get_user("nobody@x.com").await;
        assert_eq!(result, Err(StorageError::UserNotFound));
    }

    #[tokio::test]
    async fn test_is_admin() {
        let (storage, pool) = storage().await;

        let id = storage.save_user("admin@x.com", b"hash").await.unwrap();
        assert_eq!(storage.is_admin(id).await, Ok(false));

        sqlx::query("UPDATE users SET is_admin = TRUE WHERE id = ?1")
            .bind(id.0)
            .execute(&pool)
            .await
            .unwrap();
        assert_eq!(storage.is_admin(id).await, Ok(true));

        assert_eq!(
            storage.is_admin(UserId(404)).await,
            Err(StorageError::UserNotFound)
        );
    }

    #[tokio::test]
    async fn test_get_app() {
        let (storage, pool) = storage().await;

        sqlx::query("INSERT INTO apps (id, name, secret) VALUES (1, 'test', 'test-secret')")
            .execute(&pool)
            .await
            .unwrap();

        let app = storage.get_app(AppId(1)).await.unwrap();
        assert_eq!(app.id, AppId(1));
        assert_eq!(app.name, "test");
        assert_eq!(app.secret, b"test-secret".to_vec());

        assert_eq!(
            storage.get_app(AppId(2)).await,
            Err(StorageError::AppNotFound)
        );
    }

    #[tokio::test]
    async fn test_get_app_with_binary_secret() {
        let (storage, pool) = storage().await;

        sqlx::query("INSERT INTO apps (id, name, secret) VALUES (1, 'binary', X'01FF10')")
            .execute(&pool)
            .await
            .unwrap();

        let app = storage.get_app(AppId(1)).await.unwrap();
        assert_eq!(app.secret, vec![0x01, 0xFF, 0x10]);
    }
}
