use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::JwtError;

/// Session token claims.
///
/// Asserts the identity of one user towards one application until `exp`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// User identifier
    pub uid: i64,

    /// User email
    pub email: String,

    /// Application the token was issued for
    pub app_id: i32,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a user session expiring `ttl` from now.
    ///
    /// # Arguments
    /// * `uid` - User identifier
    /// * `email` - User email
    /// * `app_id` - Application identifier
    /// * `ttl` - Token lifetime
    ///
    /// # Errors
    /// * `InvalidLifetime` - `ttl` is not positive or the expiry is out of range
    pub fn for_session(
        uid: i64,
        email: impl Into<String>,
        app_id: i32,
        ttl: Duration,
    ) -> Result<Self, JwtError> {
        if ttl <= Duration::zero() {
            return Err(JwtError::InvalidLifetime(format!(
                "{} seconds is not positive",
                ttl.num_seconds()
            )));
        }

        let expiration = Utc::now()
            .checked_add_signed(ttl)
            .ok_or_else(|| JwtError::InvalidLifetime("expiry out of range".to_string()))?;

        Ok(Self {
            uid,
            email: email.into(),
            app_id,
            exp: expiration.timestamp(),
        })
    }
}
