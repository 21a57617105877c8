use chrono::Duration;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;

/// Issues session tokens signed with the secret of the requesting application.
///
/// Holds only the process-wide token lifetime. The signing key is derived from
/// the secret passed to each `issue` call and dropped afterwards, so a rotated
/// secret takes effect on the next issuance.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    ttl: Duration,
}

impl TokenIssuer {
    /// Create a new token issuer.
    ///
    /// # Arguments
    /// * `ttl` - Lifetime of every issued token
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    /// Build and sign session claims for a user of an application.
    ///
    /// # Arguments
    /// * `uid` - User identifier
    /// * `email` - User email
    /// * `app_id` - Application identifier
    /// * `secret` - Application signing secret
    ///
    /// # Returns
    /// Signed JWT string
    ///
    /// # Errors
    /// * `EmptySecret` - The application secret is empty
    /// * `InvalidLifetime` - The configured lifetime cannot produce a valid expiry
    /// * `EncodingFailed` - Token generation failed
    pub fn issue(
        &self,
        uid: i64,
        email: &str,
        app_id: i32,
        secret: &[u8],
    ) -> Result<String, JwtError> {
        let handler = JwtHandler::new(secret)?;
        let claims = Claims::for_session(uid, email, app_id, self.ttl)?;

        handler.encode(&claims)
    }
}
