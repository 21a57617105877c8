use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// JWT token handler bound to one symmetric secret.
///
/// Generic over the claims type. Uses HS256 (HMAC with SHA-256).
/// A token encoded by one handler only decodes with a handler built from the same secret.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a new JWT handler with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens
    ///
    /// # Errors
    /// * `EmptySecret` - The secret has no bytes
    pub fn new(secret: &[u8]) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::EmptySecret);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        })
    }

    /// Encode claims into a JWT token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a JWT token.
    ///
    /// Requires an `exp` claim and rejects expired tokens.
    ///
    /// # Errors
    /// * `TokenExpired` - Token has expired
    /// * `DecodingFailed` - Token signature is invalid or malformed
    pub fn decode<T: for<'de> Deserialize<'de>>(&self, token: &str) -> Result<T, JwtError> {
        let validation = Validation::new(self.algorithm);

        let token_data =
            decode::<T>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                _ => JwtError::DecodingFailed(e.to_string()),
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use chrono::Utc;

    use super::*;
    use crate::jwt::Claims;

    #[test]
    fn test_encode_and_decode() {
        let handler = JwtHandler::new(b"test-secret").unwrap();
        let claims = Claims::for_session(1, "a@x.com", 1, Duration::hours(1)).unwrap();

        let token = handler.encode(&claims).expect("Failed to encode token");
        assert!(!token.is_empty());

        let decoded: Claims = handler.decode(&token).expect("Failed to decode token");
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(matches!(JwtHandler::new(b""), Err(JwtError::EmptySecret)));
    }

    #[test]
    fn test_decode_invalid_token() {
        let handler = JwtHandler::new(b"test-secret").unwrap();

        let result = handler.decode::<Claims>("invalid.token.here");
        assert!(matches!(result, Err(JwtError::DecodingFailed(_))));
    }

    #[test]
    fn test_decode_with_wrong_secret() {
        let app_a = JwtHandler::new(b"secret-of-app-a").unwrap();
        let app_b = JwtHandler::new(b"secret-of-app-b").unwrap();
        let claims = Claims::for_session(1, "a@x.com", 1, Duration::hours(1)).unwrap();

        let token = app_a.encode(&claims).expect("Failed to encode token");

        let result = app_b.decode::<Claims>(&token);
        assert!(matches!(result, Err(JwtError::DecodingFailed(_))));
    }

    #[test]
    fn test_decode_expired_token() {
        let handler = JwtHandler::new(b"test-secret").unwrap();
        // Beyond the default 60s leeway
        let claims = Claims {
            uid: 1,
            email: "a@x.com".to_string(),
            app_id: 1,
            exp: (Utc::now() - Duration::minutes(5)).timestamp(),
        };

        let token = handler.encode(&claims).unwrap();

        let result = handler.decode::<Claims>(&token);
        assert!(matches!(result, Err(JwtError::TokenExpired)));
    }
}
