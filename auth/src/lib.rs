//! Credential primitives shared by the sso services.
//!
//! - Password hashing (Argon2id, tunable work factor)
//! - Session claims and HS256 token encoding/decoding
//! - Token issuance bound to a per-application secret
//!
//! Nothing here knows about storage or transport; services adapt these to their ports.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! assert!(!hasher.verify("not_my_password", &hash).unwrap());
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::{Claims, JwtHandler, TokenIssuer};
//! use chrono::Duration;
//!
//! let issuer = TokenIssuer::new(Duration::hours(1));
//! let token = issuer.issue(1, "a@x.com", 1, b"app-secret").unwrap();
//!
//! // Whoever accepts the token verifies it with the same app secret
//! let claims: Claims = JwtHandler::new(b"app-secret").unwrap().decode(&token).unwrap();
//! assert_eq!(claims.uid, 1);
//! ```

pub mod issuer;
pub mod jwt;
pub mod password;

pub use issuer::TokenIssuer;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
