use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;

/// Password hashing implementation.
///
/// Produces self-describing PHC strings (Argon2id) with a random salt per call.
/// The work factor is fixed at construction and recorded inside every hash, so
/// verification keeps working after the parameters are tuned.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Create a password hasher with the Argon2 recommended work factor.
    pub fn new() -> Self {
        Self {
            params: Params::default(),
        }
    }

    /// Create a password hasher with an explicit work factor.
    ///
    /// # Arguments
    /// * `memory_kib` - Memory cost in KiB (at least 8 per lane)
    /// * `iterations` - Number of passes over memory
    /// * `parallelism` - Number of lanes
    ///
    /// # Errors
    /// * `InvalidParams` - Parameters are outside the ranges Argon2 accepts
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, PasswordError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;

        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a plaintext password.
    ///
    /// # Returns
    /// PHC string bytes (algorithm, parameters, salt and digest)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<Vec<u8>, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string().into_bytes())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// # Returns
    /// True if the password matches, false for any mismatch
    ///
    /// # Errors
    /// * `VerificationFailed` - Stored hash is malformed or uses unsupported parameters
    pub fn verify(&self, password: &str, hash: &[u8]) -> Result<bool, PasswordError> {
        let encoded = std::str::from_utf8(hash)
            .map_err(|_| PasswordError::VerificationFailed("hash is not valid UTF-8".into()))?;

        let parsed_hash = PasswordHash::new(encoded).map_err(|e| {
            PasswordError::VerificationFailed(format!("Invalid password hash: {}", e))
        })?;

        match self
            .argon2()
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerificationFailed(e.to_string())),
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
