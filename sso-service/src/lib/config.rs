use std::env;
use std::time::Duration;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Application configuration for the sso service.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub env: RunEnv,
    pub storage: StorageConfig,
    pub grpc: GrpcConfig,
    pub token: TokenConfig,
    #[serde(default)]
    pub password: PasswordConfig,
}

/// Deployment environment; selects log format and verbosity.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RunEnv {
    Local,
    Dev,
    Prod,
}

/// SQLite storage configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Database file path, or `sqlite::memory:`
    pub path: String,
}

/// Longest accepted token lifetime (one year).
pub const MAX_TOKEN_TTL_MINUTES: i64 = 365 * 24 * 60;

/// Longest accepted per-request deadline (one hour).
pub const MAX_GRPC_TIMEOUT_MS: u64 = 60 * 60 * 1000;

/// gRPC server configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct GrpcConfig {
    pub port: u16,
    /// Default request deadline, also the cap for client-supplied deadlines
    pub timeout_ms: u64,
}

impl GrpcConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TokenConfig {
    pub ttl_minutes: i64,
}

impl TokenConfig {
    /// Token lifetime, rejected unless within `1..=MAX_TOKEN_TTL_MINUTES`.
    pub fn ttl(&self) -> Result<chrono::Duration, ConfigError> {
        if !(1..=MAX_TOKEN_TTL_MINUTES).contains(&self.ttl_minutes) {
            return Err(ConfigError::Message(format!(
                "token.ttl_minutes must be between 1 and {}, got {}",
                MAX_TOKEN_TTL_MINUTES, self.ttl_minutes
            )));
        }

        chrono::Duration::try_minutes(self.ttl_minutes).ok_or_else(|| {
            ConfigError::Message(format!(
                "token.ttl_minutes out of range: {}",
                self.ttl_minutes
            ))
        })
    }
}

/// Argon2 work factor. Defaults follow the Argon2 recommended parameters.
#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    #[serde(default = "PasswordConfig::default_memory_kib")]
    pub memory_kib: u32,
    #[serde(default = "PasswordConfig::default_iterations")]
    pub iterations: u32,
    #[serde(default = "PasswordConfig::default_parallelism")]
    pub parallelism: u32,
}

impl PasswordConfig {
    fn default_memory_kib() -> u32 {
        argon2_defaults::MEMORY_KIB
    }

    fn default_iterations() -> u32 {
        argon2_defaults::ITERATIONS
    }

    fn default_parallelism() -> u32 {
        argon2_defaults::PARALLELISM
    }
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: argon2_defaults::MEMORY_KIB,
            iterations: argon2_defaults::ITERATIONS,
            parallelism: argon2_defaults::PARALLELISM,
        }
    }
}

mod argon2_defaults {
    pub const MEMORY_KIB: u32 = 19 * 1024;
    pub const ITERATIONS: u32 = 2;
    pub const PARALLELISM: u32 = 1;
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (SSO__GRPC__PORT, SSO__TOKEN__TTL_MINUTES, etc.)
    /// 2. File named by CONFIG_PATH, if set
    /// 3. Environment-specific config file (config/{RUN_MODE}.toml)
    /// 4. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "local".to_string());

        let mut builder = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false));

        if let Ok(path) = env::var("CONFIG_PATH") {
            builder = builder.add_source(File::with_name(&path));
        }

        let configuration = builder
            .add_source(
                Environment::with_prefix("SSO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject values the service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.token.ttl()?;

        if !(1..=MAX_GRPC_TIMEOUT_MS).contains(&self.grpc.timeout_ms) {
            return Err(ConfigError::Message(format!(
                "grpc.timeout_ms must be between 1 and {}, got {}",
                MAX_GRPC_TIMEOUT_MS, self.grpc.timeout_ms
            )));
        }

        Ok(())
    }
}
