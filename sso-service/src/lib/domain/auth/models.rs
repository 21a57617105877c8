use std::fmt;

/// Registered user.
///
/// Created by registration and never mutated by the auth domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub pass_hash: Vec<u8>,
    pub is_admin: bool,
}

/// User identifier assigned by storage on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Tenant application permitted to request tokens for its users.
///
/// Provisioned out-of-band; read-only to the auth domain.
#[derive(Clone, PartialEq, Eq)]
pub struct App {
    pub id: AppId,
    pub name: String,
    pub secret: Vec<u8>,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Application identifier. Zero is never a valid application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AppId(pub i32);

impl AppId {
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to register a new user.
pub struct RegisterCommand {
    pub email: String,
    /// Plain text password (hashed by the service)
    pub password: String,
}

impl fmt::Debug for RegisterCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterCommand")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Command to log a user into an application.
pub struct LoginCommand {
    pub email: String,
    pub password: String,
    pub app_id: AppId,
}

impl fmt::Debug for LoginCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCommand")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("app_id", &self.app_id)
            .finish()
    }
}
