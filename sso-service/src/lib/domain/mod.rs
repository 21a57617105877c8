pub mod auth;
pub mod context;
