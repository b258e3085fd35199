//! HTTP inbound adapter exposing REST endpoints.

pub mod admin;
pub mod auth;
pub mod error;
pub mod health;
pub mod links;
pub mod profiles;
pub mod session;
pub mod state;

pub use error::ApiResult;
