//! API layer - HTTP entry points.

pub mod auth;
pub mod http;

pub use auth::PlayerAuth;
pub use http::{routes, ApiError};
