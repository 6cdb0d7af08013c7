//! Tapestry Engine library.
//!
//! Server-side code for the Tapestry character service.
//!
//! ## Structure
//!
//! - `use_cases/` - Character management orchestration
//! - `infrastructure/` - Ports, adapters and configuration
//! - `api/` - HTTP entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
