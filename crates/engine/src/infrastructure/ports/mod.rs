//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Character and snapshot storage (in-memory today, a database later)
//! - Event publishing (log sink today, a message bus later)
//! - Clock (for testing)

mod error;
mod repos;
mod testing;
mod types;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::*;

// =============================================================================
// Types
// =============================================================================
pub use types::{CharacterFilter, CharacterListing};

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::ClockPort;

#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Error Types
// =============================================================================
pub use error::{PublishError, RepoError};
