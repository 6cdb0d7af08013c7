//! Infrastructure: port definitions and their concrete adapters.

pub mod clock;
pub mod config;
pub mod events;
pub mod memory;
pub mod ports;
