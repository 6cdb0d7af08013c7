//! Use cases - user story orchestration over the domain and the ports.

pub mod characters;

pub use characters::{CharacterCrud, ManagementError};
