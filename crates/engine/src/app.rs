//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    clock::SystemClock,
    config::PaginationConfig,
    events::LogEventPublisher,
    memory::{InMemoryCharacterRepo, InMemorySnapshotRepo},
    ports::{CharacterRepo, ClockPort, EventPublisher, SnapshotRepo},
};
use crate::use_cases::CharacterCrud;

/// Main application state.
///
/// Holds all use cases.
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub characters: CharacterCrud,
}

impl App {
    pub fn new(
        repo: Arc<dyn CharacterRepo>,
        snapshots: Arc<dyn SnapshotRepo>,
        clock: Arc<dyn ClockPort>,
        events: Arc<dyn EventPublisher>,
        pagination: PaginationConfig,
    ) -> Self {
        Self {
            use_cases: UseCases {
                characters: CharacterCrud::new(repo, snapshots, clock, events, pagination),
            },
        }
    }

    /// In-memory storage, system clock, log publisher.
    pub fn in_memory(pagination: PaginationConfig) -> Self {
        Self::new(
            Arc::new(InMemoryCharacterRepo::new()),
            Arc::new(InMemorySnapshotRepo::new()),
            Arc::new(SystemClock::new()),
            Arc::new(LogEventPublisher::new()),
            pagination,
        )
    }
}
