//! Roster view state - the fetched snapshot and its refresh lifecycle
//!
//! The snapshot is replaced wholesale on every successful fetch; client
//! actions never patch it in place. Overlapping refreshes are resolved by
//! generation: a result older than one already applied is dropped.

use crate::api::{ApiError, Roster};

/// What the roster area should render
#[derive(Debug, Clone, PartialEq)]
pub enum RosterState {
    /// The initial fetch has not completed yet
    Loading,
    /// The last applied fetch succeeded
    Loaded(Roster),
    /// The last applied fetch failed; a static notice is rendered
    Failed,
}

/// Client-held roster state
pub struct RosterView {
    state: RosterState,
    issued: u64,
    applied: u64,
}

impl RosterView {
    pub fn new() -> Self {
        Self {
            state: RosterState::Loading,
            issued: 0,
            applied: 0,
        }
    }

    pub fn state(&self) -> &RosterState {
        &self.state
    }

    pub fn roster(&self) -> Option<&Roster> {
        match &self.state {
            RosterState::Loaded(roster) => Some(roster),
            _ => None,
        }
    }

    /// Allocate the generation for a new refresh request
    pub fn begin_refresh(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Apply a completed fetch. Returns false when the result was stale
    /// and dropped.
    pub fn apply(&mut self, generation: u64, result: Result<Roster, ApiError>) -> bool {
        if generation <= self.applied {
            tracing::debug!("Dropping stale roster fetch (generation {})", generation);
            return false;
        }
        self.applied = generation;
        self.state = match result {
            Ok(roster) => RosterState::Loaded(roster),
            Err(e) => {
                tracing::warn!("Failed to fetch activities: {}", e);
                RosterState::Failed
            }
        };
        true
    }
}

impl Default for RosterView {
    fn default() -> Self {
        Self::new()
    }
}
