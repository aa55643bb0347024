//! Session state machine
//!
//! Tracks a session from creation to teardown. `Closed` is terminal; a
//! negotiation result arriving after close is discarded.

use std::time::Instant;

use crate::error::NegotiationError;
use crate::registry::SlotKey;
use crate::stats::SessionStats;

/// Session lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Created, negotiation not started
    Idle,
    /// Offer sent, waiting for the answer
    Negotiating,
    /// Remote answer applied
    Connected,
    /// Negotiation failed, transport already closed
    Failed,
    /// Destroyed
    Closed,
}

/// Mutable session state shared with the negotiation task
#[derive(Debug)]
pub struct SessionState {
    /// Current phase
    pub phase: SessionPhase,

    /// Creation time
    pub created_at: Instant,

    /// Time the remote answer was applied
    pub connected_at: Option<Instant>,

    /// Per-session counters
    pub stats: SessionStats,
}

impl SessionState {
    /// Create a new session state
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Idle,
            created_at: Instant::now(),
            connected_at: None,
            stats: SessionStats::default(),
        }
    }

    /// Transition to negotiating
    pub fn start_negotiation(&mut self) {
        if self.phase == SessionPhase::Idle {
            self.phase = SessionPhase::Negotiating;
        }
    }

    /// Remote answer applied
    pub fn on_connected(&mut self) {
        if self.phase == SessionPhase::Negotiating {
            self.phase = SessionPhase::Connected;
            let now = Instant::now();
            self.connected_at = Some(now);
            self.stats.setup_time = Some(now.duration_since(self.created_at));
        }
    }

    /// Negotiation failed
    pub fn on_failed(&mut self) {
        if !self.is_closed() {
            self.phase = SessionPhase::Failed;
        }
    }

    /// Inbound track attached to the surface
    pub fn on_track(&mut self) {
        self.stats.tracks_received += 1;
    }

    /// Enter the terminal phase
    pub fn close(&mut self) {
        self.phase = SessionPhase::Closed;
    }

    /// Check if the session was destroyed
    pub fn is_closed(&self) -> bool {
        self.phase == SessionPhase::Closed
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Final result of a session's negotiation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Remote answer applied, media may flow
    Established,
    /// Negotiation failed; the slot stays without media
    Failed(NegotiationError),
}

/// Negotiation result reported back to the coordinator
///
/// The coordinator applies it only if the registry entry at `slot` still
/// carries `session_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEvent {
    pub session_id: u64,
    pub slot: SlotKey,
    pub outcome: SessionOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_lifecycle() {
        let mut state = SessionState::new();
        assert_eq!(state.phase, SessionPhase::Idle);

        // Answer before offer is ignored
        state.on_connected();
        assert_eq!(state.phase, SessionPhase::Idle);

        state.start_negotiation();
        assert_eq!(state.phase, SessionPhase::Negotiating);

        state.on_connected();
        assert_eq!(state.phase, SessionPhase::Connected);
        assert!(state.connected_at.is_some());
        assert!(state.stats.setup_time.is_some());

        state.close();
        assert!(state.is_closed());
    }

    #[test]
    fn test_closed_is_terminal() {
        let mut state = SessionState::new();
        state.start_negotiation();
        state.close();

        state.on_failed();
        state.on_connected();
        state.start_negotiation();
        assert_eq!(state.phase, SessionPhase::Closed);
    }
}
