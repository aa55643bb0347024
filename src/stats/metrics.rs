//! Statistics for sessions and the viewer

use std::time::Duration;

/// Session-level statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Inbound tracks attached to the surface
    pub tracks_received: u32,
    /// Time from creation to remote answer applied
    pub setup_time: Option<Duration>,
}

/// Viewer-wide statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewerStats {
    /// Sessions started
    pub sessions_started: u64,
    /// Sessions destroyed
    pub sessions_stopped: u64,
    /// Sessions whose remote answer was applied
    pub sessions_established: u64,
    /// Sessions whose negotiation failed
    pub negotiation_failures: u64,
    /// Negotiation results dropped because their slot was reassigned
    pub stale_results_discarded: u64,
}

impl ViewerStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sessions started and not yet stopped
    pub fn outstanding(&self) -> u64 {
        self.sessions_started.saturating_sub(self.sessions_stopped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewer_stats_new() {
        let stats = ViewerStats::new();
        assert_eq!(stats.sessions_started, 0);
        assert_eq!(stats.sessions_stopped, 0);
        assert_eq!(stats.negotiation_failures, 0);
        assert_eq!(stats.stale_results_discarded, 0);
        assert_eq!(stats.outstanding(), 0);
    }

    #[test]
    fn test_outstanding() {
        let stats = ViewerStats {
            sessions_started: 7,
            sessions_stopped: 4,
            ..Default::default()
        };
        assert_eq!(stats.outstanding(), 3);
    }

    #[test]
    fn test_session_stats_default() {
        let stats = SessionStats::default();
        assert_eq!(stats.tracks_received, 0);
        assert!(stats.setup_time.is_none());
    }
}
